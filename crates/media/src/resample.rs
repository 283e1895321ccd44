//! Bilinear image resampling.

use common::color::{lerp_unclamped, Color};
use common::error::{ExportError, ExportResult};
use common::pixels::PixelBuffer;

/// Source coordinates feeding one destination column or row.
#[derive(Clone, Copy, Debug)]
struct Tap {
    near: usize,
    far: usize,
    weight: f32,
}

impl Tap {
    /// Map destination coordinate `dst` onto a source axis of `len` samples.
    ///
    /// The second sample is clamped to the last source index so rounding can
    /// never step past the edge.
    fn new(dst: u32, ratio: f32, len: u32) -> Self {
        let last = len as usize - 1;
        let position = dst as f32 * ratio;
        let floor = position.floor();
        let near = (floor as usize).min(last);
        Self {
            near,
            far: (near + 1).min(last),
            weight: position - floor,
        }
    }
}

/// Resample `source` to `new_width` x `new_height` with bilinear filtering.
///
/// The mapping is edge anchored: the scale along each axis is
/// `(source_len - 1) / new_len`, so destination pixel 0 samples source pixel 0
/// and the last destination pixel lands near the last source pixel. Each
/// destination pixel blends its four source neighbours, first along x in both
/// rows and then along y, with every channel (alpha included) interpolated in
/// floating point and rounded once at the end.
///
/// Resampling to the source's own size returns an exact copy. That check comes
/// first, so even a 1 x N source resampled to 1 x N succeeds. Any other target
/// for a source with a width or height below 2 yields
/// [`ExportError::DegenerateSource`]. The source buffer is never modified.
pub fn resample(source: &PixelBuffer, new_width: u32, new_height: u32) -> ExportResult<PixelBuffer> {
    if new_width == 0 || new_height == 0 {
        return Err(ExportError::InvalidDimensions {
            width: new_width,
            height: new_height,
        });
    }

    let (src_width, src_height) = (source.width(), source.height());
    if (new_width, new_height) == (src_width, src_height) {
        return Ok(source.clone());
    }
    if src_width < 2 || src_height < 2 {
        return Err(ExportError::DegenerateSource {
            width: src_width,
            height: src_height,
        });
    }

    let ratio_x = (src_width - 1) as f32 / new_width as f32;
    let ratio_y = (src_height - 1) as f32 / new_height as f32;

    let columns: Vec<Tap> = (0..new_width).map(|x| Tap::new(x, ratio_x, src_width)).collect();

    let src = source.as_bytes();
    let stride = src_width as usize * 4;
    let sample = |x: usize, y: usize| -> [f32; 4] {
        let offset = y * stride + x * 4;
        [
            src[offset] as f32,
            src[offset + 1] as f32,
            src[offset + 2] as f32,
            src[offset + 3] as f32,
        ]
    };

    let mut output = PixelBuffer::new(new_width, new_height);
    let dst_stride = new_width as usize * 4;
    for (y, dst_row) in output.as_bytes_mut().chunks_exact_mut(dst_stride).enumerate() {
        let row = Tap::new(y as u32, ratio_y, src_height);

        for (px, col) in dst_row.chunks_exact_mut(4).zip(&columns) {
            let top = lerp_unclamped(sample(col.near, row.near), sample(col.far, row.near), col.weight);
            let bottom = lerp_unclamped(sample(col.near, row.far), sample(col.far, row.far), col.weight);
            let color = Color::from_f32_array(lerp_unclamped(top, bottom, row.weight));
            px.copy_from_slice(&color.to_bytes());
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_ramp(width: u32, height: u32, values: &[u8]) -> PixelBuffer {
        let data = values.iter().flat_map(|&r| [r, 0, 0, 255]).collect();
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    fn reds(buffer: &PixelBuffer) -> Vec<u8> {
        buffer.as_bytes().chunks_exact(4).map(|px| px[0]).collect()
    }

    #[test]
    fn test_solid_color_downscale() {
        let color = Color::rgba(12, 200, 99, 180);
        let source = PixelBuffer::filled(4, 4, color);
        let output = resample(&source, 2, 2).unwrap();

        assert_eq!((output.width(), output.height()), (2, 2));
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(output.get_pixel(x, y), Some(color));
            }
        }
    }

    #[test]
    fn test_identity_size_is_exact_copy() {
        let values: Vec<u8> = (0..12).map(|i| i * 20).collect();
        let source = red_ramp(4, 3, &values);
        let output = resample(&source, 4, 3).unwrap();
        assert_eq!(output, source);
    }

    #[test]
    fn test_rows_use_source_stride() {
        // Three columns in, two out: a mixed-up row stride would read the
        // second row from the wrong offset.
        let source = red_ramp(3, 2, &[0, 100, 200, 50, 150, 250]);
        let output = resample(&source, 2, 2).unwrap();

        assert_eq!(reds(&output), vec![0, 100, 25, 125]);
        assert!(output.as_bytes().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_horizontal_interpolation() {
        let source = red_ramp(2, 2, &[0, 90, 0, 90]);
        let output = resample(&source, 3, 2).unwrap();

        // ratio_x = 1/3, ratio_y = 1/2; rows are identical.
        assert_eq!(reds(&output), vec![0, 30, 60, 0, 30, 60]);
    }

    #[test]
    fn test_alpha_is_interpolated() {
        let data = vec![0, 0, 0, 0, 0, 0, 0, 200, 0, 0, 0, 0, 0, 0, 0, 200];
        let source = PixelBuffer::from_raw(2, 2, data).unwrap();
        let output = resample(&source, 4, 1).unwrap();

        let alphas: Vec<u8> = output.as_bytes().chunks_exact(4).map(|px| px[3]).collect();
        assert_eq!(alphas, vec![0, 50, 100, 150]);
    }

    #[test]
    fn test_source_is_untouched() {
        let source = red_ramp(3, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let before = source.clone();
        let _ = resample(&source, 2, 5).unwrap();
        assert_eq!(source, before);
    }

    #[test]
    fn test_large_upscale_stays_in_bounds() {
        let source = red_ramp(3, 3, &[10, 20, 30, 40, 50, 60, 70, 80, 90]);
        let output = resample(&source, 997, 13).unwrap();
        assert_eq!((output.width(), output.height()), (997, 13));
        assert_eq!(output.get_pixel(0, 0), Some(Color::rgb(10, 0, 0)));
    }

    #[test]
    fn test_degenerate_source() {
        let thin = PixelBuffer::filled(1, 8, Color::WHITE);
        assert!(matches!(
            resample(&thin, 1, 4),
            Err(ExportError::DegenerateSource { width: 1, height: 8 })
        ));

        let short = PixelBuffer::filled(8, 1, Color::WHITE);
        assert!(matches!(resample(&short, 4, 1), Err(ExportError::DegenerateSource { .. })));

        // Same size needs no sampling.
        assert_eq!(resample(&thin, 1, 8).unwrap(), thin);
    }

    #[test]
    fn test_zero_target_rejected() {
        let source = PixelBuffer::filled(4, 4, Color::WHITE);
        assert!(matches!(
            resample(&source, 0, 2),
            Err(ExportError::InvalidDimensions { width: 0, height: 2 })
        ));
    }
}
