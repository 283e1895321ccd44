//! Common error types.

use thiserror::Error;

/// Why a group marker stream could not be matched up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupFault {
    /// A divider was found with no open group above it.
    UnmatchedDivider,
    /// A group header was never closed by a divider.
    UnmatchedHeader,
    /// Two groups cover the same index with the same span.
    AmbiguousNesting,
}

impl std::fmt::Display for GroupFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupFault::UnmatchedDivider => write!(f, "divider without an open group"),
            GroupFault::UnmatchedHeader => write!(f, "group header without a divider"),
            GroupFault::AmbiguousNesting => write!(f, "groups with equal span overlap"),
        }
    }
}

/// Main error type for layer export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Layer '{layer}' is missing its {channel} channel")]
    MissingChannel { layer: String, channel: &'static str },

    #[error("Layer '{layer}' channel {channel_id} holds {actual} bytes, expected {expected}")]
    ChannelSizeMismatch {
        layer: String,
        channel_id: i16,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed group structure at layer {index}: {fault}")]
    MalformedGroupStructure { index: usize, fault: GroupFault },

    #[error("Cannot resample a {width}x{height} source")]
    DegenerateSource { width: u32, height: u32 },

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

impl ExportError {
    pub fn missing_channel(layer: impl Into<String>, channel: &'static str) -> Self {
        Self::MissingChannel {
            layer: layer.into(),
            channel,
        }
    }

    pub fn malformed(index: usize, fault: GroupFault) -> Self {
        Self::MalformedGroupStructure { index, fault }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }
}
