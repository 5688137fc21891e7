//! Errors raised while decoding module slots and images

use thiserror::Error;

/// Errors that can occur when decoding a module slot
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Fewer bytes remain than the layout requires
    #[error("truncated {what}: needed {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    /// Descriptor bytes are not valid UTF-8
    #[error("descriptor is not valid UTF-8 (at byte {valid_up_to})")]
    InvalidDescriptor { valid_up_to: usize },

    /// Failed to read a module image from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
