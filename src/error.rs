//! Error types for the photomask crate.

use std::path::PathBuf;

/// Errors that can occur while pairing and compositing images.
///
/// During a batch run these are captured per pair; a failing pair never
/// stops the rest of the batch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input image exists but could not be decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Path of the unreadable image.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// A mask cannot be conformed to the main image's dimensions.
    #[error("cannot resize mask to degenerate target {width}x{height}")]
    Resize {
        /// Target width in pixels.
        width: u32,
        /// Target height in pixels.
        height: u32,
    },

    /// An output image could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path of the output that failed to persist.
        path: PathBuf,
        /// Underlying encoder error.
        source: image::ImageError,
    },

    /// An I/O error occurred while listing or creating directories.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
