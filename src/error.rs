//! Typed error variants for the glyphscope crate.
//!
//! Provides structured error types so callers at the crate boundary can
//! match on specific failure modes instead of opaque strings. Every
//! operation in this crate reports failure through [`FontError`]; none of
//! them terminate the process or return an empty result in place of an
//! error.

use thiserror::Error;

/// Top-level error type for the font bridge.
///
/// Covers the failure categories callers may want to distinguish:
/// - reading the font file from disk
/// - parsing the font container and its structure
/// - operating on a session with no font configured
/// - serializing results to JSON
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be read from disk.
    #[error("failed to read font file '{path}': {source}")]
    Io {
        /// Path to the font file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes do not parse as a supported font container, or the
    /// container holds no sub-fonts.
    #[error("font data is not a supported font container")]
    InvalidFontData,

    /// An operation was invoked before a font was opened, or after the
    /// session was closed.
    #[error("no font is loaded; set a font file path first")]
    NotInitialized,

    /// A font collection was opened with a sub-font index outside the
    /// collection's range.
    #[error("sub-font index {index} out of range (collection holds {count})")]
    SubfontIndexOutOfRange {
        /// The requested sub-font index.
        index: u32,
        /// Number of sub-fonts the collection actually holds.
        count: u32,
    },

    /// The container parsed, but the selected font's structure is
    /// internally inconsistent.
    #[error("font structure broken or corrupted: {0}")]
    CorruptStructure(String),

    /// JSON serialization stopped before producing complete output.
    ///
    /// Distinct from a valid-but-empty result so callers never mistake a
    /// short string for a full document.
    #[error("serialization truncated during '{stage}'")]
    SerializationTruncated {
        /// The operation or trace stage that was being serialized.
        stage: String,
    },
}

impl FontError {
    /// Build an [`FontError::Io`] from a path and the underlying error.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        FontError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Build a [`FontError::SerializationTruncated`] for the given stage.
    pub(crate) fn truncated(stage: &str) -> Self {
        FontError::SerializationTruncated {
            stage: stage.to_string(),
        }
    }
}
