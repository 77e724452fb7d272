//! Reusable host-facing session over a configured font.
//!
//! `FontSession` mirrors the surface a host application binds against:
//! point it at a font file once, then query names, metrics, shaped output
//! and Unicode coverage. Every query on a session with no font configured
//! reports `NotInitialized` instead of an empty result.

use std::path::{Path, PathBuf};

use crate::error::FontError;
use crate::font::FontHandle;
use crate::metrics::FontMetrics;
use crate::shaper;

/// Reusable state holding at most one open font.
///
/// Setting a new font file path replaces the previous font; the old handle
/// is dropped and fully released at that point. Sessions are read-only
/// after a font is set, so shared references may query concurrently;
/// replacing the font requires exclusive access.
#[derive(Debug, Default)]
pub struct FontSession {
    handle: Option<FontHandle>,
    path: Option<PathBuf>,
}

impl FontSession {
    /// Create a session with no font configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` and make it the session's font, replacing any previous
    /// one. On failure the previous font stays configured.
    pub fn set_font_file_path(&mut self, path: impl AsRef<Path>) -> Result<(), FontError> {
        let path = path.as_ref();
        let handle = FontHandle::open(path)?;
        if self.handle.is_some() {
            log::debug!("Replacing previously configured font");
        }
        self.handle = Some(handle);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Release the configured font. Subsequent queries report
    /// [`FontError::NotInitialized`].
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            log::debug!("Closed font session");
        }
        self.path = None;
    }

    /// Whether a font is currently configured.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Path of the configured font file, if any.
    pub fn font_file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Version string of the shaping bridge, in the `Version: X.Y.Z` form
    /// the host expects. Available with or without a configured font.
    pub fn engine_version(&self) -> String {
        format!("Version: {}", env!("CARGO_PKG_VERSION"))
    }

    /// The configured font's "full name" entry, empty if the font has none.
    pub fn display_name(&self) -> Result<String, FontError> {
        Ok(self.handle()?.display_name())
    }

    /// The configured font's "version string" entry, empty if absent.
    pub fn version_string(&self) -> Result<String, FontError> {
        Ok(self.handle()?.version_string())
    }

    /// Design-unit metrics of the configured font.
    pub fn metrics(&self) -> Result<FontMetrics, FontError> {
        Ok(self.handle()?.metrics())
    }

    /// Shape `text` against the configured font and return the JSON array.
    pub fn shape_json(&self, text: &str, language: Option<&str>) -> Result<String, FontError> {
        shaper::shape_json(self.handle()?, text, language)
    }

    /// Unicode coverage of the configured font.
    pub fn collect_unicodes(&self) -> Result<Vec<u32>, FontError> {
        Ok(self.handle()?.collect_unicodes())
    }

    fn handle(&self) -> Result<&FontHandle, FontError> {
        self.handle.as_ref().ok_or(FontError::NotInitialized)
    }
}
