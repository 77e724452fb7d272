//! Font handle: owned font bytes plus the parsed shaping face.
//!
//! The underlying libraries model a font as a chain of borrows (raw blob →
//! face), which would otherwise demand manual teardown in reverse order.
//! Here the whole chain lives in one owning struct so release order is
//! enforced by drop order on every exit path, including errors.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use rustybuzz::Face;

use crate::error::FontError;

/// An open font: raw data and the shaping face derived from it.
///
/// A `FontHandle` can only exist in a fully-initialized state; construction
/// fails with a typed error instead of producing a handle with null
/// internals. The face is valid exactly as long as the handle is alive, and
/// both are released together when the handle is dropped.
pub struct FontHandle {
    // Declared before `data` so the face is torn down before the bytes it
    // borrows from, mirroring the font → face → blob release order.
    face: Face<'static>,

    /// Raw font data bytes (TTF/OTF/TTC).
    data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontHandle {
    /// Open a font file, using sub-font index 0.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FontError> {
        Self::open_with_index(path, 0)
    }

    /// Open a font file with a specific sub-font index.
    ///
    /// Needed for TrueType Collection (.ttc) files where multiple faces
    /// share the same data.
    pub fn open_with_index(path: impl AsRef<Path>, index: u32) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| FontError::io(path, e))?;
        let handle = Self::from_bytes_with_index(data, index)?;
        log::info!(
            "Loaded font '{}' ({} bytes)",
            path.display(),
            handle.data.len()
        );
        Ok(handle)
    }

    /// Create a handle from in-memory font data, using sub-font index 0.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        Self::from_bytes_with_index(data, 0)
    }

    /// Create a handle from in-memory font data with a sub-font index.
    pub fn from_bytes_with_index(data: Vec<u8>, index: u32) -> Result<Self, FontError> {
        let data = Arc::new(data);

        // SAFETY: the bytes live in an Arc stored alongside the face, and
        // field order guarantees the face is dropped first. The face never
        // leaves this struct with the 'static lifetime exposed.
        let face = unsafe {
            let bytes: &[u8] = data.as_slice();
            let static_bytes: &'static [u8] = std::mem::transmute(bytes);
            Face::from_slice(static_bytes, index).ok_or(FontError::InvalidFontData)?
        };

        Ok(FontHandle { face, data })
    }

    /// The shaping face for this font.
    pub fn face(&self) -> &Face<'static> {
        &self.face
    }

    /// The raw font bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Release the font explicitly.
    ///
    /// Equivalent to dropping the handle; face and bytes are released
    /// together, so no partially-torn-down state can be observed.
    pub fn close(self) {
        log::debug!("Closing font handle ({} bytes)", self.data.len());
    }

    /// Collect every Unicode codepoint the font's cmap covers.
    ///
    /// Returned as an unordered collection of codepoint values.
    pub fn collect_unicodes(&self) -> Vec<u32> {
        let mut codepoints = HashSet::new();
        if let Some(cmap) = self.face.tables().cmap {
            for subtable in cmap.subtables {
                if subtable.is_unicode() {
                    subtable.codepoints(|cp| {
                        codepoints.insert(cp);
                    });
                }
            }
        }
        codepoints.into_iter().collect()
    }
}
