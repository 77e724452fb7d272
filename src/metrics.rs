//! Scalar typographic metrics and naming-table lookups.

use rustybuzz::ttf_parser::name_id;
use serde::Serialize;

use crate::font::FontHandle;

/// Fixed-size record of a font's design-unit metrics.
///
/// Computed on demand from the face; never cached. Any metric the font does
/// not define reports 0, which is the underlying library's default, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontMetrics {
    /// Units per em.
    pub upem: i32,
    /// Baseline position; always 0 in this model.
    pub baseline: i32,
    /// x-height, or 0 if the font does not define one.
    pub xheight: i32,
    /// Cap height, or 0 if the font does not define one.
    pub capheight: i32,
    /// Horizontal ascender.
    pub ascender: i32,
    /// Horizontal descender (typically negative).
    pub descender: i32,
    /// Underline offset from the baseline, or 0 if undefined.
    pub underline_pos: i32,
    /// Underline thickness, or 0 if undefined.
    pub underline_thickness: i32,
}

impl FontHandle {
    /// The font's "full name" naming-table entry.
    ///
    /// Returns an empty string when the font has no such entry; absence is a
    /// value here, not a failure.
    pub fn display_name(&self) -> String {
        self.name_entry(name_id::FULL_NAME)
    }

    /// The font's "version string" naming-table entry, empty if absent.
    pub fn version_string(&self) -> String {
        self.name_entry(name_id::VERSION)
    }

    fn name_entry(&self, id: u16) -> String {
        self.face()
            .names()
            .into_iter()
            .filter(|name| name.name_id == id && name.is_unicode())
            .find_map(|name| name.to_string())
            .unwrap_or_default()
    }

    /// Read the seven-field metrics record from the face.
    pub fn metrics(&self) -> FontMetrics {
        let face = self.face();
        let underline = face.underline_metrics();
        FontMetrics {
            upem: i32::from(face.units_per_em()),
            baseline: 0,
            xheight: face.x_height().map_or(0, i32::from),
            capheight: face.capital_height().map_or(0, i32::from),
            ascender: i32::from(face.ascender()),
            descender: i32::from(face.descender()),
            underline_pos: underline.map_or(0, |m| i32::from(m.position)),
            underline_thickness: underline.map_or(0, |m| i32::from(m.thickness)),
        }
    }
}
