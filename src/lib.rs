//! Font inspection and text shaping bridge.
//!
//! This crate is a thin wrapper over two external font libraries:
//! - rustybuzz performs all text shaping (Unicode segmentation, script and
//!   language rules, glyph positioning)
//! - ttf-parser performs all OpenType container and table parsing
//!
//! The wrapper itself only opens font files, forwards calls, serializes the
//! results (glyph runs, metrics, table dumps) to JSON, and relays per-stage
//! shaping snapshots to a caller-supplied trace sink. No shaping rules,
//! table formats, or rendering live here.
//!
//! # Architecture
//!
//! - [`FontHandle`] owns the font bytes and the parsed face as one unit;
//!   teardown is automatic and ordered (face before bytes) on every path.
//! - [`FontSession`] is the reusable host-facing surface: configure a font
//!   file path once, then query display name, version, metrics, shaped
//!   output, and Unicode coverage against it.
//! - [`shaper`] converts a text run to a JSON array of positioned glyphs.
//! - [`tracer`] re-runs shaping and forwards buffer snapshots per stage.
//! - [`tables`] dumps every table of a font file into one JSON document.
//!
//! All failures surface as typed [`FontError`] values; nothing in this crate
//! terminates the process or conflates "no data" with "failed".

pub mod error;
pub mod font;
pub mod metrics;
pub mod session;
pub mod shaper;
pub mod tables;
pub mod tracer;

// Re-export main types for convenience
pub use error::FontError;
pub use font::FontHandle;
pub use metrics::FontMetrics;
pub use session::FontSession;
pub use shaper::{ShapedGlyph, ShapedRun, shape, shape_json};
pub use tables::{dump_tables_as_json, dump_tables_as_json_with_index};
pub use tracer::trace;
