//! Shaping trace: per-stage buffer snapshots relayed to a caller sink.
//!
//! The tracer re-runs shaping against its own, call-local font handle and
//! forwards one line per observable stage to the supplied sink. The sink is
//! an explicit parameter rather than process-global state, so concurrent
//! traces cannot race on callback registration.
//!
//! Wire format, one line per stage:
//!
//! ```text
//! <trace_id>|<stage> <numeric_json><name_json>
//! ```
//!
//! The numeric form carries ids, clusters, positions, extents and flags;
//! the name form carries only glyph names, so the numeric data is never
//! duplicated. The final line is always labeled `final output`.

use std::path::Path;
use std::str::FromStr;

use rustybuzz::{Language, Script, UnicodeBuffer};
use serde::Serialize;

use crate::error::FontError;
use crate::font::FontHandle;
use crate::shaper::{glyph_extents, glyph_label};

/// Compact numeric snapshot of one buffer slot.
#[derive(Debug, Serialize)]
struct NumericGlyph {
    /// Glyph id after shaping; Unicode codepoint before.
    g: u32,
    /// Cluster value (UTF-8 byte offset of the source character).
    cl: u32,
    dx: i32,
    dy: i32,
    ax: i32,
    ay: i32,
    /// Bounding-box x bearing.
    xb: i32,
    /// Bounding-box y bearing.
    yb: i32,
    /// Bounding-box width.
    wb: i32,
    /// Bounding-box height, measured downward from the bearing, so
    /// non-empty outlines report a negative value.
    hb: i32,
    /// Glyph flags (bit 0: unsafe-to-break).
    fl: u32,
}

/// Names-only snapshot of one buffer slot.
#[derive(Debug, Serialize)]
struct NamedGlyph {
    g: String,
}

/// Re-shape `text` with the given font file, reporting buffer state to
/// `sink` at each observable stage.
///
/// The font handle opened here is local to the call and fully released when
/// the function returns, on success and on every error path. The shaping
/// engine exposes no intra-pass hooks, so the stages are the buffer entering
/// the shaper (`start shaping`) and the completed buffer (`final output`).
pub fn trace(
    font_file: impl AsRef<Path>,
    text: &str,
    script: Option<&str>,
    language: Option<&str>,
    trace_id: &str,
    mut sink: impl FnMut(&str),
) -> Result<(), FontError> {
    let handle = FontHandle::open(font_file)?;
    log::debug!("Tracing shape of {} chars (id {trace_id})", text.chars().count());

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);

    if let Some(script_str) = script
        && let Ok(script) = Script::from_str(script_str)
    {
        buffer.set_script(script);
    }
    if let Some(lang_str) = language
        && let Ok(lang) = Language::from_str(lang_str)
    {
        buffer.set_language(lang);
    }

    // Snapshot of the buffer entering the shaper: slots still hold raw
    // codepoints keyed by their byte offsets, with zero positions.
    let pre_numeric: Vec<NumericGlyph> = text
        .char_indices()
        .map(|(offset, ch)| NumericGlyph {
            g: ch as u32,
            cl: offset as u32,
            dx: 0,
            dy: 0,
            ax: 0,
            ay: 0,
            xb: 0,
            yb: 0,
            wb: 0,
            hb: 0,
            fl: 0,
        })
        .collect();
    let pre_names: Vec<NamedGlyph> = text
        .chars()
        .map(|ch| NamedGlyph {
            g: format!("U+{:04X}", ch as u32),
        })
        .collect();
    emit_event(&mut sink, trace_id, "start shaping", &pre_numeric, &pre_names)?;

    let glyph_buffer = rustybuzz::shape(handle.face(), &[], buffer);

    let face = handle.face();
    let infos = glyph_buffer.glyph_infos();
    let positions = glyph_buffer.glyph_positions();

    let final_numeric: Vec<NumericGlyph> = infos
        .iter()
        .zip(positions.iter())
        .map(|(info, pos)| {
            let extents = glyph_extents(face, info.glyph_id);
            NumericGlyph {
                g: info.glyph_id,
                cl: info.cluster,
                dx: pos.x_offset,
                dy: pos.y_offset,
                ax: pos.x_advance,
                ay: pos.y_advance,
                xb: extents.map_or(0, |e| i32::from(e.x_min)),
                yb: extents.map_or(0, |e| i32::from(e.y_max)),
                wb: extents.map_or(0, |e| i32::from(e.x_max) - i32::from(e.x_min)),
                hb: extents.map_or(0, |e| i32::from(e.y_min) - i32::from(e.y_max)),
                fl: u32::from(info.unsafe_to_break()),
            }
        })
        .collect();
    let final_names: Vec<NamedGlyph> = infos
        .iter()
        .map(|info| NamedGlyph {
            g: glyph_label(face, info.glyph_id),
        })
        .collect();
    emit_event(&mut sink, trace_id, "final output", &final_numeric, &final_names)
}

/// Serialize both snapshot forms and push one formatted line to the sink.
///
/// A serialization chunk that produces zero bytes aborts the remaining work
/// for this event and surfaces as `SerializationTruncated`.
fn emit_event(
    sink: &mut impl FnMut(&str),
    trace_id: &str,
    stage: &str,
    numeric: &[NumericGlyph],
    names: &[NamedGlyph],
) -> Result<(), FontError> {
    let numeric_json =
        serde_json::to_string(numeric).map_err(|_| FontError::truncated(stage))?;
    if numeric_json.is_empty() {
        return Err(FontError::truncated(stage));
    }
    let name_json = serde_json::to_string(names).map_err(|_| FontError::truncated(stage))?;
    if name_json.is_empty() {
        return Err(FontError::truncated(stage));
    }
    sink(&format!("{trace_id}|{stage} {numeric_json}{name_json}"));
    Ok(())
}
