//! Full-font table dump as one packed JSON document.
//!
//! Parsing is owned entirely by ttf-parser; this module validates the
//! container, selects a sub-font, and serializes what the library exposes:
//! every table record in the directory plus structured dumps of the core
//! tables. Container problems and corrupt structures surface as typed
//! errors to the caller; nothing here terminates the process.

use std::path::Path;

use serde_json::{Map, Value, json};
use ttf_parser::{Face, RawFace, fonts_in_collection};

use crate::error::FontError;

/// Dump every table of the first sub-font in `path` as packed JSON.
pub fn dump_tables_as_json(path: impl AsRef<Path>) -> Result<String, FontError> {
    dump_tables_as_json_with_index(path, 0)
}

/// Dump every table of the sub-font at `index` as packed JSON.
///
/// Single fonts count as a collection of one. A collection with zero
/// sub-fonts is invalid font data; an index past the end is a defined
/// out-of-range error, never a silent empty string.
pub fn dump_tables_as_json_with_index(
    path: impl AsRef<Path>,
    index: u32,
) -> Result<String, FontError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| FontError::io(path, e))?;

    let count = sub_font_count(&data)?;
    if index >= count {
        return Err(FontError::SubfontIndexOutOfRange { index, count });
    }

    // Container-level read: the raw sfnt directory for the selected sub-font.
    let raw = RawFace::parse(&data, index).map_err(|_| FontError::InvalidFontData)?;

    // Structure-level read: a directory that parses but whose font structure
    // is internally inconsistent is a corrupt structure, reported to the
    // caller rather than aborting.
    let face =
        Face::parse(&data, index).map_err(|e| FontError::CorruptStructure(e.to_string()))?;

    let mut doc = Map::new();
    doc.insert("directory".to_string(), directory_json(&raw));
    insert_parsed_tables(&mut doc, &face);

    log::info!(
        "Dumped {} table records from '{}' (sub-font {index} of {count})",
        raw.table_records.len(),
        path.display()
    );

    serde_json::to_string(&Value::Object(doc)).map_err(|_| FontError::truncated("table dump"))
}

/// Number of sub-fonts in the container; single fonts count as one.
fn sub_font_count(data: &[u8]) -> Result<u32, FontError> {
    match fonts_in_collection(data) {
        Some(0) => Err(FontError::InvalidFontData),
        Some(count) => Ok(count),
        // Not a collection; probe the data as a single font.
        None => {
            RawFace::parse(data, 0).map_err(|_| FontError::InvalidFontData)?;
            Ok(1)
        }
    }
}

/// The raw sfnt table directory: tag, length and checksum per record.
fn directory_json(raw: &RawFace<'_>) -> Value {
    let records: Vec<Value> = raw
        .table_records
        .into_iter()
        .map(|record| {
            json!({
                "tag": record.tag.to_string(),
                "length": record.length,
                "checksum": record.check_sum,
            })
        })
        .collect();
    Value::Array(records)
}

/// Structured dumps of the tables the parsing library exposes, keyed by tag.
fn insert_parsed_tables(doc: &mut Map<String, Value>, face: &Face<'_>) {
    let tables = face.tables();

    doc.insert(
        "head".to_string(),
        json!({
            "units_per_em": tables.head.units_per_em,
            "global_bbox": {
                "x_min": tables.head.global_bbox.x_min,
                "y_min": tables.head.global_bbox.y_min,
                "x_max": tables.head.global_bbox.x_max,
                "y_max": tables.head.global_bbox.y_max,
            },
        }),
    );

    doc.insert(
        "hhea".to_string(),
        json!({
            "ascender": tables.hhea.ascender,
            "descender": tables.hhea.descender,
            "line_gap": tables.hhea.line_gap,
            "number_of_metrics": tables.hhea.number_of_metrics,
        }),
    );

    doc.insert(
        "maxp".to_string(),
        json!({ "num_glyphs": face.number_of_glyphs() }),
    );

    if let Some(os2) = tables.os2 {
        doc.insert(
            "OS/2".to_string(),
            json!({
                "weight": os2.weight().to_number(),
                "width": os2.width().to_number(),
                "x_height": os2.x_height(),
                "cap_height": os2.capital_height(),
                "typo_ascender": os2.typographic_ascender(),
                "typo_descender": os2.typographic_descender(),
                "typo_line_gap": os2.typographic_line_gap(),
            }),
        );
    }

    if let Some(post) = tables.post {
        doc.insert(
            "post".to_string(),
            json!({
                "italic_angle": post.italic_angle,
                "is_monospaced": post.is_monospaced,
                "underline_position": post.underline_metrics.position,
                "underline_thickness": post.underline_metrics.thickness,
            }),
        );
    }

    if let Some(cmap) = tables.cmap {
        let mut subtable_count: u32 = 0;
        let mut codepoint_count: u64 = 0;
        for subtable in cmap.subtables {
            subtable_count += 1;
            if subtable.is_unicode() {
                subtable.codepoints(|_| codepoint_count += 1);
            }
        }
        doc.insert(
            "cmap".to_string(),
            json!({
                "subtables": subtable_count,
                "unicode_codepoints": codepoint_count,
            }),
        );
    }

    if let Some(hmtx) = tables.hmtx {
        doc.insert(
            "hmtx".to_string(),
            json!({ "number_of_metrics": hmtx.number_of_metrics }),
        );
    }

    let name_records: Vec<Value> = face
        .names()
        .into_iter()
        .filter(|name| name.is_unicode())
        .filter_map(|name| {
            name.to_string()
                .map(|value| json!({ "id": name.name_id, "value": value }))
        })
        .collect();
    if !name_records.is_empty() {
        doc.insert("name".to_string(), Value::Array(name_records));
    }
}
