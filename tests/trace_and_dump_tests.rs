//! Tests for the tracing callback contract and the table dumper.

use std::io::Write;

use glyphscope::{FontError, dump_tables_as_json, dump_tables_as_json_with_index, trace};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/DejaVuSans.ttf");

/// Every trace line follows `<id>|<stage> <numeric_json><name_json>` and the
/// stream terminates with the literal `final output` stage.
#[test]
fn test_trace_wire_format() {
    let mut lines = Vec::new();
    trace(FIXTURE, "AV", None, Some("en"), "run-1", |line| {
        lines.push(line.to_string());
    })
    .unwrap();

    assert!(!lines.is_empty());
    for line in &lines {
        let (id, rest) = line.split_once('|').expect("id|stage separator");
        assert_eq!(id, "run-1");
        // Stage label, then a space, then the two serialized forms.
        let json_start = rest.find(" [").expect("space before payload");
        assert!(!rest[..json_start].is_empty());
    }
    assert!(lines.last().unwrap().starts_with("run-1|final output "));
}

/// The final stage's name form resolves real glyph names from the font.
#[test]
fn test_trace_final_stage_names() {
    let mut final_line = String::new();
    trace(FIXTURE, "AV", None, None, "run-2", |line| {
        final_line = line.to_string();
    })
    .unwrap();
    assert!(final_line.contains("{\"g\":\"A\"}"));
    assert!(final_line.contains("{\"g\":\"V\"}"));
}

/// Tracing never leaks handles across calls: repeated traces against the
/// same file behave identically.
#[test]
fn test_trace_is_repeatable() {
    let run = |id: &str| {
        let mut lines = Vec::new();
        trace(FIXTURE, "AV", None, None, id, |line| {
            lines.push(line.split_once('|').unwrap().1.to_string());
        })
        .unwrap();
        lines
    };
    assert_eq!(run("a"), run("b"));
}

/// Dumping a valid single font yields a non-empty JSON object with a table
/// directory; the packed output contains no pretty-printing whitespace.
#[test]
fn test_dump_valid_font() -> anyhow::Result<()> {
    let json = dump_tables_as_json(FIXTURE)?;
    assert!(json.starts_with('{'));
    assert!(!json.contains('\n'));

    let parsed: serde_json::Value = serde_json::from_str(&json)?;
    let directory = parsed["directory"].as_array().unwrap();
    assert!(!directory.is_empty());
    let tags: Vec<&str> = directory
        .iter()
        .map(|record| record["tag"].as_str().unwrap())
        .collect();
    for required in ["head", "hhea", "maxp", "cmap"] {
        assert!(tags.contains(&required), "directory should list {required}");
    }
    Ok(())
}

/// An out-of-range sub-font index is a defined error, not a crash or a
/// silent empty string.
#[test]
fn test_dump_out_of_range_subfont() {
    let err = dump_tables_as_json_with_index(FIXTURE, 7).unwrap_err();
    match err {
        FontError::SubfontIndexOutOfRange { index, count } => {
            assert_eq!(index, 7);
            assert_eq!(count, 1);
        }
        other => panic!("expected SubfontIndexOutOfRange, got {other:?}"),
    }
}

/// A corrupt file that passes no container validation reports invalid font
/// data and leaves the process running.
#[test]
fn test_dump_truncated_container() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    // A plausible sfnt version tag followed by garbage.
    file.write_all(&[0x00, 0x01, 0x00, 0x00, 0xFF, 0xFF]).unwrap();
    let err = dump_tables_as_json(file.path()).unwrap_err();
    assert!(matches!(err, FontError::InvalidFontData));
}
