//! JSON rendering of outlines.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Two-space indented JSON
    #[default]
    Pretty,
    /// Single-line JSON without extra whitespace
    Compact,
}

/// Convert an outline document to JSON.
///
/// Non-ASCII text is written as UTF-8, not escaped.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Serialize an outline document into a writer, followed by a newline.
pub fn write_json<W: Write>(doc: &Document, format: JsonFormat, mut writer: W) -> Result<()> {
    let json = to_json(doc, format)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write an outline document to a file, creating parent directories.
pub fn write_json_file<P: AsRef<Path>>(doc: &Document, format: JsonFormat, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_json(doc, format, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    fn sample() -> Document {
        Document {
            title: "Überblick".to_string(),
            outline: vec![OutlineEntry::new(HeadingLevel::H2, "2.1 Background", 3)],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("  \"title\": \"Überblick\""));
        assert!(json.contains("\"level\": \"H2\""));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Überblick","outline":[{"level":"H2","text":"2.1 Background","page":3}]}"#
        );
    }

    #[test]
    fn test_empty_document() {
        let json = to_json(&Document::new(), JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"title":"","outline":[]}"#);
    }

    #[test]
    fn test_write_json_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_json_file(&sample(), JsonFormat::Compact, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        let parsed: Document = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, sample());
    }
}
