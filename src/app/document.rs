use std::fs;
use std::path::{Path, PathBuf};

use super::error::Result;

/// One schematic file held as lines with their endings intact.
///
/// Splitting keeps every `\n` (and any preceding `\r`) attached to its line,
/// so `text()` reassembles the original bytes exactly and untouched regions
/// pass through a rewrite verbatim.
pub struct SchematicDocument {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl SchematicDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: split_lines(&text),
        })
    }

    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

/// Split text into lines, line endings preserved. A final line without a
/// trailing newline is kept as-is.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(|l| l.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_split_lines_round_trips() {
        let text = "a\nb\r\nc";
        let lines = split_lines(text);
        assert_eq!(lines, vec!["a\n", "b\r\n", "c"]);
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_split_lines_trailing_newline() {
        let lines = split_lines("a\nb\n");
        assert_eq!(lines, vec!["a\n", "b\n"]);
    }

    #[test]
    fn test_load_and_text_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.kicad_sch");
        let content = "(kicad_sch\r\n  (symbol \"R1\")\r\n)\r\n";
        fs::write(&path, content).unwrap();

        let doc = SchematicDocument::load(&path).unwrap();
        assert_eq!(doc.text(), content);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = SchematicDocument::load(&dir.path().join("missing.kicad_sch"));
        assert!(err.is_err());
    }
}
