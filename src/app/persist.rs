use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::error::{AppError, Result};

const BACKUP_SUFFIX: &str = ".bak";
const TEMP_SUFFIX: &str = ".tmp___";
const STATE_SUFFIX: &str = ".reorder.json";

/// What a successful commit did, plus any non-fatal cleanup problems.
#[derive(Debug)]
pub struct CommitReceipt {
    pub backup_path: PathBuf,
    /// Cleanup steps that failed without aborting the commit (stale backup
    /// not deletable, original missing on first run, ...).
    pub diagnostics: Vec<String>,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

pub fn backup_path_for(path: &Path) -> PathBuf {
    with_suffix(path, BACKUP_SUFFIX)
}

/// Companion order-state file, always next to the document.
pub fn state_path_for(path: &Path) -> PathBuf {
    with_suffix(path, STATE_SUFFIX)
}

/// Replace the document at `path` with `new_text`, keeping one backup.
///
/// The new content goes to a sibling temp file first; the previous document
/// becomes `<path>.bak` and the temp file is renamed into place. `path` is
/// only ever updated by a rename of a fully written file, so no partial
/// write is visible there. A failure before the final rename leaves the
/// original document intact (possibly already moved to `.bak`).
pub fn commit(path: &Path, new_text: &str) -> Result<CommitReceipt> {
    let tmp = with_suffix(path, TEMP_SUFFIX);
    let bak = backup_path_for(path);
    let mut diagnostics = Vec::new();

    fs::write(&tmp, new_text)?;

    if bak.exists() {
        if let Err(e) = fs::remove_file(&bak) {
            diagnostics.push(format!("could not delete stale backup {}: {}", bak.display(), e));
        }
    }
    match fs::rename(path, &bak) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // First run: nothing to back up.
            diagnostics.push(format!("no previous file to back up at {}", path.display()));
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(AppError::Commit(format!(
                "failed to move {} to backup: {}",
                path.display(),
                e
            )));
        }
    }
    fs::rename(&tmp, path).map_err(|e| {
        AppError::Commit(format!("failed to move new content into {}: {}", path.display(), e))
    })?;

    Ok(CommitReceipt { backup_path: bak, diagnostics })
}

/// On-disk shape of the per-schematic order file.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderState {
    pub schema: String,
    pub order: Vec<String>,
    pub updated: String,
    pub note: String,
}

/// Persist the reconciled order next to the schematic, temp-then-rename.
pub fn save_order_state(doc_path: &Path, order: &[String]) -> Result<()> {
    let updated = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    let state = OrderState {
        schema: doc_path.display().to_string(),
        order: order.to_vec(),
        updated,
        note: "Per-schematic saved field order for fieldorder".to_string(),
    };
    let json = serde_json::to_string_pretty(&state)?;

    let path = state_path_for(doc_path);
    let tmp = with_suffix(&path, TEMP_SUFFIX);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, &path)?;
    Ok(())
}

/// Load the saved order for a schematic.
///
/// Accepts the current object shape or a legacy bare array. Any read or
/// parse failure, or an unexpected shape, means "no saved order" rather
/// than an error.
pub fn load_order_state(doc_path: &Path) -> Option<Vec<String>> {
    let contents = fs::read_to_string(state_path_for(doc_path)).ok()?;
    let value: serde_json::Value = serde_json::from_str(&contents).ok()?;
    let list = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map.get("order")?.as_array()?,
        _ => return None,
    };
    list.iter()
        .map(|v| v.as_str().map(|s| s.to_string()))
        .collect()
}

/// Delete the saved order file. Returns whether a file was removed.
pub fn reset_order_state(doc_path: &Path) -> bool {
    fs::remove_file(state_path_for(doc_path)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn v(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_commit_replaces_and_backs_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.kicad_sch");
        fs::write(&path, "old").unwrap();

        let receipt = commit(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_to_string(&receipt.backup_path).unwrap(), "old");
        assert!(receipt.diagnostics.is_empty());
    }

    #[test]
    fn test_commit_keeps_one_backup_generation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.kicad_sch");
        fs::write(&path, "v1").unwrap();
        commit(&path, "v2").unwrap();
        commit(&path, "v3").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "v3");
        assert_eq!(
            fs::read_to_string(backup_path_for(&path)).unwrap(),
            "v2"
        );
    }

    #[test]
    fn test_commit_first_run_without_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.kicad_sch");

        let receipt = commit(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!receipt.backup_path.exists());
        assert_eq!(receipt.diagnostics.len(), 1);
    }

    #[test]
    fn test_temp_write_leaves_original_untouched() {
        // A crash between temp-file write and the backup rename must leave
        // the document byte-identical.
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.kicad_sch");
        fs::write(&path, "original").unwrap();

        let tmp = with_suffix(&path, TEMP_SUFFIX);
        fs::write(&tmp, "new content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_order_state_round_trip() {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("a.kicad_sch");
        let order = v(&["MPN", "Supplier", "Tolerance"]);

        save_order_state(&doc, &order).unwrap();
        assert_eq!(load_order_state(&doc), Some(order));
    }

    #[test]
    fn test_order_state_file_shape() {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("a.kicad_sch");
        save_order_state(&doc, &v(&["MPN"])).unwrap();

        let contents = fs::read_to_string(state_path_for(&doc)).unwrap();
        let state: OrderState = serde_json::from_str(&contents).unwrap();
        assert_eq!(state.order, v(&["MPN"]));
        assert!(state.schema.ends_with("a.kicad_sch"));
        assert!(!state.updated.is_empty());
    }

    #[test]
    fn test_load_accepts_legacy_bare_array() {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("a.kicad_sch");
        fs::write(state_path_for(&doc), r#"["MPN", "Supplier"]"#).unwrap();

        assert_eq!(load_order_state(&doc), Some(v(&["MPN", "Supplier"])));
    }

    #[test]
    fn test_load_missing_or_corrupt_is_none() {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("a.kicad_sch");
        assert_eq!(load_order_state(&doc), None);

        fs::write(state_path_for(&doc), "not json at all").unwrap();
        assert_eq!(load_order_state(&doc), None);

        fs::write(state_path_for(&doc), r#"{"no_order": true}"#).unwrap();
        assert_eq!(load_order_state(&doc), None);

        fs::write(state_path_for(&doc), r#""just a string""#).unwrap();
        assert_eq!(load_order_state(&doc), None);
    }

    #[test]
    fn test_reset_order_state() {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("a.kicad_sch");
        assert!(!reset_order_state(&doc));

        save_order_state(&doc, &v(&["MPN"])).unwrap();
        assert!(reset_order_state(&doc));
        assert!(!state_path_for(&doc).exists());
    }
}
