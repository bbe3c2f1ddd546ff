use std::path::Path;

use super::document::SchematicDocument;
use super::error::Result;
use super::order::{reconcile, Reconciled};
use super::persist::{commit, load_order_state, reset_order_state, save_order_state, CommitReceipt};
use super::properties::{collect_present_names, ProtectedSet};
use super::reorder::rewrite_document;

/// Everything a caller needs to report after one reorder-and-commit cycle.
#[derive(Debug)]
pub struct ApplyReport {
    pub changed: bool,
    pub symbols_touched: usize,
    pub removed: Vec<String>,
    pub added: Vec<String>,
    pub zero_hit_names: Vec<String>,
    pub final_order: Vec<String>,
    /// `None` when the document needed no rewrite.
    pub receipt: Option<CommitReceipt>,
}

/// A read-only view of a schematic's fields and saved order.
#[derive(Debug)]
pub struct InspectReport {
    pub present: Vec<String>,
    pub reconciled: Reconciled,
    pub has_saved_order: bool,
}

/// Pick the target order for a run: an explicit caller order wins, else the
/// saved state file, else the names as found in the document.
fn initial_order(doc_path: &Path, explicit: Option<&[String]>) -> Vec<String> {
    match explicit {
        Some(order) => order.to_vec(),
        None => load_order_state(doc_path).unwrap_or_default(),
    }
}

/// List present fields and the order that would apply, without touching disk.
pub fn inspect(doc_path: &Path, protected: &ProtectedSet) -> Result<InspectReport> {
    let doc = SchematicDocument::load(doc_path)?;
    let present = collect_present_names(&doc.lines, protected);
    let saved = load_order_state(doc_path);
    let reconciled = reconcile(saved.as_deref().unwrap_or_default(), &present);
    Ok(InspectReport {
        present,
        reconciled,
        has_saved_order: saved.is_some(),
    })
}

/// Reorder every symbol block of the schematic at `doc_path` and commit.
///
/// The target order is reconciled against the names actually present
/// immediately before the write, so the persisted state never references a
/// field the document no longer has. The document is only rewritten when at
/// least one block actually changes; the state file is refreshed either way.
pub fn apply_order(
    doc_path: &Path,
    explicit: Option<&[String]>,
    protected: &ProtectedSet,
) -> Result<ApplyReport> {
    let doc = SchematicDocument::load(doc_path)?;
    let present = collect_present_names(&doc.lines, protected);
    let current = initial_order(doc_path, explicit);
    let Reconciled { order, removed, added } = reconcile(&current, &present);

    let outcome = rewrite_document(&doc.lines, &order, protected);
    let receipt = if outcome.changed {
        Some(commit(doc_path, &outcome.lines.concat())?)
    } else {
        None
    };
    save_order_state(doc_path, &order)?;

    Ok(ApplyReport {
        changed: outcome.changed,
        symbols_touched: outcome.symbols_touched,
        removed,
        added,
        zero_hit_names: outcome.zero_hit_names(),
        final_order: order,
        receipt,
    })
}

/// Re-seed the saved order from the fields currently in the document.
pub fn reset_order(doc_path: &Path, protected: &ProtectedSet) -> Result<Vec<String>> {
    let doc = SchematicDocument::load(doc_path)?;
    let present = collect_present_names(&doc.lines, protected);
    reset_order_state(doc_path);
    save_order_state(doc_path, &present)?;
    Ok(present)
}
