//! Field-reorder engine for KiCad schematic files.
//!
//! # Structure
//!
//! - `scanner` - quote/escape-aware block delimiting over raw lines
//! - `properties` - property-record extraction and the protected-name set
//! - `order` - reconciliation of a stored order with the fields present
//! - `reorder` - the per-block transform and whole-document rewriter
//! - `document` / `persist` - line-preserving load, atomic commit with
//!   backup, and the per-schematic order-state file
//! - `workflow` - one reorder-and-commit cycle, as the CLI drives it

pub mod document;
pub mod error;
pub mod order;
pub mod persist;
pub mod properties;
pub mod reorder;
pub mod scanner;
pub mod workflow;

// Re-exports for convenient external access
pub use document::SchematicDocument;
pub use error::{AppError, Result};
pub use order::{norm, reconcile, Reconciled};
pub use persist::{
    backup_path_for, commit, load_order_state, save_order_state, state_path_for, CommitReceipt,
    OrderState,
};
pub use properties::{collect_present_names, extract_properties, ProtectedSet, PropertyRecord};
pub use reorder::{reorder_block, rewrite_document, RewriteOutcome};
pub use scanner::{find_block_end, find_symbol_bounds};
pub use workflow::{apply_order, inspect, reset_order, ApplyReport, InspectReport};
