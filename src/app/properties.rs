use std::collections::HashSet;

use super::order::norm;
use super::scanner::{find_block_end, find_symbol_bounds, property_start_re};

/// KiCad system/meta field names that are never reordered.
const DEFAULT_PROTECTED: &[&str] = &[
    "ki_keywords",
    "ki_fp_filters",
    "ki_description",
    "name",
    "reference",
    "value",
    "footprint",
    "datasheet",
    "description",
];

/// The set of property names excluded from reordering.
///
/// Membership is case-insensitive and whitespace-trimmed. The default set
/// covers KiCad's core and internal metadata fields; callers may extend it.
#[derive(Debug, Clone)]
pub struct ProtectedSet {
    keys: HashSet<String>,
}

impl Default for ProtectedSet {
    fn default() -> Self {
        Self {
            keys: DEFAULT_PROTECTED.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl ProtectedSet {
    pub fn empty() -> Self {
        Self { keys: HashSet::new() }
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, names: I) {
        self.keys.extend(names.into_iter().map(|n| norm(&n)));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&norm(name))
    }

    /// Protected names in effect, sorted for display.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys.iter().cloned().collect();
        names.sort();
        names
    }
}

/// One `(property "NAME" "VALUE" ...)` record inside a symbol block.
///
/// `lines` is the record's full source slice, line endings included, so a
/// record can be moved without altering a single byte of its text.
#[derive(Debug, Clone)]
pub struct PropertyRecord {
    pub name: String,
    pub lines: Vec<String>,
    pub start: usize,
    pub end: usize,
    pub protected: bool,
}

/// Extract every property record between lines `s0` and `s1` inclusive.
///
/// Records may span multiple lines; their end is found with the same
/// depth-tracking scan used for symbol blocks, bounded by `s1`.
pub fn extract_properties(
    lines: &[String],
    s0: usize,
    s1: usize,
    protected: &ProtectedSet,
) -> Vec<PropertyRecord> {
    let mut props = Vec::new();
    let mut i = s0;
    while i <= s1 && i < lines.len() {
        if let Some(caps) = property_start_re().captures(&lines[i]) {
            let end = find_block_end(lines, i, Some(s1));
            let name = caps[1].to_string();
            props.push(PropertyRecord {
                protected: protected.contains(&name),
                name,
                lines: lines[i..=end].to_vec(),
                start: i,
                end,
            });
            i = end + 1;
        } else {
            i += 1;
        }
    }
    props
}

/// The non-protected subset of `props`, in document order.
pub fn user_properties(props: &[PropertyRecord]) -> Vec<PropertyRecord> {
    props.iter().filter(|p| !p.protected).cloned().collect()
}

/// Distinct user field names present anywhere in the document.
///
/// De-duplicated case-insensitively; the first spelling encountered while
/// walking symbol blocks in document order becomes the canonical label.
pub fn collect_present_names(lines: &[String], protected: &ProtectedSet) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for (s0, s1) in find_symbol_bounds(lines) {
        for prop in extract_properties(lines, s0, s1, protected) {
            if !prop.protected && seen.insert(norm(&prop.name)) {
                names.push(prop.name);
            }
        }
    }
    names
}
