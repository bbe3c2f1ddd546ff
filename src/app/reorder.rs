use super::order::norm;
use super::properties::{extract_properties, user_properties, ProtectedSet, PropertyRecord};
use super::scanner::find_symbol_bounds;

/// Arrange one block's user properties to match `target`.
///
/// Each target name claims the first not-yet-selected record with a matching
/// key, so duplicate names inside a block are matched at most once per target
/// occurrence, in document order. Unmatched records follow in their original
/// relative order. Returns `None` when the resulting name sequence is
/// identical to the original, so the caller can leave the block untouched.
pub fn reorder_block<'a>(
    user_props: &'a [PropertyRecord],
    target: &[String],
) -> Option<Vec<&'a PropertyRecord>> {
    let mut selected = vec![false; user_props.len()];
    let mut ordered = Vec::with_capacity(user_props.len());

    for wanted in target {
        let key = norm(wanted);
        for (idx, prop) in user_props.iter().enumerate() {
            if !selected[idx] && norm(&prop.name) == key {
                ordered.push(prop);
                selected[idx] = true;
                break;
            }
        }
    }
    for (idx, prop) in user_props.iter().enumerate() {
        if !selected[idx] {
            ordered.push(prop);
        }
    }

    // Only the name sequence decides "changed": record text never varies
    // under reordering.
    let unchanged = ordered
        .iter()
        .zip(user_props.iter())
        .all(|(a, b)| a.name == b.name);
    if unchanged { None } else { Some(ordered) }
}

/// Result of rewriting a whole document against a target order.
#[derive(Debug)]
pub struct RewriteOutcome {
    pub changed: bool,
    /// Per-target-name match counts across every (block, record) pair,
    /// in target order.
    pub hits: Vec<(String, usize)>,
    pub symbols_touched: usize,
    pub lines: Vec<String>,
}

impl RewriteOutcome {
    /// Target names that matched no record in any symbol block.
    pub fn zero_hit_names(&self) -> Vec<String> {
        self.hits
            .iter()
            .filter(|(_, count)| *count == 0)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Rewrite every symbol block so its user properties follow `target`.
///
/// Each block is mapped independently into either its original lines or a
/// reordered replacement, and the spans are concatenated in document order.
/// No shared buffer is spliced, so one block's rewrite can never invalidate
/// another block's line ranges.
pub fn rewrite_document(
    lines: &[String],
    target: &[String],
    protected: &ProtectedSet,
) -> RewriteOutcome {
    let bounds = find_symbol_bounds(lines);
    let mut hits: Vec<(String, usize)> = target.iter().map(|n| (n.clone(), 0)).collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut changed = false;
    let mut symbols_touched = 0;
    let mut cursor = 0;

    for (s0, s1) in bounds {
        out.extend_from_slice(&lines[cursor..s0]);

        let props = extract_properties(lines, s0, s1, protected);
        let user = user_properties(&props);
        for (name, count) in hits.iter_mut() {
            let key = norm(name);
            *count += user.iter().filter(|p| norm(&p.name) == key).count();
        }

        match reorder_block(&user, target) {
            Some(ordered) if !user.is_empty() => {
                out.extend_from_slice(&rebuild_block(lines, s0, s1, &user, &ordered));
                changed = true;
                symbols_touched += 1;
            }
            _ => out.extend_from_slice(&lines[s0..=s1]),
        }
        cursor = s1 + 1;
    }
    out.extend_from_slice(&lines[cursor..]);

    RewriteOutcome { changed, hits, symbols_touched, lines: out }
}

/// Rebuild one symbol block's lines with its user-property records replaced
/// by `ordered`. Lines outside the user-property ranges pass through
/// verbatim; the reordered records are inserted as one run at the first
/// original user-property line.
fn rebuild_block(
    lines: &[String],
    s0: usize,
    s1: usize,
    user: &[PropertyRecord],
    ordered: &[&PropertyRecord],
) -> Vec<String> {
    let Some(insert_at) = user.iter().map(|p| p.start).min() else {
        return lines[s0..=s1].to_vec();
    };
    let mut block = Vec::with_capacity(s1 - s0 + 1);
    let mut i = s0;
    while i <= s1 {
        if i == insert_at {
            for prop in ordered {
                block.extend_from_slice(&prop.lines);
            }
        }
        if let Some(prop) = user.iter().find(|p| p.start == i) {
            i = prop.end + 1;
        } else {
            block.push(lines[i].clone());
            i += 1;
        }
    }
    block
}
