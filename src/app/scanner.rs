use std::sync::OnceLock;

use regex_lite::Regex;

/// Anchored opener for a top-level symbol block, leading whitespace allowed.
pub fn symbol_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^\s*\(symbol\b"#).unwrap())
}

/// Anchored opener for a property record: `(property "NAME" "VALUE"`.
pub fn property_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^\s*\(property\s+"([^"]+)"\s+"([^"]*)""#).unwrap())
}

/// Find the line on which the parenthesized block opened at `start` closes.
///
/// Tracks paren depth character by character, skipping parens inside quoted
/// strings. A backslash escapes the next character, so `\"` inside a value
/// does not end the string. If no matching close is found before `limit`
/// (malformed input), the limit line is returned rather than an error.
pub fn find_block_end(lines: &[String], start: usize, limit: Option<usize>) -> usize {
    let last = limit.unwrap_or(lines.len().saturating_sub(1));
    let mut depth: i32 = 0;
    let mut in_str = false;
    let mut esc = false;
    let mut seen_open = false;

    for (i, line) in lines.iter().enumerate().take(last + 1).skip(start) {
        for ch in line.chars() {
            if esc {
                esc = false;
                continue;
            }
            match ch {
                '\\' => esc = true,
                '"' => in_str = !in_str,
                '(' if !in_str => {
                    depth += 1;
                    seen_open = true;
                }
                ')' if !in_str => {
                    depth -= 1;
                    if seen_open && depth == 0 {
                        return i;
                    }
                }
                _ => {}
            }
        }
    }
    last
}

/// Locate every top-level symbol block as an inclusive `(start, end)` line range.
///
/// Scanning resumes immediately after each block, so symbol ranges never
/// overlap.
pub fn find_symbol_bounds(lines: &[String]) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if symbol_start_re().is_match(&lines[i]) {
            let j = find_block_end(lines, i, None);
            bounds.push((i, j));
            i = j + 1;
        } else {
            i += 1;
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_lines(text: &str) -> Vec<String> {
        text.lines().map(|l| format!("{}\n", l)).collect()
    }

    #[test]
    fn test_find_block_end_simple() {
        let lines = to_lines("(symbol \"R1\"\n  (property \"Value\" \"10k\")\n)");
        assert_eq!(find_block_end(&lines, 0, None), 2);
    }

    #[test]
    fn test_find_block_end_single_line() {
        let lines = to_lines("(property \"MPN\" \"ABC-123\")\nnext line");
        assert_eq!(find_block_end(&lines, 0, None), 0);
    }

    #[test]
    fn test_parens_inside_strings_ignored() {
        let lines = to_lines("(property \"Note\" \"see (datasheet) p.3\"\n)");
        assert_eq!(find_block_end(&lines, 0, None), 1);
    }

    #[test]
    fn test_escaped_quotes_do_not_perturb_depth() {
        // Value contains an escaped quote and a paren inside the string.
        let lines = to_lines("(property \"Note\" \"a \\\"quoted\\\" (paren)\"\n)");
        assert_eq!(find_block_end(&lines, 0, None), 1);
    }

    #[test]
    fn test_unbalanced_block_falls_back_to_limit() {
        let lines = to_lines("(symbol \"U1\"\n  (property \"A\" \"1\")\nno close here");
        assert_eq!(find_block_end(&lines, 0, None), 2);
        assert_eq!(find_block_end(&lines, 0, Some(1)), 1);
    }

    #[test]
    fn test_find_symbol_bounds_two_blocks() {
        let lines = to_lines(
            "(kicad_sch\n  (symbol \"R1\"\n    (pin 1)\n  )\n  (symbol \"R2\"\n  )\n)",
        );
        assert_eq!(find_symbol_bounds(&lines), vec![(1, 3), (4, 5)]);
    }

    #[test]
    fn test_find_symbol_bounds_ignores_other_blocks() {
        let lines = to_lines("(wire (pts))\n(junction)\n");
        assert!(find_symbol_bounds(&lines).is_empty());
    }

    #[test]
    fn test_symbol_opener_requires_word_boundary() {
        let lines = to_lines("(symbols \"not a symbol\")\n");
        assert!(find_symbol_bounds(&lines).is_empty());
    }
}
