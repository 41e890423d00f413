//! Regex primitives for matching caller-supplied text.
//!
//! Namespaces and descriptor literals come from the command line and from
//! files on disk, so they are always escaped before being embedded in a
//! pattern. Replacement text is inserted verbatim (never `$`-expanded):
//! `$` is legal in JVM identifiers.

use crate::error::{Error, Result};
use regex::{Captures, Regex};

/// Escape every regex metacharacter in `text` so it matches literally.
pub fn escape_literal(text: &str) -> String {
    regex::escape(text)
}

/// Compile a pattern built from escaped fragments.
pub fn compile(pattern: &str, context: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        Error::internal_unexpected(format!("Invalid pattern for {}: {}", context, e))
    })
}

/// Byte ranges of the `group` capture across all patterns, in pattern order.
/// A range overlapping one already claimed by an earlier pattern is dropped.
pub fn capture_ranges(patterns: &[&Regex], group: &str, content: &str) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();

    for re in patterns {
        for caps in re.captures_iter(content) {
            let Some(m) = caps.name(group) else {
                continue;
            };
            let (start, end) = (m.start(), m.end());
            if ranges.iter().any(|&(s, e)| start < e && end > s) {
                continue;
            }
            ranges.push((start, end));
        }
    }

    ranges
}

/// Replace each range with `replacement`, back to front so offsets stay valid.
pub fn replace_ranges(content: &str, mut ranges: Vec<(usize, usize)>, replacement: &str) -> String {
    ranges.sort_by(|a, b| b.0.cmp(&a.0));

    let mut out = content.to_string();
    for (start, end) in ranges {
        out.replace_range(start..end, replacement);
    }
    out
}

/// Replace only the first match. Returns `None` when nothing matched.
pub fn replace_first<F>(re: &Regex, content: &str, replacement: F) -> Option<String>
where
    F: FnOnce(&Captures) -> String,
{
    let caps = re.captures(content)?;
    let whole = caps.get(0)?;

    let mut out = String::with_capacity(content.len());
    out.push_str(&content[..whole.start()]);
    out.push_str(&replacement(&caps));
    out.push_str(&content[whole.end()..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_literal_neutralizes_dots_and_dollars() {
        let re = compile(&escape_literal("com.acme$app"), "test").unwrap();
        assert!(re.is_match("com.acme$app"));
        assert!(!re.is_match("comXacme$app"));
    }

    #[test]
    fn replace_ranges_inserts_text_verbatim() {
        let re = compile(r"(?P<ns>old)", "test").unwrap();
        let ranges = capture_ranges(&[&re], "ns", "old old");
        assert_eq!(ranges, vec![(0, 3), (4, 7)]);
        assert_eq!(replace_ranges("old old", ranges, "$1new"), "$1new $1new");
    }

    #[test]
    fn later_patterns_cannot_claim_overlapping_ranges() {
        let long = compile(r"(?P<ns>a\.b)", "test").unwrap();
        let short = compile(r"(?P<ns>b)", "test").unwrap();
        let ranges = capture_ranges(&[&long, &short], "ns", "a.b b");
        assert_eq!(ranges, vec![(0, 3), (4, 5)]);
    }

    #[test]
    fn replace_first_touches_only_first_match() {
        let re = compile(r"(?m)^x", "test").unwrap();
        let out = replace_first(&re, "x1\nx2\n", |_| "y".to_string()).unwrap();
        assert_eq!(out, "y1\nx2\n");
        assert!(replace_first(&re, "none", |_| String::new()).is_none());
    }
}
