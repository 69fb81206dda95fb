use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::LineCode;

/// Sort key for line codes: all-digit codes compare numerically and come
/// before any code containing other characters, which compare lexically.
///
/// Numeric codes are compared as digit strings without leading zeros,
/// shorter first, so arbitrarily long codes still order by value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LineKey<'a> {
    Numeric { width: usize, digits: &'a str },
    Text(&'a str),
}

impl<'a> LineKey<'a> {
    pub fn of(code: &'a str) -> Self {
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
            return LineKey::Text(code);
        }
        let digits = code.trim_start_matches('0');
        LineKey::Numeric {
            width: digits.len(),
            digits,
        }
    }
}

fn compare(a: &str, b: &str) -> Ordering {
    LineKey::of(a).cmp(&LineKey::of(b)).then_with(|| a.cmp(b))
}

/// Extracts the distinct line numbers from upstream line-variant records.
///
/// Only codes of the form `L<line>` count; the prefix is stripped.
pub fn normalize_lines(records: &[Value]) -> Vec<LineCode> {
    let unique: HashSet<&str> = records
        .iter()
        .filter_map(|record| record.get("code")?.as_str()?.strip_prefix('L'))
        .collect();

    let mut lines: Vec<LineCode> = unique.into_iter().map(str::to_string).collect();
    lines.sort_by(|a, b| compare(a, b));
    lines
}
