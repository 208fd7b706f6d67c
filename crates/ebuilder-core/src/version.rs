//! Maven version comparison.
//!
//! Follows the ordering of Maven's `ComparableVersion` closely enough for
//! range checks: numeric segments compare numerically at any length, known
//! qualifiers compare by their release order, trailing zero segments are
//! insignificant.

use std::cmp::Ordering;

/// Compares two Maven version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_items = split_version(a);
    let b_items = split_version(b);

    let max_len = a_items.len().max(b_items.len());
    for i in 0..max_len {
        let ord = compare_item(a_items.get(i), b_items.get(i));
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}

/// Returns true when `min <= version <= max`.
pub fn in_range(version: &str, min: &str, max: &str) -> bool {
    compare_versions(version, min) != Ordering::Less
        && compare_versions(version, max) != Ordering::Greater
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Digits without leading zeros; `0` is the empty string.
    Number(String),
    Qualifier(String),
}

impl Item {
    fn is_null(&self) -> bool {
        match self {
            Self::Number(n) => n.is_empty(),
            Self::Qualifier(q) => qualifier_rank(q).0 == RELEASE_RANK,
        }
    }
}

const RELEASE_RANK: u8 = 5;

/// Release order of a qualifier. Unknown qualifiers sort after every known
/// one, lexically among themselves.
fn qualifier_rank(qualifier: &str) -> (u8, &str) {
    match qualifier {
        "alpha" | "a" => (0, ""),
        "beta" | "b" => (1, ""),
        "milestone" | "m" => (2, ""),
        "rc" | "cr" => (3, ""),
        "snapshot" => (4, ""),
        "" | "ga" | "final" | "release" => (RELEASE_RANK, ""),
        "sp" => (6, ""),
        other => (7, other),
    }
}

/// Splits a version into items.
///
/// `-` opens a new group; trailing null items (`0`, `final`, ...) of each
/// group are dropped so `1.0.0-beta` and `1-beta` are equal. A switch
/// between digits and letters also separates items (`1.0rc1`).
fn split_version(v: &str) -> Vec<Item> {
    let lower = v.trim().to_lowercase();
    let mut items = Vec::new();

    for group in lower.split('-') {
        let mut group_items = Vec::new();
        for segment in group.split('.') {
            push_segment(segment, &mut group_items);
        }
        while group_items.last().is_some_and(Item::is_null) {
            group_items.pop();
        }
        items.extend(group_items);
    }

    items
}

fn push_segment(segment: &str, out: &mut Vec<Item>) {
    let mut start = 0;
    let mut prev_digit: Option<bool> = None;

    for (i, c) in segment.char_indices() {
        let digit = c.is_ascii_digit();
        if prev_digit.is_some_and(|p| p != digit) {
            out.push(make_item(&segment[start..i]));
            start = i;
        }
        prev_digit = Some(digit);
    }

    if start < segment.len() {
        out.push(make_item(&segment[start..]));
    }
}

fn make_item(token: &str) -> Item {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        Item::Number(token.trim_start_matches('0').to_string())
    } else {
        Item::Qualifier(token.trim_start_matches('_').to_string())
    }
}

/// Orders digit strings without leading zeros by magnitude.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_item(a: Option<&Item>, b: Option<&Item>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(Item::Number(x)), Some(Item::Number(y))) => compare_numbers(x, y),
        (Some(Item::Number(_)), Some(Item::Qualifier(_))) => Ordering::Greater,
        (Some(Item::Qualifier(_)), Some(Item::Number(_))) => Ordering::Less,
        (Some(Item::Qualifier(x)), Some(Item::Qualifier(y))) => {
            qualifier_rank(x).cmp(&qualifier_rank(y))
        }
        (Some(Item::Number(x)), None) => {
            if x.is_empty() {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
        (Some(Item::Qualifier(x)), None) => qualifier_rank(x).cmp(&qualifier_rank("")),
        (None, Some(_)) => compare_item(b, a).reverse(),
    }
}
