//! Selectable records and locale-aware ordering of their labels.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Server-side primary key of a selectable record.
pub type ChoiceId = i64;

/// A record that can populate a selector level.
pub trait Choice {
    fn id(&self) -> ChoiceId;

    /// Display text; selectors are sorted on it.
    fn label(&self) -> &str;

    /// Text copied into a derived free-text field when this record is picked.
    fn canonical_text(&self) -> Option<&str> {
        None
    }
}

/// Compare two labels the way a Spanish-locale collator would for our data:
/// accents and case are ignored and `ñ` sorts after `n`.
///
/// Ties on the folded form fall back to the raw strings so the order is total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// Sort records by label, locale-aware.
pub fn sort_by_label<T: Choice>(items: &mut [T]) {
    items.sort_by(|a, b| locale_cmp(a.label(), b.label()));
}

/// True when labels are non-decreasing under [`locale_cmp`].
pub fn is_sorted_by_label<T: Choice>(items: &[T]) -> bool {
    items
        .windows(2)
        .all(|w| locale_cmp(w[0].label(), w[1].label()) != Ordering::Greater)
}

fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == 'ñ' || c == 'Ñ' {
            out.push('n');
            out.push(char::MAX);
            continue;
        }
        for d in c.nfd().filter(|d| !is_combining_mark(*d)) {
            out.extend(d.to_lowercase());
        }
    }
    out
}
