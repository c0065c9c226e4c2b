// src/store/pattern.rs
//! Turns a user's search text into a `LIKE` pattern.
//!
//! `%`, `_` and the escape character itself are matched literally. The
//! user-facing wildcards `*` (any run of characters) and `?` (one character)
//! map onto their `LIKE` counterparts. The whole pattern is wrapped in `%..%`
//! so the query matches anywhere in the name.

/// Escape character declared in every `LIKE .. ESCAPE` clause built from these patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Build a case-folded substring pattern for `ref_name_folded LIKE ? ESCAPE '\'`.
pub fn substring_pattern(query: &str) -> String {
    let folded = query.to_lowercase();
    let mut pattern = String::with_capacity(folded.len() + 2);
    pattern.push('%');
    for ch in folded.chars() {
        match ch {
            '%' | '_' | LIKE_ESCAPE => {
                pattern.push(LIKE_ESCAPE);
                pattern.push(ch);
            }
            '*' => pattern.push('%'),
            '?' => pattern.push('_'),
            other => pattern.push(other),
        }
    }
    pattern.push('%');
    pattern
}

/// Case folding applied to names before they are stored in `ref_name_folded`.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}
