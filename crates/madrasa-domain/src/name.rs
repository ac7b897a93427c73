//! Catalogue name normalization (departments, subjects, stipends).

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key for case-insensitive uniqueness: normalized and lower-cased.
pub fn name_key(raw: &str) -> String {
    normalize_name(raw).to_lowercase()
}
