use std::collections::BTreeSet;

/// Delimiter separating items in an interest list
pub const INTEREST_DELIMITER: char = ',';

/// Normalize a free-text interest list before encoding
///
/// Splits on the delimiter, trims each item, drops empties, deduplicates
/// with set semantics, and rejoins. Items come back in sorted order so the
/// same set of interests always encodes to the same text, regardless of
/// how a row author ordered or spaced them.
pub fn normalize_interests(text: &str) -> String {
    let items: BTreeSet<&str> = text
        .split(INTEREST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();

    items.into_iter().collect::<Vec<_>>().join(",")
}
