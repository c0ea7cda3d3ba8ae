use gigsearch_core::types::ListingRecord;

/// Case-insensitive substring match over title, description, category and
/// provider name. `needle` must already be lowercased; an empty needle matches
/// everything.
pub fn matches_text(record: &ListingRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let fields = [
        Some(record.title.as_str()),
        Some(record.description.as_str()),
        Some(record.category.as_str()),
        record.provider.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(needle))
}

/// Lowercased, trimmed query text; whitespace-only queries become empty.
pub fn normalize_query(text: &str) -> String {
    text.trim().to_lowercase()
}
