//! Narrows the catalog down to what the filter grid shows.

use super::{Category, FilterDescriptor};

/// Filters in `category` whose name contains `search`, ignoring case.
///
/// The term is used exactly as typed; only the empty string matches
/// everything in the category. Catalog order is kept.
pub fn select<'a>(
    filters: &'a [FilterDescriptor],
    category: Category,
    search: &str,
) -> Vec<&'a FilterDescriptor> {
    let needle = search.to_lowercase();
    filters
        .iter()
        .filter(|filter| filter.category() == category)
        .filter(|filter| needle.is_empty() || filter.name().to_lowercase().contains(&needle))
        .collect()
}
