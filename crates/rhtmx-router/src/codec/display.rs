//! Human-readable summaries of listing state for UI badges
//!
//! Display only; nothing here is ever decoded.

use crate::listing::{ListingState, SortDirection};

/// Summarizes active filters and the search query
///
/// ```
/// use rhtmx_router::{render_filters, ListingState};
///
/// let state = ListingState::new(20)
///     .with_filter("status", "active")
///     .with_search("bob");
/// assert_eq!(render_filters(&state), "status: active, search: \"bob\"");
/// ```
pub fn render_filters(state: &ListingState) -> String {
    let mut parts: Vec<String> = state
        .filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect();

    if let Some(query) = state.search_query.as_deref().filter(|q| !q.is_empty()) {
        parts.push(format!("search: \"{}\"", query));
    }

    parts.join(", ")
}

/// Summarizes the active sort, empty when unsorted
///
/// ```
/// use rhtmx_router::{render_sort, ListingState, SortDirection};
///
/// let state = ListingState::new(20).with_sort("title", SortDirection::Desc);
/// assert_eq!(render_sort(&state), "title (descending)");
/// ```
pub fn render_sort(state: &ListingState) -> String {
    match &state.sort {
        Some(sort) => {
            let direction = match sort.direction {
                SortDirection::Asc => "ascending",
                SortDirection::Desc => "descending",
            };
            format!("{} ({})", sort.column, direction)
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_filters_empty() {
        assert_eq!(render_filters(&ListingState::new(20)), "");
    }

    #[test]
    fn test_render_filters_structured() {
        let state = ListingState::new(20)
            .with_filter("tags", json!(["a", "b"]))
            .with_filter("owner", "me");
        assert_eq!(render_filters(&state), "owner: me, tags: [\"a\",\"b\"]");
    }

    #[test]
    fn test_render_sort() {
        assert_eq!(render_sort(&ListingState::new(20)), "");
        let state = ListingState::new(20).with_sort("name", SortDirection::Asc);
        assert_eq!(render_sort(&state), "name (ascending)");
    }
}
