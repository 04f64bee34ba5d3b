//! Per-listing UI state carried in the URI
//!
//! A [`ListingState`] is hydrated from path tokens on every request and never
//! stored server-side. Mutators consume nothing and return a new state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::codec::token::{is_valid_name, strip_controls};

/// Current page of a listing, or the count-only sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// 1-based page number (never zero)
    Number(u32),
    /// Caller only wants `(total, per_page)`, not rows
    Total,
}

impl Page {
    /// Creates a page number, clamping zero to the first page
    pub fn number(n: u32) -> Self {
        Page::Number(n.max(1))
    }

    /// Returns the page number, `None` for the total sentinel
    pub fn as_number(&self) -> Option<u32> {
        match self {
            Page::Number(n) => Some(*n),
            Page::Total => None,
        }
    }

    pub fn is_total(&self) -> bool {
        matches!(self, Page::Total)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Number(1)
    }
}

/// Sort direction of a listing column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Parses `asc`/`desc` (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    /// The opposite direction, used by column headers that toggle on click
    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active sort column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Value of a single filter
///
/// Scalars travel as `filterval-*` tokens, structured values as embedded JSON
/// in `filterjson-*` tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(String),
    Structured(serde_json::Value),
}

impl FilterValue {
    /// Empty values are never encoded; setting one removes the filter instead
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Scalar(s) => s.is_empty(),
            FilterValue::Structured(v) => v.is_null(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Scalar(s) => Some(s),
            FilterValue::Structured(_) => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Scalar(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Scalar(value)
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => FilterValue::Scalar(s),
            other => FilterValue::Structured(other),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Scalar(s) => f.write_str(s),
            FilterValue::Structured(v) => write!(f, "{}", v),
        }
    }
}

/// Filter, sort, search and pagination state of one listing screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingState {
    pub page: Page,
    pub per_page: u32,
    /// Ordered by name so encoding is deterministic
    pub filters: BTreeMap<String, FilterValue>,
    pub sort: Option<Sort>,
    pub search_query: Option<String>,
}

impl ListingState {
    /// Creates an empty state on page 1
    pub fn new(per_page: u32) -> Self {
        Self {
            page: Page::default(),
            per_page: per_page.max(1),
            filters: BTreeMap::new(),
            sort: None,
            search_query: None,
        }
    }

    /// Returns a copy with `name` set to `value`
    ///
    /// An empty value removes the filter. Changing filters goes back to page 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_router::ListingState;
    ///
    /// let state = ListingState::new(20).with_filter("status", "active");
    /// assert_eq!(state.filter("status").and_then(|v| v.as_str()), Some("active"));
    ///
    /// let cleared = state.with_filter("status", "");
    /// assert!(cleared.filters.is_empty());
    /// ```
    pub fn with_filter(&self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        let name = name.into();
        let value = value.into();
        let mut next = self.clone();
        if value.is_empty() {
            next.filters.remove(&name);
        } else {
            next.filters.insert(name, value);
        }
        next.page = Page::default();
        next
    }

    /// Returns a copy without the named filter
    pub fn without_filter(&self, name: &str) -> Self {
        let mut next = self.clone();
        if next.filters.remove(name).is_some() {
            next.page = Page::default();
        }
        next
    }

    pub fn with_sort(&self, column: impl Into<String>, direction: SortDirection) -> Self {
        let mut next = self.clone();
        next.sort = Some(Sort::new(column, direction));
        next
    }

    /// Returns a copy with the search query set; an empty query clears it
    pub fn with_search(&self, query: impl Into<String>) -> Self {
        let query = query.into();
        let mut next = self.clone();
        next.search_query = if query.is_empty() { None } else { Some(query) };
        next.page = Page::default();
        next
    }

    pub fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        next.page = Page::number(page);
        next
    }

    /// Returns a copy carrying the count-only sentinel
    pub fn requesting_total(&self) -> Self {
        let mut next = self.clone();
        next.page = Page::Total;
        next
    }

    pub fn is_total_request(&self) -> bool {
        self.page.is_total()
    }

    pub fn filter(&self, name: &str) -> Option<&FilterValue> {
        self.filters.get(name)
    }

    /// True when any filter, sort or search is active
    pub fn has_state(&self) -> bool {
        !self.filters.is_empty() || self.sort.is_some() || self.search_query.is_some()
    }

    /// Zero-based row offset of the current page (0 for the total sentinel)
    pub fn offset(&self) -> u64 {
        match self.page {
            Page::Number(n) => u64::from(n.saturating_sub(1)) * u64::from(self.per_page),
            Page::Total => 0,
        }
    }

    /// The state as it looks after a trip through the URI
    ///
    /// The total sentinel becomes page 1, control characters are stripped
    /// from scalar values, and empty or unencodable filters and empty
    /// searches disappear.
    pub fn normalized(&self) -> Self {
        let mut next = self.clone();
        if next.page.is_total() {
            next.page = Page::default();
        }
        for value in next.filters.values_mut() {
            if let FilterValue::Scalar(s) = value {
                *s = strip_controls(s).into_owned();
            }
        }
        next.filters
            .retain(|name, value| is_valid_name(name) && !value.is_empty());
        next.search_query = next
            .search_query
            .as_deref()
            .map(|q| strip_controls(q).into_owned())
            .filter(|q| !q.is_empty());
        if next
            .sort
            .as_ref()
            .is_some_and(|sort| !is_valid_name(&sort.column))
        {
            next.sort = None;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_number_clamps_zero() {
        assert_eq!(Page::number(0), Page::Number(1));
        assert_eq!(Page::number(4).as_number(), Some(4));
        assert_eq!(Page::Total.as_number(), None);
    }

    #[test]
    fn test_with_filter_is_non_destructive() {
        let base = ListingState::new(20).with_page(3);
        let filtered = base.with_filter("status", "active");

        assert!(base.filters.is_empty());
        assert_eq!(base.page, Page::Number(3));
        assert_eq!(filtered.page, Page::Number(1));
        assert_eq!(filtered.filter("status"), Some(&FilterValue::from("active")));
    }

    #[test]
    fn test_without_filter() {
        let state = ListingState::new(20)
            .with_filter("status", "active")
            .with_filter("owner", "me")
            .with_page(2);

        let next = state.without_filter("status");
        assert!(next.filter("status").is_none());
        assert!(next.filter("owner").is_some());
        assert_eq!(next.page, Page::Number(1));

        // Removing an absent filter keeps the page
        assert_eq!(state.without_filter("missing").page, Page::Number(2));
    }

    #[test]
    fn test_structured_filter_from_json() {
        let state = ListingState::new(20).with_filter("tags", json!(["a", "b"]));
        assert_eq!(
            state.filter("tags"),
            Some(&FilterValue::Structured(json!(["a", "b"])))
        );

        // JSON strings collapse to scalars
        let state = state.with_filter("name", json!("bob"));
        assert_eq!(state.filter("name"), Some(&FilterValue::from("bob")));
    }

    #[test]
    fn test_total_request() {
        let state = ListingState::new(20).requesting_total();
        assert!(state.is_total_request());
        assert_eq!(state.offset(), 0);
        assert_eq!(state.normalized().page, Page::Number(1));
    }

    #[test]
    fn test_offset() {
        assert_eq!(ListingState::new(25).with_page(3).offset(), 50);
        assert_eq!(ListingState::new(25).offset(), 0);
    }

    #[test]
    fn test_normalized_drops_unencodable_state() {
        let mut state = ListingState::new(20).with_filter("ok", "1");
        state
            .filters
            .insert("bad-name".to_string(), FilterValue::from("x"));
        state.filters.insert("empty".to_string(), FilterValue::from(""));
        state.search_query = Some(String::new());

        let normalized = state.normalized();
        assert_eq!(normalized.filters.len(), 1);
        assert!(normalized.search_query.is_none());
    }

    #[test]
    fn test_normalized_strips_control_characters() {
        let state = ListingState::new(20)
            .with_filter("note", "line\nbreak")
            .with_filter("bell", "\u{7}")
            .with_search("\tq");

        let normalized = state.normalized();
        assert_eq!(normalized.filter("note"), Some(&FilterValue::from("linebreak")));
        assert!(normalized.filter("bell").is_none());
        assert_eq!(normalized.search_query.as_deref(), Some("q"));
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("up"), None);
        assert_eq!(SortDirection::Asc.reversed(), SortDirection::Desc);
    }
}
