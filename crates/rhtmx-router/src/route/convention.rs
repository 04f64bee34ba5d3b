//! Convention-based segment splitting
//!
//! `/{realm?}/{controller}/{action}/{params...}`, with defaults backfilled
//! and an implicit page injected in front of encoded listing state.

use std::collections::HashSet;

use super::{ResolvedRoute, RouteDefaults, RouteMatcher};
use crate::codec::token::{detect_filter, is_numeric};
use crate::path;

/// Always-matching fallback, last in every resolver
#[derive(Debug, Clone)]
pub struct ConventionRoute {
    realms: HashSet<String>,
    defaults: RouteDefaults,
}

impl ConventionRoute {
    pub fn new(realms: HashSet<String>, defaults: RouteDefaults) -> Self {
        Self { realms, defaults }
    }
}

impl RouteMatcher for ConventionRoute {
    fn try_match(&self, uri: &str) -> Option<ResolvedRoute> {
        Some(split(uri, &self.realms, &self.defaults))
    }
}

/// Splits a sanitized URI by convention
///
/// - no segments: default controller and action
/// - one segment `X`: default controller, page action, `params = [X]`
/// - two or more: controller, action, rest as params
///
/// A leading known realm is consumed first. When the first parameter is an
/// encoded state token, `"1"` is prepended so handlers taking
/// `(page, ...)` keep their positions.
///
/// # Examples
///
/// ```
/// use rhtmx_router::route::convention::split;
/// use rhtmx_router::RouteDefaults;
/// use std::collections::HashSet;
///
/// let route = split("/blog/list/filterval-status-1", &HashSet::new(), &RouteDefaults::default());
/// assert_eq!(route.params, vec!["1", "filterval-status-1"]);
/// ```
pub fn split(uri: &str, realms: &HashSet<String>, defaults: &RouteDefaults) -> ResolvedRoute {
    let mut segments: Vec<&str> = path::segments(uri).collect();

    let realm = match segments.first() {
        Some(first) if realms.contains(*first) => segments.remove(0).to_string(),
        _ => String::new(),
    };

    let (controller, action, mut params) = match segments.as_slice() {
        [] => (
            defaults.controller.clone(),
            defaults.action.clone(),
            Vec::new(),
        ),
        [single] => (
            defaults.controller.clone(),
            defaults.page_action.clone(),
            vec![single.to_string()],
        ),
        [controller, action, rest @ ..] => (
            controller.to_string(),
            action.to_string(),
            rest.iter().map(|s| s.to_string()).collect(),
        ),
    };

    if params
        .first()
        .is_some_and(|first| !is_numeric(first) && detect_filter(first))
    {
        params.insert(0, "1".to_string());
    }

    ResolvedRoute::new(realm, controller, action, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn realms() -> HashSet<String> {
        ["admin", "api"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_path() {
        let route = split("", &realms(), &RouteDefaults::default());
        assert_eq!(route, ResolvedRoute::new("", "index", "index", Vec::new()));
    }

    #[test]
    fn test_realm_only() {
        let route = split("/admin", &realms(), &RouteDefaults::default());
        assert_eq!(route, ResolvedRoute::new("admin", "index", "index", Vec::new()));
    }

    #[test]
    fn test_single_segment_goes_to_page_action() {
        let route = split("/about", &realms(), &RouteDefaults::default());
        assert_eq!(
            route,
            ResolvedRoute::new("", "index", "page", vec!["about".to_string()])
        );
    }

    #[test]
    fn test_unknown_first_segment_is_not_a_realm() {
        let route = split("/shop/items/list", &realms(), &RouteDefaults::default());
        assert_eq!(route.realm, "");
        assert_eq!(route.controller, "shop");
        assert_eq!(route.action, "items");
        assert_eq!(route.params, vec!["list".to_string()]);
    }

    #[test]
    fn test_page_injection_skips_numeric_first_param() {
        let route = split(
            "/blog/list/2/filterval-status-1",
            &realms(),
            &RouteDefaults::default(),
        );
        assert_eq!(route.params, vec!["2", "filterval-status-1"]);
    }

    #[test]
    fn test_page_injection_for_single_token_segment() {
        let route = split("/api/sort-name-asc", &realms(), &RouteDefaults::default());
        assert_eq!(route.realm, "api");
        assert_eq!(route.action, "page");
        assert_eq!(route.params, vec!["1", "sort-name-asc"]);
    }
}
