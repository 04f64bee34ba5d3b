//! Route Resolver
//!
//! Resolution is a flat, ordered list of [`RouteMatcher`]s: regex overrides
//! first, in configuration order, then the always-matching convention
//! fallback. First match wins. Resolution never fails.

pub mod convention;
pub mod pattern;

use std::collections::HashSet;

pub use convention::ConventionRoute;
pub use pattern::OverrideRoute;

/// The handler tuple a URI resolves to
///
/// `controller` and `action` are never empty; `realm` is the empty string
/// when the URI has no realm prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedRoute {
    pub realm: String,
    pub controller: String,
    pub action: String,
    /// Positional parameters, in URI order
    pub params: Vec<String>,
    /// Whether `params[0]` is the page slot when listing state follows.
    /// Convention routes always have one; override captures never do.
    pub page_slot: bool,
}

impl ResolvedRoute {
    pub fn new(
        realm: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
        params: Vec<String>,
    ) -> Self {
        Self {
            realm: realm.into(),
            controller: controller.into(),
            action: action.into(),
            params,
            page_slot: true,
        }
    }

    /// Marks `params` as purely positional, with no page slot
    pub fn without_page_slot(mut self) -> Self {
        self.page_slot = false;
        self
    }

    /// Route to the default controller and action
    pub fn root(defaults: &RouteDefaults) -> Self {
        Self::new("", &defaults.controller, &defaults.action, Vec::new())
    }

    pub fn has_realm(&self) -> bool {
        !self.realm.is_empty()
    }

    /// Fills an empty controller or action from the defaults
    pub fn backfill(mut self, defaults: &RouteDefaults) -> Self {
        if self.controller.is_empty() {
            self.controller = defaults.controller.clone();
        }
        if self.action.is_empty() {
            self.action = defaults.action.clone();
        }
        self
    }
}

/// Fallback names used when a URI does not spell them out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefaults {
    pub controller: String,
    pub action: String,
    /// Action that receives a single bare segment (`/about` → `page("about")`)
    pub page_action: String,
}

impl Default for RouteDefaults {
    fn default() -> Self {
        Self {
            controller: "index".to_string(),
            action: "index".to_string(),
            page_action: "page".to_string(),
        }
    }
}

/// One entry of the resolver's ordered matcher list
pub trait RouteMatcher: Send + Sync {
    /// Resolves `uri` or passes (`None`) to the next matcher
    fn try_match(&self, uri: &str) -> Option<ResolvedRoute>;
}

/// Ordered matcher list with the convention fallback last
///
/// # Examples
///
/// ```
/// use rhtmx_router::{OverrideRoute, Resolver, RouteDefaults};
/// use std::collections::HashSet;
///
/// let realms: HashSet<String> = ["admin".to_string()].into_iter().collect();
/// let about = OverrideRoute::new(r"^/about-us$", "", "pages", "about").unwrap();
/// let resolver = Resolver::new(vec![about], realms, RouteDefaults::default());
///
/// let route = resolver.resolve("/about-us");
/// assert_eq!((route.controller.as_str(), route.action.as_str()), ("pages", "about"));
///
/// let route = resolver.resolve("/admin/users/edit/7");
/// assert_eq!(route.realm, "admin");
/// assert_eq!(route.params, vec!["7"]);
/// ```
pub struct Resolver {
    matchers: Vec<Box<dyn RouteMatcher>>,
    defaults: RouteDefaults,
}

impl Resolver {
    pub fn new(
        overrides: Vec<OverrideRoute>,
        realms: HashSet<String>,
        defaults: RouteDefaults,
    ) -> Self {
        let mut matchers: Vec<Box<dyn RouteMatcher>> = overrides
            .into_iter()
            .map(|route| Box::new(route.with_defaults(&defaults)) as Box<dyn RouteMatcher>)
            .collect();
        matchers.push(Box::new(ConventionRoute::new(realms, defaults.clone())));

        Self { matchers, defaults }
    }

    /// Inserts a custom matcher ahead of the convention fallback
    pub fn with_matcher(mut self, matcher: impl RouteMatcher + 'static) -> Self {
        let fallback = self.matchers.len().saturating_sub(1);
        self.matchers.insert(fallback, Box::new(matcher));
        self
    }

    pub fn defaults(&self) -> &RouteDefaults {
        &self.defaults
    }

    /// Resolves a sanitized URI
    pub fn resolve(&self, uri: &str) -> ResolvedRoute {
        self.matchers
            .iter()
            .find_map(|matcher| matcher.try_match(uri))
            .unwrap_or_else(|| ResolvedRoute::root(&self.defaults))
            .backfill(&self.defaults)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("matchers", &self.matchers.len())
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// Resolves a sanitized URI without building a [`Resolver`]
///
/// Overrides are tried in order; the first match returns immediately and
/// skips the convention rules (including page injection).
pub fn resolve(
    uri: &str,
    overrides: &[OverrideRoute],
    realms: &HashSet<String>,
    defaults: &RouteDefaults,
) -> ResolvedRoute {
    overrides
        .iter()
        .find_map(|route| route.try_match(uri))
        .unwrap_or_else(|| convention::split(uri, realms, defaults))
        .backfill(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl RouteMatcher for Fixed {
        fn try_match(&self, uri: &str) -> Option<ResolvedRoute> {
            (uri == "/health").then(|| ResolvedRoute::new("", "status", "health", Vec::new()))
        }
    }

    #[test]
    fn test_custom_matcher_runs_before_convention() {
        let resolver = Resolver::new(Vec::new(), HashSet::new(), RouteDefaults::default())
            .with_matcher(Fixed);

        assert_eq!(resolver.resolve("/health").controller, "status");
        assert_eq!(resolver.resolve("/users/list").controller, "users");
    }

    #[test]
    fn test_override_with_empty_target_is_backfilled() {
        let route = OverrideRoute::new(r"^/legacy$", "", "", "").unwrap();
        let defaults = RouteDefaults::default();

        let resolved = resolve("/legacy", &[route], &HashSet::new(), &defaults);
        assert_eq!(resolved.controller, "index");
        assert_eq!(resolved.action, "index");
    }

    #[test]
    fn test_root_route() {
        let route = ResolvedRoute::root(&RouteDefaults::default());
        assert!(!route.has_realm());
        assert!(route.params.is_empty());
    }
}
