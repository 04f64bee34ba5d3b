//! Regex override routes
//!
//! An override maps a regular expression over the sanitized URI straight to a
//! handler tuple. Capture groups become positional parameters.

use regex::Regex;

use super::{ResolvedRoute, RouteDefaults, RouteMatcher};
use crate::error::RouterError;

/// Statically configured regex → handler mapping
///
/// Patterns are matched against the sanitized URI as-is (leading `/`
/// included); anchoring is up to the pattern. Capture groups that did not
/// participate in the match yield empty strings so positions stay stable.
///
/// # Examples
///
/// ```
/// use rhtmx_router::{OverrideRoute, RouteMatcher};
///
/// let route = OverrideRoute::new(r"^/p/(\d+)/([a-z-]+)$", "", "posts", "show").unwrap();
/// let resolved = route.try_match("/p/42/hello-world").unwrap();
///
/// assert_eq!(resolved.controller, "posts");
/// assert_eq!(resolved.params, vec!["42", "hello-world"]);
/// assert!(route.try_match("/p/x").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct OverrideRoute {
    pattern: Regex,
    realm: String,
    controller: String,
    action: String,
}

impl OverrideRoute {
    pub fn new(
        pattern: &str,
        realm: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Result<Self, RouterError> {
        let compiled = Regex::new(pattern).map_err(|source| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: compiled,
            realm: realm.into(),
            controller: controller.into(),
            action: action.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Fills an empty controller or action from the defaults
    pub fn with_defaults(mut self, defaults: &RouteDefaults) -> Self {
        if self.controller.is_empty() {
            self.controller = defaults.controller.clone();
        }
        if self.action.is_empty() {
            self.action = defaults.action.clone();
        }
        self
    }
}

impl RouteMatcher for OverrideRoute {
    fn try_match(&self, uri: &str) -> Option<ResolvedRoute> {
        let captures = self.pattern.captures(uri)?;
        let params = captures
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();

        Some(
            ResolvedRoute::new(&self.realm, &self.controller, &self.action, params)
                .without_page_slot(),
        )
    }
}
