// File: src/navigator.rs
// Purpose: Per-request orchestration of routing, listing state and history

use crate::config::{NavConfig, RealmConfig};
use crate::cookies::CookieStore;
use crate::history::NavigationHistory;
use crate::pagination::{self, ListingHandler, TotalProbe};
use rhtmx_router::{sanitize, FilterValue, ListingState, ResolvedRoute, Resolver, UriCodec};
use std::collections::BTreeMap;

/// A request after sanitize → resolve → decode
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    /// Sanitized request path
    pub uri: String,
    /// Resolved handler; `params` holds only what the codec left over
    pub route: ResolvedRoute,
    pub state: ListingState,
}

impl NavigationRequest {
    pub fn params(&self) -> &[String] {
        &self.route.params
    }
}

/// Shared, read-only navigation services built from [`NavConfig`]
#[derive(Debug)]
pub struct Navigator {
    resolver: Resolver,
    codec: UriCodec,
    history: NavigationHistory,
    realms: BTreeMap<String, RealmConfig>,
    cookie_path: String,
}

impl Navigator {
    pub fn new(config: &NavConfig) -> Self {
        let codec = config.listing.codec();
        Self {
            resolver: config.routing.resolver(),
            codec,
            history: NavigationHistory::new(&config.history, codec),
            realms: config.routing.realms.clone(),
            cookie_path: config.history.path.clone(),
        }
    }

    /// Resolves a raw request path and hydrates its listing state
    pub fn prepare(&self, raw: &str) -> NavigationRequest {
        let uri = sanitize(raw).into_owned();
        let mut route = self.resolver.resolve(&uri);
        let mut state = self.codec.empty_state();
        self.codec.decode_route(&mut route, &mut state);

        tracing::debug!(
            uri = %uri,
            realm = %route.realm,
            controller = %route.controller,
            action = %route.action,
            "resolved navigation request"
        );

        NavigationRequest { uri, route, state }
    }

    /// Pushes a successfully rendered request onto the history
    pub fn record<C: CookieStore + ?Sized>(
        &self,
        cookies: &mut C,
        request: &NavigationRequest,
        title: &str,
    ) {
        self.history
            .push_route(cookies, &request.route, title, &request.state);
    }

    /// Canonical URI of `route` showing `state`
    pub fn link(&self, route: &ResolvedRoute, state: &ListingState) -> String {
        self.codec.build(
            &route.controller,
            &route.action,
            state,
            &route.realm,
            &route.params,
        )
    }

    pub fn canonical_uri(&self, request: &NavigationRequest) -> String {
        self.link(&request.route, &request.state)
    }

    /// Returns `uri` with filter `name` set to `value`
    ///
    /// A value holding a JSON object or array becomes a structured filter.
    /// An empty value removes the filter.
    pub fn set_filter(&self, uri: &str, name: &str, value: &str) -> String {
        self.set_filter_value(uri, name, parse_filter_input(value))
    }

    pub fn set_filter_value(&self, uri: &str, name: &str, value: impl Into<FilterValue>) -> String {
        let value = value.into();
        self.edit(uri, |state| state.with_filter(name, value))
    }

    /// Returns `uri` without filter `name`
    pub fn remove_filter(&self, uri: &str, name: &str) -> String {
        self.edit(uri, |state| state.without_filter(name))
    }

    fn edit(&self, uri: &str, change: impl FnOnce(&ListingState) -> ListingState) -> String {
        let request = self.prepare(uri);
        let state = change(&request.state);
        self.link(&request.route, &state)
    }

    /// Asks the request's listing handler for its total only
    pub fn fetch_total<H: ListingHandler + ?Sized>(
        &self,
        handler: &mut H,
        request: &NavigationRequest,
    ) -> Result<TotalProbe, H::Error> {
        pagination::fetch_total(handler, &request.state, request.params())
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn codec(&self) -> &UriCodec {
        &self.codec
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Configuration of a realm, `None` for unknown or empty names
    pub fn realm(&self, name: &str) -> Option<&RealmConfig> {
        self.realms.get(name)
    }

    /// `Path` attribute for cookies written on behalf of this navigator
    pub fn cookie_path(&self) -> &str {
        &self.cookie_path
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(&NavConfig::default())
    }
}

fn parse_filter_input(value: &str) -> FilterValue {
    let trimmed = value.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(value) {
            return FilterValue::from(json);
        }
    }
    FilterValue::from(value)
}
