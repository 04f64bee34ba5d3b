//! Navigation History Stack
//!
//! A short, most-recent-first list of visited screens kept in a client-side
//! cookie. State-only changes on the same screen (filtering, sorting, paging)
//! do not grow the stack, and the serialized cookie never exceeds its byte
//! budget: the oldest entries are evicted until it fits.
//!
//! History is advisory. A disabled or misconfigured history becomes inert:
//! pushes are ignored and reads return nothing.

use crate::config::HistoryConfig;
use crate::cookies::CookieStore;
use rhtmx_router::{ListingState, ResolvedRoute, UriCodec};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One visited screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub uri: String,
    pub label: String,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("navigation history is disabled")]
    Disabled,

    #[error("invalid history cookie name: {0:?}")]
    InvalidCookieName(String),

    #[error("history is configured to hold no entries")]
    NoCapacity,

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
struct HistorySettings {
    cookie_name: String,
    max_entries: usize,
    max_bytes: usize,
    expiration: Duration,
}

impl HistorySettings {
    fn from_config(config: &HistoryConfig) -> Result<Self, HistoryError> {
        if !config.enabled {
            return Err(HistoryError::Disabled);
        }
        if !is_cookie_name(&config.cookie_name) {
            return Err(HistoryError::InvalidCookieName(config.cookie_name.clone()));
        }
        if config.max_entries == 0 {
            return Err(HistoryError::NoCapacity);
        }

        Ok(Self {
            cookie_name: config.cookie_name.clone(),
            max_entries: config.max_entries,
            max_bytes: config.max_bytes,
            expiration: config.expiration(),
        })
    }

    /// Size of the `name=value` pair the browser has to store
    fn cookie_len(&self, value: &str) -> usize {
        self.cookie_name.len() + 1 + value.len()
    }
}

/// RFC 6265 cookie-name token
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

/// Cookie-backed navigation history
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    settings: Option<HistorySettings>,
    codec: UriCodec,
}

impl NavigationHistory {
    /// Creates the history, degrading to an inert one on bad configuration
    pub fn new(config: &HistoryConfig, codec: UriCodec) -> Self {
        Self::try_new(config, codec).unwrap_or_else(|e| {
            match e {
                HistoryError::Disabled => tracing::debug!("navigation history disabled"),
                e => tracing::warn!(error = %e, "navigation history unavailable"),
            }
            Self::inert(codec)
        })
    }

    pub fn try_new(config: &HistoryConfig, codec: UriCodec) -> Result<Self, HistoryError> {
        Ok(Self {
            settings: Some(HistorySettings::from_config(config)?),
            codec,
        })
    }

    /// A history that ignores pushes and reads as empty
    pub fn inert(codec: UriCodec) -> Self {
        Self {
            settings: None,
            codec,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_some()
    }

    /// Records a visit to a listing screen
    ///
    /// A no-op when the current top entry is already on the same
    /// `/{realm}/{controller}/{action}` base.
    pub fn push<C: CookieStore + ?Sized>(
        &self,
        cookies: &mut C,
        controller: &str,
        action: &str,
        title: &str,
        realm: &str,
        state: &ListingState,
    ) {
        self.push_with_params(cookies, controller, action, title, realm, &[], state);
    }

    /// Records a visit to a resolved route, keeping its positional params
    pub fn push_route<C: CookieStore + ?Sized>(
        &self,
        cookies: &mut C,
        route: &ResolvedRoute,
        title: &str,
        state: &ListingState,
    ) {
        self.push_with_params(
            cookies,
            &route.controller,
            &route.action,
            title,
            &route.realm,
            &route.params,
            state,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn push_with_params<C: CookieStore + ?Sized>(
        &self,
        cookies: &mut C,
        controller: &str,
        action: &str,
        title: &str,
        realm: &str,
        params: &[String],
        state: &ListingState,
    ) {
        let Some(settings) = &self.settings else {
            return;
        };

        let base = self.codec.build_base_uri(controller, action, realm);
        let mut entries = self.read(cookies, settings);

        if entries
            .first()
            .is_some_and(|top| is_same_screen(&top.uri, &base))
        {
            tracing::debug!(base = %base, "history push absorbed by current entry");
            return;
        }

        entries.insert(
            0,
            HistoryEntry {
                uri: self.codec.build(controller, action, state, realm, params),
                label: title.to_string(),
                timestamp: now(),
            },
        );
        entries.truncate(settings.max_entries);

        match fit_budget(settings, &mut entries) {
            Ok(Some(value)) => cookies.set(&settings.cookie_name, &value, settings.expiration),
            Ok(None) => cookies.remove(&settings.cookie_name),
            Err(e) => tracing::warn!(error = %e, "failed to persist navigation history"),
        }
    }

    /// All entries, most recent first
    pub fn all<C: CookieStore + ?Sized>(&self, cookies: &C) -> Vec<HistoryEntry> {
        match &self.settings {
            Some(settings) => self.read(cookies, settings),
            None => Vec::new(),
        }
    }

    /// The most recent entry, without modifying the stored history
    pub fn previous<C: CookieStore + ?Sized>(&self, cookies: &C) -> Option<HistoryEntry> {
        self.all(cookies).into_iter().next()
    }

    /// Expires the history cookie
    pub fn clear<C: CookieStore + ?Sized>(&self, cookies: &mut C) {
        if let Some(settings) = &self.settings {
            cookies.remove(&settings.cookie_name);
        }
    }

    /// Stored entries, trimmed to the configured limits
    ///
    /// Cookies arrive from the client and may be stale, oversized or garbage.
    fn read<C: CookieStore + ?Sized>(&self, cookies: &C, settings: &HistorySettings) -> Vec<HistoryEntry> {
        let Some(raw) = cookies.get(&settings.cookie_name) else {
            return Vec::new();
        };

        let mut entries = match decode(&raw) {
            Some(entries) => entries,
            None => {
                tracing::debug!(cookie = %settings.cookie_name, "ignoring unreadable history cookie");
                return Vec::new();
            }
        };

        entries.truncate(settings.max_entries);
        if fit_budget(settings, &mut entries).is_err() {
            entries.clear();
        }
        entries
    }
}

/// `uri` is `base` itself or one of its state variants
fn is_same_screen(uri: &str, base: &str) -> bool {
    uri.strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Drops the oldest entries until the cookie fits the byte budget
///
/// Returns the cookie value, or `None` when nothing fits.
fn fit_budget(
    settings: &HistorySettings,
    entries: &mut Vec<HistoryEntry>,
) -> Result<Option<String>, HistoryError> {
    while !entries.is_empty() {
        let value = encode(entries)?;
        if settings.cookie_len(&value) <= settings.max_bytes {
            return Ok(Some(value));
        }
        if let Some(evicted) = entries.pop() {
            tracing::debug!(uri = %evicted.uri, "evicting history entry over byte budget");
        }
    }
    Ok(None)
}

fn encode(entries: &[HistoryEntry]) -> Result<String, HistoryError> {
    let json = serde_json::to_string(entries)?;
    Ok(urlencoding::encode(&json).into_owned())
}

fn decode(raw: &str) -> Option<Vec<HistoryEntry>> {
    let json = urlencoding::decode(raw).ok()?;
    serde_json::from_str(&json).ok()
}

fn now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::MemoryCookies;

    fn history(config: HistoryConfig) -> NavigationHistory {
        NavigationHistory::new(&config, UriCodec::new(20))
    }

    fn uris(entries: &[HistoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.uri.as_str()).collect()
    }

    #[test]
    fn test_push_prepends() {
        let history = history(HistoryConfig::default());
        let mut cookies = MemoryCookies::new();
        let state = ListingState::new(20);

        history.push(&mut cookies, "users", "list", "Users", "", &state);
        history.push(&mut cookies, "posts", "list", "Posts", "admin", &state);

        let entries = history.all(&cookies);
        assert_eq!(uris(&entries), vec!["/admin/posts/list", "/users/list"]);
        assert_eq!(entries[0].label, "Posts");
        assert!(entries[0].timestamp > 0);
    }

    #[test]
    fn test_state_change_is_absorbed() {
        let history = history(HistoryConfig::default());
        let mut cookies = MemoryCookies::new();
        let state = ListingState::new(20);

        history.push(&mut cookies, "users", "list", "Users", "", &state);
        history.push(
            &mut cookies,
            "users",
            "list",
            "Users",
            "",
            &state.with_filter("status", "active"),
        );

        assert_eq!(uris(&history.all(&cookies)), vec!["/users/list"]);
    }

    #[test]
    fn test_prefix_of_other_action_is_not_same_screen() {
        assert!(is_same_screen("/users/list", "/users/list"));
        assert!(is_same_screen("/users/list/page-2", "/users/list"));
        assert!(!is_same_screen("/users/listing", "/users/list"));
    }

    #[test]
    fn test_max_entries() {
        let history = history(HistoryConfig {
            max_entries: 3,
            ..HistoryConfig::default()
        });
        let mut cookies = MemoryCookies::new();
        let state = ListingState::new(20);

        for controller in ["a", "b", "c", "d"] {
            history.push(&mut cookies, controller, "list", controller, "", &state);
        }

        assert_eq!(uris(&history.all(&cookies)), vec!["/d/list", "/c/list", "/b/list"]);
    }

    #[test]
    fn test_entry_over_budget_clears_cookie() {
        let history = history(HistoryConfig {
            max_bytes: 40,
            ..HistoryConfig::default()
        });
        let mut cookies = MemoryCookies::new();

        history.push(
            &mut cookies,
            "reports",
            "list",
            &"x".repeat(100),
            "",
            &ListingState::new(20),
        );

        assert!(cookies.is_empty());
        assert!(history.all(&cookies).is_empty());
    }

    #[test]
    fn test_oversized_client_cookie_trimmed_on_read() {
        let config = HistoryConfig {
            max_bytes: 300,
            ..HistoryConfig::default()
        };
        let history = history(config.clone());
        let entries: Vec<HistoryEntry> = (0..10)
            .map(|i| HistoryEntry {
                uri: format!("/c{i}/list"),
                label: "y".repeat(40),
                timestamp: i,
            })
            .collect();

        let mut cookies = MemoryCookies::new();
        cookies.set(
            &config.cookie_name,
            &encode(&entries).unwrap(),
            Duration::from_secs(60),
        );

        let read = history.all(&cookies);
        assert!(!read.is_empty());
        assert!(read.len() < entries.len());
        assert_eq!(read[0], entries[0]);
        let value = encode(&read).unwrap();
        assert!(config.cookie_name.len() + 1 + value.len() <= config.max_bytes);
    }

    #[test]
    fn test_garbage_cookie_reads_as_empty() {
        let config = HistoryConfig::default();
        let history = history(config.clone());
        let mut cookies = MemoryCookies::new();
        cookies.set(&config.cookie_name, "%7Bnot-a-list", Duration::from_secs(60));

        assert!(history.all(&cookies).is_empty());
        assert!(history.previous(&cookies).is_none());
    }

    #[test]
    fn test_invalid_cookie_name_is_inert() {
        let config = HistoryConfig {
            cookie_name: "bad name;".to_string(),
            ..HistoryConfig::default()
        };
        assert!(matches!(
            NavigationHistory::try_new(&config, UriCodec::default()),
            Err(HistoryError::InvalidCookieName(_))
        ));

        let history = history(config);
        let mut cookies = MemoryCookies::new();
        history.push(&mut cookies, "a", "list", "A", "", &ListingState::new(20));

        assert!(!history.is_enabled());
        assert!(cookies.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = HistoryConfig {
            max_entries: 0,
            ..HistoryConfig::default()
        };
        assert!(matches!(
            NavigationHistory::try_new(&config, UriCodec::default()),
            Err(HistoryError::NoCapacity)
        ));
    }

    #[test]
    fn test_clear() {
        let config = HistoryConfig::default();
        let history = history(config.clone());
        let mut cookies = MemoryCookies::new();
        history.push(&mut cookies, "a", "list", "A", "", &ListingState::new(20));
        assert!(cookies.get(&config.cookie_name).is_some());

        history.clear(&mut cookies);
        assert!(history.all(&cookies).is_empty());
    }
}
