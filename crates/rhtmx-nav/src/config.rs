// File: src/config.rs
// Purpose: Navigation configuration parsing from rhtmx.toml

use anyhow::{Context, Result};
use rhtmx_router::{OverrideRoute, Resolver, RouteDefaults, UriCodec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Navigation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NavConfig {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub listing: ListingConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Controller used when the URI names none (default: "index")
    #[serde(default = "default_controller")]
    pub default_controller: String,

    /// Action used when the URI names none (default: "index")
    #[serde(default = "default_action")]
    pub default_action: String,

    /// Action receiving a single bare segment (default: "page")
    #[serde(default = "default_page_action")]
    pub page_action: String,

    /// Known realm prefixes (e.g., "admin", "api")
    #[serde(default)]
    pub realms: BTreeMap<String, RealmConfig>,

    /// Regex routes tried before convention routing, in order
    #[serde(default)]
    pub overrides: Vec<OverrideConfig>,
}

/// A realm: routing namespace grouping controllers
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RealmConfig {
    /// Whether controllers in this realm bind a model implicitly
    #[serde(default)]
    pub implicit_model: bool,

    /// Handler namespace for dispatch (e.g., "Admin")
    #[serde(default)]
    pub namespace: Option<String>,
}

/// One `[[routing.overrides]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideConfig {
    pub pattern: String,

    #[serde(default)]
    pub realm: String,

    #[serde(default)]
    pub controller: String,

    #[serde(default)]
    pub action: String,
}

/// Listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Navigation history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Budget for the whole `name=value` cookie pair, kept under the
    /// 4096-byte browser limit
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    #[serde(default = "default_expiration_secs")]
    pub expiration_secs: u64,

    #[serde(default = "default_cookie_path")]
    pub path: String,
}

// Default values
fn default_controller() -> String {
    "index".to_string()
}

fn default_action() -> String {
    "index".to_string()
}

fn default_page_action() -> String {
    "page".to_string()
}

fn default_per_page() -> u32 {
    20
}

fn default_cookie_name() -> String {
    "rhtmx_history".to_string()
}

fn default_max_entries() -> usize {
    10
}

fn default_max_bytes() -> usize {
    3500
}

fn default_expiration_secs() -> u64 {
    60 * 60 * 24 * 30
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

// Default implementations
impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_controller: default_controller(),
            default_action: default_action(),
            page_action: default_page_action(),
            realms: BTreeMap::new(),
            overrides: Vec::new(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cookie_name: default_cookie_name(),
            max_entries: default_max_entries(),
            max_bytes: default_max_bytes(),
            expiration_secs: default_expiration_secs(),
            path: default_cookie_path(),
        }
    }
}

impl NavConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %format!("{:#}", e), "navigation config unavailable, using defaults");
            Self::default()
        })
    }

    /// Load configuration from default path (./rhtmx.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx.toml")
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl RoutingConfig {
    pub fn route_defaults(&self) -> RouteDefaults {
        RouteDefaults {
            controller: self.default_controller.clone(),
            action: self.default_action.clone(),
            page_action: self.page_action.clone(),
        }
    }

    pub fn realm_names(&self) -> HashSet<String> {
        self.realms.keys().cloned().collect()
    }

    /// Compiles the override table, skipping invalid patterns
    pub fn override_routes(&self) -> Vec<OverrideRoute> {
        self.overrides
            .iter()
            .filter_map(|o| {
                OverrideRoute::new(&o.pattern, &o.realm, &o.controller, &o.action)
                    .map_err(|e| tracing::warn!(error = %e, "skipping override route"))
                    .ok()
            })
            .collect()
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.override_routes(), self.realm_names(), self.route_defaults())
    }
}

impl ListingConfig {
    pub fn codec(&self) -> UriCodec {
        UriCodec::new(self.per_page)
    }
}

impl HistoryConfig {
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NavConfig::default();
        assert_eq!(config.routing.default_controller, "index");
        assert_eq!(config.routing.page_action, "page");
        assert_eq!(config.listing.per_page, 20);
        assert!(config.history.enabled);
        assert_eq!(config.history.cookie_name, "rhtmx_history");
        assert!(config.history.max_bytes < 4096);
    }

    #[test]
    fn test_empty_config() {
        let config = NavConfig::parse("").unwrap_or_default();
        assert_eq!(config.routing.default_action, "index");
        assert_eq!(config.history.max_entries, 10);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            [routing]
            default_controller = "home"

            [routing.realms.admin]
            implicit_model = true
            namespace = "Admin"

            [routing.realms.api]

            [[routing.overrides]]
            pattern = '^/about-us$'
            controller = "pages"
            action = "about"

            [[routing.overrides]]
            pattern = '^/(broken$'
            controller = "x"
            action = "y"

            [listing]
            per_page = 50

            [history]
            enabled = false
            cookie_name = "nav"
        "#;
        let config = NavConfig::parse(toml).unwrap();

        assert_eq!(config.routing.default_controller, "home");
        assert_eq!(config.routing.default_action, "index");
        assert_eq!(
            config.routing.realms.get("admin"),
            Some(&RealmConfig {
                implicit_model: true,
                namespace: Some("Admin".to_string()),
            })
        );
        assert_eq!(config.routing.realms.get("api"), Some(&RealmConfig::default()));
        assert_eq!(config.routing.overrides.len(), 2);
        // The broken pattern is skipped, the rest of the table still applies
        assert_eq!(config.routing.override_routes().len(), 1);
        assert_eq!(config.listing.codec().default_per_page(), 50);
        assert!(!config.history.enabled);
        assert_eq!(config.history.cookie_name, "nav");
    }

    #[test]
    fn test_resolver_from_config() {
        let toml = r#"
            [routing.realms.admin]

            [[routing.overrides]]
            pattern = '^/about-us$'
            controller = "pages"
            action = "about"
        "#;
        let resolver = NavConfig::parse(toml).unwrap().routing.resolver();

        assert_eq!(resolver.resolve("/about-us").action, "about");
        assert_eq!(resolver.resolve("/admin/users/list").realm, "admin");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = NavConfig::load("does/not/exist/rhtmx.toml").unwrap();
        assert_eq!(config.listing.per_page, 20);
    }

    #[test]
    fn test_load_or_default_on_parse_error() {
        let dir = std::env::temp_dir().join("rhtmx-nav-config-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        fs::write(&path, "[listing\nper_page = ").unwrap();

        assert!(NavConfig::load(&path).is_err());
        let config = NavConfig::load_or_default(&path);
        assert_eq!(config.listing.per_page, 20);

        fs::remove_file(&path).ok();
    }
}
