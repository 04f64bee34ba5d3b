//! # RHTMX Nav
//!
//! The framework-facing half of RHTMX routing. Builds on `rhtmx-router` with:
//! - `rhtmx.toml` configuration (`[routing]`, `[listing]`, `[history]`)
//! - A cookie-backed, byte-budgeted navigation history
//! - The count-only pagination protocol for listing handlers
//! - An axum extractor and filter-edit endpoints
//!
//! ## Example
//!
//! ```
//! use rhtmx_nav::{MemoryCookies, NavConfig, Navigator};
//!
//! let navigator = Navigator::new(&NavConfig::default());
//! let mut cookies = MemoryCookies::new();
//!
//! let request = navigator.prepare("/blog/list/filterval-status-1/sort-title-desc");
//! assert_eq!(request.route.controller, "blog");
//! assert!(request.params().is_empty());
//!
//! navigator.record(&mut cookies, &request, "Blog");
//! assert_eq!(navigator.history().all(&cookies).len(), 1);
//! ```

pub mod config;
pub mod cookies;
pub mod endpoints;
pub mod extract;
pub mod history;
pub mod navigator;
pub mod pagination;

pub use config::{HistoryConfig, ListingConfig, NavConfig, OverrideConfig, RealmConfig, RoutingConfig};
pub use cookies::{CookieStore, MemoryCookies, RequestCookies, SetCookie};
pub use endpoints::filter_routes;
pub use extract::Navigation;
pub use history::{HistoryEntry, HistoryError, NavigationHistory};
pub use navigator::{NavigationRequest, Navigator};
pub use pagination::{
    fetch_total, fetch_total_with, short_circuit, ListingHandler, ListingOutcome, PaginationSignal,
    TotalProbe,
};
