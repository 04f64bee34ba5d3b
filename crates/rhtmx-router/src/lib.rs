//! # RHTMX Router
//!
//! Request routing and URI-carried listing state for server-rendered apps:
//! - Path sanitization (`/blog//list/` → `/blog/list`)
//! - Regex override routes, tried first in configuration order
//! - Convention routing: `/{realm?}/{controller}/{action}/{params...}`
//! - Filter, sort, search and page state encoded as path tokens
//!   (`/blog/list/filterval-status-1/sort-title-desc`)
//!
//! ## Design
//!
//! - **Pure functions and short-lived values**: no global mutable state,
//!   resolvers and codecs are built per request or shared read-only
//! - **Never fails on input**: unknown segments fall back to defaults and
//!   malformed tokens are dropped one at a time
//! - **Deterministic encoding**: identical state always yields byte-identical
//!   URIs, so links can be compared as strings
//!
//! ## Example
//!
//! ```
//! use rhtmx_router::{sanitize, Resolver, RouteDefaults, UriCodec};
//! use std::collections::HashSet;
//!
//! let resolver = Resolver::new(Vec::new(), HashSet::new(), RouteDefaults::default());
//! let codec = UriCodec::new(20);
//!
//! let uri = sanitize("/blog/list/filterval-status-1/sort-title-desc/");
//! let mut route = resolver.resolve(&uri);
//! let mut state = codec.empty_state();
//! codec.decode_route(&mut route, &mut state);
//!
//! assert_eq!(route.controller, "blog");
//! assert_eq!(route.action, "list");
//! assert!(route.params.is_empty());
//! assert_eq!(codec.build("blog", "list", &state, "", &route.params), uri);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod codec;
mod error;
pub mod listing;
pub mod path;
pub mod route;

// ============================================================================
// Re-exports
// ============================================================================

pub use codec::{detect_filter, is_numeric, render_filters, render_sort, UriCodec};
pub use error::{RouterError, TokenError};
pub use listing::{FilterValue, ListingState, Page, Sort, SortDirection};
pub use path::{is_canonical, sanitize};
pub use route::{
    resolve, ConventionRoute, OverrideRoute, ResolvedRoute, Resolver, RouteDefaults, RouteMatcher,
};

/// Alias of [`detect_filter`] under its contract name: the predicate shared by
/// the resolver's page injection and the codec's tail scan.
pub use codec::token::detect_filter as is_reserved_token;
