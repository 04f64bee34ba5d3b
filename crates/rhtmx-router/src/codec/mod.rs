//! URI Parameter Codec
//!
//! Maps [`ListingState`] to path segments and back. The encoded tail of a
//! listing URI always has the positional shape
//! `[page?, params..., tokens...]`:
//!
//! - tokens are popped from the tail until the first non-token segment
//! - if any token was popped and the first remaining parameter is purely
//!   numeric, it is the page (an explicit `page-N` token wins)
//!
//! The resolver injects a `"1"` page when tokens are present without one, so
//! handlers taking `(page, ...)` always see the page first. Override routes
//! have no page slot: decode them with [`UriCodec::decode_route`].

pub mod display;
pub mod token;

use crate::listing::{ListingState, Page};
use crate::route::ResolvedRoute;
use token::Token;

pub use display::{render_filters, render_sort};
pub use token::{detect_filter, is_numeric};

/// Bidirectional mapping between listing state and URIs
///
/// Cheap to copy; construct one per request or keep one around.
///
/// # Examples
///
/// ```
/// use rhtmx_router::{ListingState, SortDirection, UriCodec};
///
/// let codec = UriCodec::new(20);
/// let state = ListingState::new(20)
///     .with_filter("status", "1")
///     .with_sort("title", SortDirection::Desc);
///
/// let uri = codec.build("blog", "list", &state, "", &[]);
/// assert_eq!(uri, "/blog/list/filterval-status-1/sort-title-desc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriCodec {
    default_per_page: u32,
}

impl Default for UriCodec {
    fn default() -> Self {
        Self::new(20)
    }
}

impl UriCodec {
    pub fn new(default_per_page: u32) -> Self {
        Self {
            default_per_page: default_per_page.max(1),
        }
    }

    pub fn default_per_page(&self) -> u32 {
        self.default_per_page
    }

    /// Empty listing state with the configured page size
    pub fn empty_state(&self) -> ListingState {
        ListingState::new(self.default_per_page)
    }

    /// Pulls encoded state out of `params` into `out`
    ///
    /// Recognized tokens (and the positional page, see the module docs) are
    /// removed from `params`; everything else stays for the handler.
    /// Malformed tokens are dropped one by one and never fail the decode.
    pub fn decode(&self, params: &mut Vec<String>, out: &mut ListingState) {
        self.decode_tail(params, out, true);
    }

    /// Decodes the params of a resolved route
    ///
    /// Routes without a page slot (regex overrides) only give up their tail
    /// tokens; a leading numeric capture stays a parameter.
    pub fn decode_route(&self, route: &mut ResolvedRoute, out: &mut ListingState) {
        self.decode_tail(&mut route.params, out, route.page_slot);
    }

    fn decode_tail(&self, params: &mut Vec<String>, out: &mut ListingState, page_slot: bool) {
        let mut popped = Vec::new();
        while let Some(parsed) = params.last().and_then(|last| token::parse(last)) {
            if let Some(segment) = params.pop() {
                popped.push((segment, parsed));
            }
        }

        if popped.is_empty() {
            return;
        }

        let mut explicit_page = None;
        // Apply in URI order so a repeated token keeps its last occurrence
        for (segment, parsed) in popped.into_iter().rev() {
            match parsed {
                Ok(Token::Page(n)) => explicit_page = Some(n),
                Ok(Token::PerPage(n)) => out.per_page = n,
                Ok(Token::Filter(name, value)) => {
                    out.filters.insert(name, value);
                }
                Ok(Token::Sort(sort)) => out.sort = Some(sort),
                Ok(Token::Search(query)) => out.search_query = Some(query),
                Err(error) => {
                    tracing::debug!(segment = %segment, %error, "dropping malformed state token");
                }
            }
        }

        if page_slot && params.first().is_some_and(|first| is_numeric(first)) {
            let positional = params.remove(0);
            match positional.parse::<u32>() {
                Ok(n) if n > 0 => out.page = Page::Number(n),
                _ => tracing::debug!(segment = %positional, "dropping invalid positional page"),
            }
        }

        if let Some(n) = explicit_page {
            out.page = Page::Number(n);
        }
    }

    /// Encodes `state` into its tokens, in canonical order
    ///
    /// Filters (by name), search, sort, per-page, page. The page token is
    /// only written past page 1 and per-page only when it differs from the
    /// default.
    pub fn tokens(&self, state: &ListingState) -> Vec<String> {
        let mut tokens: Vec<Token> = state
            .filters
            .iter()
            .map(|(name, value)| Token::Filter(name.clone(), value.clone()))
            .collect();

        if let Some(query) = &state.search_query {
            tokens.push(Token::Search(query.clone()));
        }
        if let Some(sort) = &state.sort {
            tokens.push(Token::Sort(sort.clone()));
        }
        if state.per_page != self.default_per_page {
            tokens.push(Token::PerPage(state.per_page));
        }
        if let Some(page) = state.page.as_number().filter(|n| *n > 1) {
            tokens.push(Token::Page(page));
        }

        tokens.iter().filter_map(token::encode).collect()
    }

    /// Builds the canonical URI for a listing
    ///
    /// `/{realm}/{controller}/{action}/{page?}/{params...}/{tokens...}`.
    /// The positional page is only written when `params` is non-empty and
    /// some state is encoded, so decoding never mistakes a numeric parameter
    /// for the page. Identical inputs always give byte-identical output.
    pub fn build(
        &self,
        controller: &str,
        action: &str,
        state: &ListingState,
        realm: &str,
        params: &[String],
    ) -> String {
        let mut uri = self.build_base_uri(controller, action, realm);
        let tokens = self.tokens(state);

        if !params.is_empty() && !tokens.is_empty() {
            let page = state.page.as_number().unwrap_or(1);
            uri.push('/');
            uri.push_str(&page.to_string());
        }
        for segment in params.iter().chain(tokens.iter()) {
            uri.push('/');
            uri.push_str(segment);
        }

        uri
    }

    /// `/{realm}/{controller}/{action}` with no state
    ///
    /// ```
    /// use rhtmx_router::UriCodec;
    ///
    /// let codec = UriCodec::default();
    /// assert_eq!(codec.build_base_uri("users", "list", ""), "/users/list");
    /// assert_eq!(codec.build_base_uri("users", "list", "admin"), "/admin/users/list");
    /// ```
    pub fn build_base_uri(&self, controller: &str, action: &str, realm: &str) -> String {
        if realm.is_empty() {
            format!("/{}/{}", controller, action)
        } else {
            format!("/{}/{}/{}", realm, controller, action)
        }
    }
}
