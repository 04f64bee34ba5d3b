// ./crates/rhtmx-nav/src/extract.rs

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::request::Parts,
};
use std::convert::Infallible;
use std::ops::Deref;
use std::sync::Arc;

use crate::cookies::RequestCookies;
use crate::navigator::{NavigationRequest, Navigator};

// ════════════════════════════════════════════════════════════
// 1. The Extractor Struct
// ════════════════════════════════════════════════════════════

/// Resolved route, listing state and cookies of the current request
///
/// Return `cookies` as part of the response so history writes reach the
/// client:
///
/// ```ignore
/// async fn list(mut nav: Navigation) -> impl IntoResponse {
///     nav.record("Tickets");
///     (nav.cookies, "...")
/// }
/// ```
#[derive(Debug)]
pub struct Navigation {
    pub request: NavigationRequest,
    pub cookies: RequestCookies,
    navigator: Arc<Navigator>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Navigation
where
    Arc<Navigator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let navigator = Arc::<Navigator>::from_ref(state);

        // Nested routers strip their prefix from `parts.uri`; realms live there
        let path = match parts.extensions.get::<OriginalUri>() {
            Some(OriginalUri(uri)) => uri.path(),
            None => parts.uri.path(),
        };
        let request = navigator.prepare(path);
        let cookies = RequestCookies::from_headers(&parts.headers).with_path(navigator.cookie_path());

        Ok(Navigation {
            request,
            cookies,
            navigator,
        })
    }
}

// ════════════════════════════════════════════════════════════
// 2. Request-scoped helpers
// ════════════════════════════════════════════════════════════
impl Navigation {
    /// Pushes this request onto the navigation history
    pub fn record(&mut self, title: &str) {
        self.navigator.record(&mut self.cookies, &self.request, title);
    }

    pub fn canonical_uri(&self) -> String {
        self.navigator.canonical_uri(&self.request)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }
}

impl Deref for Navigation {
    type Target = NavigationRequest;

    fn deref(&self) -> &Self::Target {
        &self.request
    }
}
