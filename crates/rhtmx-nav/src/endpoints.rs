// File: rhtmx-nav/src/endpoints.rs
// Purpose: HTTP endpoints for editing listing filters in a URI

use crate::navigator::Navigator;
use axum::{
    extract::{FromRef, State},
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub const SET_FILTER_PATH: &str = "/_nav/filter/set";
pub const REMOVE_FILTER_PATH: &str = "/_nav/filter/remove";

/// Form body for POST /_nav/filter/set
#[derive(Debug, Deserialize)]
pub struct SetFilterForm {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Form body for POST /_nav/filter/remove
#[derive(Debug, Deserialize)]
pub struct RemoveFilterForm {
    pub uri: String,
    pub name: String,
}

/// POST /_nav/filter/set
/// Returns `uri` with the filter set, as text/plain
pub async fn set_filter_handler(
    State(navigator): State<Arc<Navigator>>,
    Form(form): Form<SetFilterForm>,
) -> String {
    navigator.set_filter(&form.uri, &form.name, &form.value)
}

/// POST /_nav/filter/remove
/// Returns `uri` without the filter, as text/plain
pub async fn remove_filter_handler(
    State(navigator): State<Arc<Navigator>>,
    Form(form): Form<RemoveFilterForm>,
) -> String {
    navigator.remove_filter(&form.uri, &form.name)
}

/// Filter-edit routes, to be merged into the application router
pub fn filter_routes<S>() -> Router<S>
where
    Arc<Navigator>: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(SET_FILTER_PATH, post(set_filter_handler))
        .route(REMOVE_FILTER_PATH, post(remove_filter_handler))
}
