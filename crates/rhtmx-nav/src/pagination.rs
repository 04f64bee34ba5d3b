//! Pagination-Total Protocol
//!
//! A caller that only needs `(total, per_page)` for a listing re-invokes the
//! listing's handler with the page set to [`Page::Total`]. A conforming
//! handler checks for it before loading rows and answers with
//! [`ListingOutcome::TotalOnly`]:
//!
//! ```
//! use rhtmx_nav::pagination::{fetch_total_with, short_circuit, ListingOutcome};
//! use rhtmx_router::ListingState;
//!
//! let rows = vec!["a", "b", "c"];
//! let list = |state: &ListingState, _params: &[String]| -> Result<_, ()> {
//!     if let Some(signal) = short_circuit(state, || rows.len() as u64) {
//!         return Ok(ListingOutcome::TotalOnly(signal));
//!     }
//!     Ok(ListingOutcome::Full(rows.clone()))
//! };
//!
//! let probe = fetch_total_with(&ListingState::new(2), &[], list).unwrap();
//! assert_eq!(probe.total(), 3);
//! assert_eq!(probe.per_page(), 2);
//! ```
//!
//! [`Page::Total`]: rhtmx_router::Page::Total

use rhtmx_router::ListingState;
use serde::{Deserialize, Serialize};

/// Count-only answer of a listing handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSignal {
    pub total: u64,
    pub per_page: u32,
}

impl PaginationSignal {
    pub fn new(total: u64, per_page: u32) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages needed to show `total` rows
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(u64::from(self.per_page.max(1)))
    }
}

/// What a listing handler returns
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome<T> {
    /// The fully rendered listing
    Full(T),
    /// Early return for a total request
    TotalOnly(PaginationSignal),
}

impl<T> ListingOutcome<T> {
    pub fn is_total_only(&self) -> bool {
        matches!(self, ListingOutcome::TotalOnly(_))
    }

    pub fn signal(&self) -> Option<PaginationSignal> {
        match self {
            ListingOutcome::TotalOnly(signal) => Some(*signal),
            ListingOutcome::Full(_) => None,
        }
    }

    pub fn into_full(self) -> Option<T> {
        match self {
            ListingOutcome::Full(value) => Some(value),
            ListingOutcome::TotalOnly(_) => None,
        }
    }
}

/// A listing screen that can be asked for its total
pub trait ListingHandler {
    type Output;
    type Error;

    /// Renders the listing for `state`, or reports the total when
    /// `state.is_total_request()`
    fn handle(
        &mut self,
        state: &ListingState,
        params: &[String],
    ) -> Result<ListingOutcome<Self::Output>, Self::Error>;
}

/// Early-return check for conforming handlers
///
/// Returns the signal for a total request, computing `count` only then.
/// Returns `None` for a normal page request.
pub fn short_circuit(state: &ListingState, count: impl FnOnce() -> u64) -> Option<PaginationSignal> {
    state
        .is_total_request()
        .then(|| PaginationSignal::new(count(), state.per_page))
}

/// Result of asking a handler for its total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalProbe {
    /// The handler answered the total request
    Reported(PaginationSignal),
    /// The handler ran to completion instead; its total is unknown
    Unsupported { per_page: u32 },
}

impl TotalProbe {
    /// The reported total, `0` when unsupported
    pub fn total(&self) -> u64 {
        match self {
            TotalProbe::Reported(signal) => signal.total,
            TotalProbe::Unsupported { .. } => 0,
        }
    }

    pub fn per_page(&self) -> u32 {
        match self {
            TotalProbe::Reported(signal) => signal.per_page,
            TotalProbe::Unsupported { per_page } => *per_page,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, TotalProbe::Reported(_))
    }

    pub fn signal(&self) -> PaginationSignal {
        PaginationSignal::new(self.total(), self.per_page())
    }
}

/// Invokes `handler` in count-only mode
///
/// Handler errors propagate unchanged.
pub fn fetch_total<H: ListingHandler + ?Sized>(
    handler: &mut H,
    state: &ListingState,
    params: &[String],
) -> Result<TotalProbe, H::Error> {
    let outcome = handler.handle(&state.requesting_total(), params)?;
    Ok(probe(outcome, state.per_page))
}

/// [`fetch_total`] for a handler written as a closure
pub fn fetch_total_with<T, E, F>(state: &ListingState, params: &[String], handler: F) -> Result<TotalProbe, E>
where
    F: FnOnce(&ListingState, &[String]) -> Result<ListingOutcome<T>, E>,
{
    let outcome = handler(&state.requesting_total(), params)?;
    Ok(probe(outcome, state.per_page))
}

fn probe<T>(outcome: ListingOutcome<T>, per_page: u32) -> TotalProbe {
    match outcome {
        ListingOutcome::TotalOnly(signal) => TotalProbe::Reported(signal),
        ListingOutcome::Full(_) => {
            tracing::debug!("listing handler ignored the total request");
            TotalProbe::Unsupported { per_page }
        }
    }
}
