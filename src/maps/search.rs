//! Paged place search with dedup, area filtering and the raw-set fallback.
//!
//! INIT → FETCHING → (HAS_MORE → FETCHING)* → DONE | FAILED
//!
//! Zero retries: the first non-success status ends the search and whatever
//! was accumulated so far is returned.

use super::filter::{AreaFilter, Membership};
use super::provider::MapsProvider;
use super::types::{PageQuery, Place, SearchArea, SearchRequest};
use crate::error::{ProviderStatus, SearchError, StatusClass};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

/// Paging state.
#[derive(Debug, Clone)]
pub enum PageState {
    Init,
    Fetching(PageQuery),
    /// Success with a continuation token; the next fetch waits for the page delay.
    HasMore(String),
    Done,
    Failed(SearchError),
}

/// Everything one search run produced. Each sequence is deduplicated by id
/// and kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Every distinct place seen on any page.
    pub raw: Vec<Place>,
    /// The subset of `raw` the area filter accepted.
    pub filtered: Vec<Place>,
    /// `filtered`, or `raw` in full when the filter rejected everything.
    pub places: Vec<Place>,
    /// Search requests issued (each page is one billable call).
    pub pages_fetched: u32,
    pub fell_back: bool,
    /// Terminal failure, if the run ended in FAILED.
    pub failure: Option<SearchError>,
}

impl SearchOutcome {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Drives the place-search endpoint across result pages.
pub struct PagedSearch<'a, P: MapsProvider + ?Sized> {
    provider: &'a P,
    page_delay: Duration,
}

impl<'a, P: MapsProvider + ?Sized> PagedSearch<'a, P> {
    pub fn new(provider: &'a P, page_delay: Duration) -> Self {
        Self { provider, page_delay }
    }

    pub fn run(&self, area: &SearchArea, area_query: &str, request: &SearchRequest) -> SearchOutcome {
        let filter = AreaFilter::for_area(area_query, area);
        let first = PageQuery::first(area, area_query, request);

        let mut seen: HashSet<String> = HashSet::new();
        let mut raw: Vec<Place> = Vec::new();
        let mut filtered: Vec<Place> = Vec::new();
        let mut pages_fetched: u32 = 0;

        let mut state = PageState::Init;
        let failure = loop {
            state = match state {
                PageState::Init => PageState::Fetching(first.clone()),
                PageState::HasMore(token) => {
                    if !self.page_delay.is_zero() {
                        thread::sleep(self.page_delay);
                    }
                    PageState::Fetching(first.with_token(token))
                }
                PageState::Fetching(query) => {
                    pages_fetched += 1;
                    match self.provider.search_page(&query) {
                        Err(e) => {
                            tracing::warn!(page = pages_fetched, error = %e, "place search failed");
                            PageState::Failed(e)
                        }
                        Ok(page) => match ProviderStatus::classify(&page.status) {
                            StatusClass::Ok => {
                                let count = page.results.len();
                                for place in page.results.into_iter().filter_map(|r| r.into_place()) {
                                    if !seen.insert(place.id.clone()) {
                                        continue;
                                    }
                                    let verdict = filter.check(&place);
                                    if let Membership::OutsideRadius(d) = verdict {
                                        tracing::debug!(id = %place.id, distance_m = d.round(), "outside area");
                                    }
                                    if verdict.is_member() {
                                        filtered.push(place.clone());
                                    }
                                    raw.push(place);
                                }
                                tracing::info!(page = pages_fetched, results = count, total = raw.len(), "page fetched");

                                match page.next_page_token.filter(|t| !t.trim().is_empty()) {
                                    Some(token) => PageState::HasMore(token),
                                    None => PageState::Done,
                                }
                            }
                            StatusClass::Failed(ProviderStatus::NoMatch) => PageState::Done,
                            StatusClass::Failed(status) => {
                                let e = SearchError::provider(status, page.error_message);
                                tracing::warn!(page = pages_fetched, error = %e, "place search stopped");
                                PageState::Failed(e)
                            }
                        },
                    }
                }
                PageState::Done => break None,
                PageState::Failed(e) => break Some(e),
            };
        };

        let fell_back = filtered.is_empty() && !raw.is_empty();
        if fell_back {
            tracing::warn!(
                raw = raw.len(),
                "no place matched the area filter; returning every place in the radius"
            );
        }
        let places = if fell_back { raw.clone() } else { filtered.clone() };

        SearchOutcome {
            raw,
            filtered,
            places,
            pages_fetched,
            fell_back,
            failure,
        }
    }
}
