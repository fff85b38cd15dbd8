//! The place finder: resolve → search → rank, returning structured findings.
//!
//! Failures never escape: a failed geocode yields empty findings with the
//! error attached, a failed page keeps whatever came before it.

use crate::config::Config;
use crate::error::SearchError;
use crate::maps::{AreaResolver, MapsProvider, PagedSearch, Place, SearchArea, SearchOutcome, SearchRequest};
use crate::report::rank;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct Findings {
    pub area_query: String,
    pub request: SearchRequest,
    /// `None` when the area could not be resolved.
    pub area: Option<SearchArea>,
    pub outcome: SearchOutcome,
    /// `outcome.places` sorted by review count, most reviewed first.
    pub ranked: Vec<Place>,
    /// Geocoding call plus every search page.
    pub api_calls: u32,
    pub failure: Option<SearchError>,
}

/// Runs the whole pipeline against a provider.
pub struct PlaceFinder<'a, P: MapsProvider + ?Sized> {
    provider: &'a P,
    config: &'a Config,
}

impl<'a, P: MapsProvider + ?Sized> PlaceFinder<'a, P> {
    pub fn new(provider: &'a P, config: &'a Config) -> Self {
        Self { provider, config }
    }

    pub fn find(&self, area_query: &str, request: &SearchRequest) -> Findings {
        let resolver = AreaResolver::new(self.provider, &self.config.country_suffix);

        let area = match resolver.resolve(area_query) {
            Ok(area) => area,
            Err(e) => {
                tracing::warn!(area = area_query, error = %e, "could not resolve area");
                return Findings {
                    area_query: area_query.to_string(),
                    request: request.clone(),
                    area: None,
                    outcome: SearchOutcome::empty(),
                    ranked: Vec::new(),
                    api_calls: 1,
                    failure: Some(e),
                };
            }
        };

        let outcome = PagedSearch::new(self.provider, self.config.page_delay()).run(&area, area_query, request);
        let ranked = rank(&outcome.places);
        tracing::info!(
            raw = outcome.raw.len(),
            in_area = outcome.filtered.len(),
            returned = ranked.len(),
            pages = outcome.pages_fetched,
            "search complete"
        );

        Findings {
            area_query: area_query.to_string(),
            request: request.clone(),
            api_calls: 1 + outcome.pages_fetched,
            failure: outcome.failure.clone(),
            area: Some(area),
            outcome,
            ranked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderStatus;
    use crate::maps::search::tests::{page, record, ScriptedProvider};
    use crate::maps::types::{GeocodeResponse, GeocodeResult, Geometry, LatLng};

    fn config() -> Config {
        Config { api_key: "test".into(), page_delay_ms: 0, ..Config::default() }
    }

    fn geocoded(pages: Vec<Result<crate::maps::types::PlacesPage, SearchError>>) -> ScriptedProvider {
        let mut provider = ScriptedProvider::with_pages(pages);
        provider.geocode = Ok(GeocodeResponse {
            status: "OK".into(),
            error_message: None,
            results: vec![GeocodeResult {
                formatted_address: Some("Phú Nhuận, Hồ Chí Minh, Việt Nam".into()),
                geometry: Some(Geometry {
                    location: Some(LatLng { lat: 10.7991, lng: 106.6802 }),
                    viewport: None,
                }),
            }],
        });
        provider
    }

    #[test]
    fn test_zero_results_geocode_gives_empty_findings() {
        let provider = ScriptedProvider::with_pages(vec![page(vec![record("a", Some(1), "Phú Nhuận", None)], None)]);
        let cfg = config();
        let findings = PlaceFinder::new(&provider, &cfg).find("Nowhere", &SearchRequest::default());

        assert!(findings.area.is_none());
        assert!(findings.ranked.is_empty());
        assert_eq!(findings.api_calls, 1);
        assert_eq!(findings.failure.and_then(|e| e.status()), Some(ProviderStatus::NoMatch));
        assert!(provider.queries.borrow().is_empty());
    }

    #[test]
    fn test_full_run_ranks_in_area_places() {
        let provider = geocoded(vec![
            page(
                vec![
                    record("1", Some(50), "Phú Nhuận", Some((10.7991, 106.6802))),
                    record("2", Some(200), "Gò Vấp", Some((10.8600, 106.6700))),
                ],
                Some("next"),
            ),
            page(vec![record("3", Some(120), "Phan Xích Long, Phú Nhuận", None), record("4", None, "", None)], None),
        ]);
        let cfg = config();
        let findings = PlaceFinder::new(&provider, &cfg).find("Phú Nhuận", &SearchRequest::default());

        let ids: Vec<&str> = findings.ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "4"]);
        assert_eq!(findings.api_calls, 3);
        assert_eq!(findings.outcome.raw.len(), 4);
        assert!(findings.failure.is_none());
        assert_eq!(findings.area.unwrap().radius_m, 5_000.0);
    }
}
