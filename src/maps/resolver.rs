//! Area resolver: free-text area name → center coordinate + search radius.
//!
//! Flow: qualify with country → geocode → first candidate → radius from viewport.

use super::provider::MapsProvider;
use super::types::{SearchArea, Viewport};
use crate::error::{ProviderStatus, SearchError, StatusClass};
use crate::geo::{haversine_m, Coordinate};
use crate::normalize::contains_phrase;

pub const MIN_RADIUS_M: f64 = 2_000.0;
pub const MAX_RADIUS_M: f64 = 50_000.0;
pub const DEFAULT_RADIUS_M: f64 = 5_000.0;
/// Slack over the center→northeast-corner distance so the circle covers the viewport.
pub const VIEWPORT_RADIUS_FACTOR: f64 = 1.2;

/// Normalized country names that mean the caller already qualified the area.
/// Single syllables like "my" (Mỹ) are left out: they collide with place names such as Mỹ Tho.
const COUNTRY_INDICATORS: &[&str] = &[
    "viet nam", "vietnam", "france", "phap", "usa", "hoa ky", "japan", "nhat ban",
];

/// True if the area text already names a country.
fn has_country(area: &str) -> bool {
    COUNTRY_INDICATORS.iter().any(|ind| contains_phrase(area, ind))
}

/// Append the country qualifier unless the area already carries one.
pub fn qualify_area(area: &str, country_suffix: &str) -> String {
    let area = area.trim();
    if country_suffix.trim().is_empty() || has_country(area) {
        area.to_string()
    } else {
        format!("{}, {}", area, country_suffix.trim())
    }
}

/// Search radius for a geocoded center.
///
/// With a viewport: distance to the northeast corner × 1.2, clamped to
/// [2000, 50000] m. Without one, or if the math goes non-finite: 5000 m.
pub fn radius_from_viewport(center: &Coordinate, viewport: Option<&Viewport>) -> f64 {
    let Some(vp) = viewport else {
        return DEFAULT_RADIUS_M;
    };
    let radius = haversine_m(center, &Coordinate::from(vp.northeast)) * VIEWPORT_RADIUS_FACTOR;
    if radius.is_finite() {
        radius.clamp(MIN_RADIUS_M, MAX_RADIUS_M)
    } else {
        DEFAULT_RADIUS_M
    }
}

/// Resolves area names through a geocoding provider.
pub struct AreaResolver<'a, P: MapsProvider + ?Sized> {
    provider: &'a P,
    country_suffix: &'a str,
}

impl<'a, P: MapsProvider + ?Sized> AreaResolver<'a, P> {
    pub fn new(provider: &'a P, country_suffix: &'a str) -> Self {
        Self { provider, country_suffix }
    }

    /// Resolve an area. Only the first geocoding candidate is used.
    pub fn resolve(&self, area: &str) -> Result<SearchArea, SearchError> {
        let address = qualify_area(area, self.country_suffix);
        let response = self.provider.geocode(&address)?;

        if let StatusClass::Failed(status) = ProviderStatus::classify(&response.status) {
            return Err(SearchError::provider(status, response.error_message));
        }

        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::NoCoordinate(address.clone()))?;
        let geometry = first.geometry.unwrap_or_default();
        let center: Coordinate = geometry
            .location
            .filter(|ll| ll.lat.is_finite() && ll.lng.is_finite())
            .ok_or_else(|| SearchError::NoCoordinate(address.clone()))?
            .into();

        let radius_m = radius_from_viewport(&center, geometry.viewport.as_ref());
        tracing::info!(
            area = %address,
            lat = center.lat,
            lng = center.lng,
            radius_m = radius_m.round(),
            "area resolved"
        );

        Ok(SearchArea {
            center,
            radius_m,
            display_name: first
                .formatted_address
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(address),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::types::{GeocodeResponse, GeocodeResult, Geometry, LatLng, PageQuery, PlacesPage};
    use std::cell::RefCell;

    struct FixedGeocoder {
        response: Result<GeocodeResponse, SearchError>,
        seen: RefCell<Vec<String>>,
    }

    impl FixedGeocoder {
        fn new(response: Result<GeocodeResponse, SearchError>) -> Self {
            Self { response, seen: RefCell::new(Vec::new()) }
        }
    }

    impl MapsProvider for FixedGeocoder {
        fn geocode(&self, address: &str) -> Result<GeocodeResponse, SearchError> {
            self.seen.borrow_mut().push(address.to_string());
            self.response.clone()
        }

        fn search_page(&self, _query: &PageQuery) -> Result<PlacesPage, SearchError> {
            unreachable!("resolver never searches")
        }
    }

    fn ok_response(location: Option<LatLng>, viewport: Option<Viewport>) -> GeocodeResponse {
        GeocodeResponse {
            status: "OK".into(),
            error_message: None,
            results: vec![GeocodeResult {
                formatted_address: Some("Phú Nhuận, Thành phố Hồ Chí Minh, Việt Nam".into()),
                geometry: Some(Geometry { location, viewport }),
            }],
        }
    }

    fn status_response(status: &str) -> GeocodeResponse {
        GeocodeResponse { status: status.into(), error_message: Some("msg".into()), results: vec![] }
    }

    const CENTER: LatLng = LatLng { lat: 10.7991, lng: 106.6802 };

    #[test]
    fn test_qualify_area() {
        assert_eq!(qualify_area("Phú Nhuận", "Việt Nam"), "Phú Nhuận, Việt Nam");
        assert_eq!(qualify_area("Quận 1, Hồ Chí Minh, Việt Nam", "Việt Nam"), "Quận 1, Hồ Chí Minh, Việt Nam");
        assert_eq!(qualify_area("Da Lat, Vietnam", "Việt Nam"), "Da Lat, Vietnam");
        assert_eq!(qualify_area("Paris, France", "Việt Nam"), "Paris, France");
        assert_eq!(qualify_area("Mỹ Tho", "Việt Nam"), "Mỹ Tho, Việt Nam");
        assert_eq!(qualify_area("  Quận 8 ", ""), "Quận 8");
    }

    #[test]
    fn test_radius_without_viewport_is_default() {
        let c = Coordinate::new(10.0, 106.0);
        assert_eq!(radius_from_viewport(&c, None), DEFAULT_RADIUS_M);
    }

    #[test]
    fn test_radius_is_clamped() {
        let c = Coordinate::new(10.7991, 106.6802);
        let tiny = Viewport {
            northeast: LatLng { lat: 10.7995, lng: 106.6806 },
            southwest: LatLng { lat: 10.7987, lng: 106.6798 },
        };
        assert_eq!(radius_from_viewport(&c, Some(&tiny)), MIN_RADIUS_M);

        let huge = Viewport {
            northeast: LatLng { lat: 12.0, lng: 108.0 },
            southwest: LatLng { lat: 9.0, lng: 105.0 },
        };
        assert_eq!(radius_from_viewport(&c, Some(&huge)), MAX_RADIUS_M);

        let district = Viewport {
            northeast: LatLng { lat: 10.8142, lng: 106.6955 },
            southwest: LatLng { lat: 10.7856, lng: 106.6648 },
        };
        let r = radius_from_viewport(&c, Some(&district));
        let expected = haversine_m(&c, &Coordinate::new(10.8142, 106.6955)) * 1.2;
        assert!((r - expected).abs() < 1e-6);
        assert!((MIN_RADIUS_M..=MAX_RADIUS_M).contains(&r));
    }

    #[test]
    fn test_radius_nan_viewport_falls_back() {
        let c = Coordinate::new(10.0, 106.0);
        let bad = Viewport {
            northeast: LatLng { lat: f64::NAN, lng: 106.0 },
            southwest: LatLng { lat: 9.0, lng: 105.0 },
        };
        assert_eq!(radius_from_viewport(&c, Some(&bad)), DEFAULT_RADIUS_M);
    }

    #[test]
    fn test_resolve_success_appends_country() {
        let geocoder = FixedGeocoder::new(Ok(ok_response(Some(CENTER), None)));
        let area = AreaResolver::new(&geocoder, "Việt Nam").resolve("Phú Nhuận").unwrap();
        assert_eq!(geocoder.seen.borrow()[0], "Phú Nhuận, Việt Nam");
        assert_eq!(area.center, Coordinate::new(10.7991, 106.6802));
        assert_eq!(area.radius_m, DEFAULT_RADIUS_M);
        assert!(area.display_name.starts_with("Phú Nhuận"));
    }

    #[test]
    fn test_resolve_zero_results() {
        let geocoder = FixedGeocoder::new(Ok(status_response("ZERO_RESULTS")));
        let err = AreaResolver::new(&geocoder, "Việt Nam").resolve("Nowhere").unwrap_err();
        assert_eq!(err.status(), Some(ProviderStatus::NoMatch));
    }

    #[test]
    fn test_resolve_status_taxonomy() {
        for (code, expected) in [
            ("OVER_QUERY_LIMIT", ProviderStatus::RateLimited),
            ("REQUEST_DENIED", ProviderStatus::AccessDenied),
            ("INVALID_REQUEST", ProviderStatus::BadRequest),
            ("UNKNOWN_ERROR", ProviderStatus::Unknown),
        ] {
            let geocoder = FixedGeocoder::new(Ok(status_response(code)));
            let err = AreaResolver::new(&geocoder, "").resolve("Phú Nhuận").unwrap_err();
            assert_eq!(err.status(), Some(expected), "status {code}");
        }
    }

    #[test]
    fn test_resolve_ok_without_location_is_no_coordinate() {
        let geocoder = FixedGeocoder::new(Ok(ok_response(None, None)));
        let err = AreaResolver::new(&geocoder, "").resolve("Phú Nhuận").unwrap_err();
        assert!(matches!(err, SearchError::NoCoordinate(_)));

        let empty = GeocodeResponse { status: "OK".into(), ..Default::default() };
        let geocoder = FixedGeocoder::new(Ok(empty));
        let err = AreaResolver::new(&geocoder, "").resolve("Phú Nhuận").unwrap_err();
        assert!(matches!(err, SearchError::NoCoordinate(_)));
    }

    #[test]
    fn test_resolve_network_error_passes_through() {
        let geocoder = FixedGeocoder::new(Err(SearchError::Network("connection refused".into())));
        let err = AreaResolver::new(&geocoder, "").resolve("Phú Nhuận").unwrap_err();
        assert!(matches!(err, SearchError::Network(_)));
    }
}
