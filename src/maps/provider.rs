//! Mapping provider seam and the Google Maps Platform implementation.

use super::types::{GeocodeResponse, PageQuery, PlacesPage, SearchMode};
use crate::config::Config;
use crate::error::{ProviderStatus, SearchError};
use serde::de::DeserializeOwned;

/// A geocoding + place-search backend.
///
/// Implementations report transport and decoding failures as `Err`; the
/// provider's own `status` field is passed through untouched so the
/// resolver and the paging loop can interpret it.
pub trait MapsProvider {
    fn geocode(&self, address: &str) -> Result<GeocodeResponse, SearchError>;

    fn search_page(&self, query: &PageQuery) -> Result<PlacesPage, SearchError>;
}

impl<P: MapsProvider + ?Sized> MapsProvider for &P {
    fn geocode(&self, address: &str) -> Result<GeocodeResponse, SearchError> {
        (**self).geocode(address)
    }

    fn search_page(&self, query: &PageQuery) -> Result<PlacesPage, SearchError> {
        (**self).search_page(query)
    }
}

/// Blocking client for the Geocoding and Places (legacy JSON) web services.
pub struct GoogleMapsClient {
    agent: ureq::Agent,
    config: Config,
}

impl GoogleMapsClient {
    pub fn new(config: Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(concat!("AreaPlaces/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Keep the key out of anything that ends up in logs or reports.
    fn redact(&self, text: &str) -> String {
        if self.config.api_key.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.config.api_key, "***")
        }
    }

    fn call_json<T: DeserializeOwned>(&self, request: ureq::Request) -> Result<T, SearchError> {
        match request.call() {
            Ok(response) => response
                .into_json::<T>()
                .map_err(|e| SearchError::MalformedResponse(self.redact(&e.to_string()))),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                let snippet: String = body.chars().take(200).collect();
                Err(SearchError::provider(
                    ProviderStatus::from_http(code),
                    Some(self.redact(&format!("HTTP {}: {}", code, snippet.trim()))),
                ))
            }
            Err(ureq::Error::Transport(t)) => Err(SearchError::Network(self.redact(&t.to_string()))),
        }
    }
}

impl MapsProvider for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<GeocodeResponse, SearchError> {
        tracing::debug!(address, "geocoding request");
        let request = self
            .agent
            .get(&self.config.geocode_url)
            .query("address", address)
            .query("region", &self.config.region)
            .query("language", &self.config.language)
            .query("key", &self.config.api_key);
        self.call_json(request)
    }

    fn search_page(&self, query: &PageQuery) -> Result<PlacesPage, SearchError> {
        let location = format!("{},{}", query.center.lat, query.center.lng);
        let radius = format!("{:.0}", query.radius_m);

        let mut request = match query.mode {
            SearchMode::Nearby => {
                let mut r = self
                    .agent
                    .get(&self.config.nearby_search_url)
                    .query("location", &location)
                    .query("radius", &radius);
                if let Some(keyword) = &query.keyword {
                    r = r.query("keyword", keyword);
                }
                r
            }
            SearchMode::Text => self
                .agent
                .get(&self.config.text_search_url)
                .query("query", &query.text_query)
                .query("location", &location)
                .query("radius", &radius)
                .query("region", &self.config.region),
        };

        if let Some(place_type) = &query.place_type {
            request = request.query("type", place_type);
        }
        if let Some(token) = &query.page_token {
            request = request.query("pagetoken", token);
        }
        request = request
            .query("language", &self.config.language)
            .query("key", &self.config.api_key);

        tracing::debug!(mode = %query.mode, has_token = query.page_token.is_some(), "place search request");
        self.call_json(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_key() {
        let client = GoogleMapsClient::new(Config { api_key: "AIzaTEST".into(), ..Config::default() });
        let msg = client.redact("https://maps.googleapis.com/maps/api/geocode/json?key=AIzaTEST: timed out");
        assert!(!msg.contains("AIzaTEST"));
        assert!(msg.ends_with("key=***: timed out"));
    }

    #[test]
    fn test_redact_without_key_is_identity() {
        let client = GoogleMapsClient::new(Config::default());
        assert_eq!(client.redact("plain"), "plain");
    }
}
