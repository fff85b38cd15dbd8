//! Domain types for area search, plus the provider's JSON wire models.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A resolved search area: where to look, and how far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchArea {
    pub center: Coordinate,
    /// Always positive, within [MIN_RADIUS_M, MAX_RADIUS_M] when derived from a viewport.
    pub radius_m: f64,
    /// Formatted address of the geocoding match, or the query when the provider gave none.
    pub display_name: String,
}

/// A point of interest returned by the place search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub address: String,
    pub coordinate: Option<Coordinate>,
    pub category_tags: BTreeSet<String>,
}

/// Which search endpoint feeds the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Coordinate + radius search (region-search variant).
    #[default]
    Nearby,
    /// Free-text query search (simple variant).
    Text,
}

impl SearchMode {
    /// Length of the ranked listing printed for this variant.
    pub fn default_top_n(self) -> usize {
        match self {
            Self::Nearby => 10,
            Self::Text => 5,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearby => write!(f, "nearby"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearby" | "region" => Ok(Self::Nearby),
            "text" | "simple" => Ok(Self::Text),
            other => Err(format!("Unknown search mode '{}'. Use 'nearby' or 'text'.", other)),
        }
    }
}

/// What to look for inside the area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub mode: SearchMode,
    /// Free-text keyword (e.g. "nha khoa"), sent as `keyword` or folded into the text query.
    pub keyword: Option<String>,
    /// Provider place type (e.g. "hospital").
    pub place_type: Option<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            mode: SearchMode::Nearby,
            keyword: None,
            place_type: Some("hospital".into()),
        }
    }
}

impl SearchRequest {
    /// Text-search query: "{keyword} {area}", trimmed. Without a keyword the
    /// place type stands in ("dental_clinic" → "dental clinic").
    pub fn text_query(&self, area_query: &str) -> String {
        let subject = match self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => keyword.to_string(),
            None => self.place_type.as_deref().unwrap_or("").trim().replace('_', " "),
        };
        format!("{} {}", subject, area_query.trim()).trim().to_string()
    }
}

/// One request against the place-search endpoint. The continuation token is
/// the only field that changes between pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub mode: SearchMode,
    pub center: Coordinate,
    pub radius_m: f64,
    pub keyword: Option<String>,
    pub place_type: Option<String>,
    /// Only used in text mode.
    pub text_query: String,
    pub page_token: Option<String>,
}

impl PageQuery {
    pub fn first(area: &SearchArea, area_query: &str, request: &SearchRequest) -> Self {
        Self {
            mode: request.mode,
            center: area.center,
            radius_m: area.radius_m,
            keyword: request.keyword.clone().filter(|k| !k.trim().is_empty()),
            place_type: request.place_type.clone().filter(|t| !t.trim().is_empty()),
            text_query: request.text_query(area_query),
            page_token: None,
        }
    }

    pub fn with_token(&self, token: String) -> Self {
        Self {
            page_token: Some(token),
            ..self.clone()
        }
    }
}

// ─── Wire models ────────────────────────────────────────────────

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(ll: LatLng) -> Self {
        Coordinate::new(ll.lat, ll.lng)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PlaceRecord {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    /// Short address (nearby search).
    #[serde(default)]
    pub vicinity: Option<String>,
    /// Full address (text search).
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub types: Vec<String>,
}

impl PlaceRecord {
    /// Convert into a domain place. Records without an identifier are dropped.
    pub fn into_place(self) -> Option<Place> {
        let id = self.place_id.filter(|id| !id.trim().is_empty())?;
        let address = [self.vicinity, self.formatted_address]
            .into_iter()
            .flatten()
            .find(|a| !a.trim().is_empty())
            .unwrap_or_default();

        Some(Place {
            id,
            name: self.name.unwrap_or_default(),
            rating: self.rating,
            review_count: self.user_ratings_total.unwrap_or(0),
            address,
            coordinate: self.geometry.and_then(|g| g.location).map(Coordinate::from),
            category_tags: self.types.into_iter().collect(),
        })
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PlacesPage {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<PlaceRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
