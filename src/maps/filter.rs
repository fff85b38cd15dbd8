//! Area membership: does a candidate place belong to the queried area?
//!
//! 1. Address contains a normalized area token (len > 2) → member, regardless of distance
//! 2. Has coordinates → member iff within the resolved radius
//! 3. No coordinates, no text match → member (fail open)

use super::types::{Place, SearchArea};
use crate::geo::{haversine_m, Coordinate};
use crate::normalize::normalize;

/// Which rule decided membership.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Membership {
    TextMatch,
    /// Distance from the center in meters.
    WithinRadius(f64),
    OutsideRadius(f64),
    /// No text match and nothing to measure; accepted.
    Unlocated,
}

impl Membership {
    pub fn is_member(&self) -> bool {
        !matches!(self, Self::OutsideRadius(_))
    }
}

/// Normalized whitespace tokens of the area query longer than two characters.
/// Punctuation stuck to a token ("nhuan,") is trimmed first.
pub fn area_tokens(area_query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for raw in normalize(area_query).split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if token.chars().count() > 2 && !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Membership test bound to one resolved area.
#[derive(Debug, Clone)]
pub struct AreaFilter {
    tokens: Vec<String>,
    center: Coordinate,
    radius_m: f64,
}

impl AreaFilter {
    pub fn new(area_query: &str, center: Coordinate, radius_m: f64) -> Self {
        Self {
            tokens: area_tokens(area_query),
            center,
            radius_m,
        }
    }

    pub fn for_area(area_query: &str, area: &SearchArea) -> Self {
        Self::new(area_query, area.center, area.radius_m)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn check(&self, place: &Place) -> Membership {
        let address = normalize(&place.address);
        if self.tokens.iter().any(|t| address.contains(t.as_str())) {
            return Membership::TextMatch;
        }

        match &place.coordinate {
            Some(coord) => {
                let dist = haversine_m(&self.center, coord);
                if dist <= self.radius_m {
                    Membership::WithinRadius(dist)
                } else {
                    Membership::OutsideRadius(dist)
                }
            }
            None => Membership::Unlocated,
        }
    }
}

/// One-shot form of [`AreaFilter::check`].
pub fn is_in_area(place: &Place, area_query: &str, center: Coordinate, radius_m: f64) -> bool {
    AreaFilter::new(area_query, center, radius_m).check(place).is_member()
}
