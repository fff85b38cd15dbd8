//! Ranking and presentation.
//!
//! `rank` is the only decision logic here; everything else turns
//! [`Findings`] into a serializable [`Report`] and renders it as text.

use crate::config::Config;
use crate::finder::Findings;
use crate::geo::{format_coords, Coordinate};
use crate::maps::{Place, SearchMode};
use crate::normalize::contains_phrase;
use serde::Serialize;

/// Shown when a place has no rating or no address.
pub const NOT_AVAILABLE: &str = "N/A";

/// At most this many category tags are listed per place.
const MAX_TAGS: usize = 6;

/// Province/city names that mark an address as already complete.
const FULL_ADDRESS_INDICATORS: &[&str] = &[
    "viet nam", "vietnam", "ho chi minh", "hcm", "ha noi", "hn", "da lat", "lam dong", "vung tau",
    "ba ria", "da nang", "can tho", "hue", "thua thien",
];

/// Sort by review count, most reviewed first. Stable, so ties keep first-seen order.
pub fn rank(places: &[Place]) -> Vec<Place> {
    let mut ranked = places.to_vec();
    ranked.sort_by(|a, b| b.review_count.cmp(&a.review_count));
    ranked
}

/// Complete a short (vicinity) address with the searched area and country.
pub fn augment_address(address: &str, area_query: &str, country_suffix: &str) -> String {
    let address = address.trim();
    if address.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    let is_full = FULL_ADDRESS_INDICATORS.iter().any(|ind| contains_phrase(address, ind));
    if is_full || area_query.trim().is_empty() {
        return address.to_string();
    }
    if country_suffix.trim().is_empty() {
        format!("{}, {}", address, area_query.trim())
    } else {
        format!("{}, {}, {}", address, area_query.trim(), country_suffix.trim())
    }
}

/// "point_of_interest" → "Point Of Interest".
pub fn type_label(tag: &str) -> String {
    tag.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn maps_url(place_id: &str) -> String {
    format!("https://www.google.com/maps/place/?q=place_id:{}", place_id)
}

/// 12345 → "12,345".
pub fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Informational API spend for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub api_calls: u32,
    pub price_per_call: f64,
    pub total_usd: f64,
}

impl CostEstimate {
    pub fn new(api_calls: u32, price_per_call: f64) -> Self {
        Self {
            api_calls,
            price_per_call,
            total_usd: f64::from(api_calls) * price_per_call,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub rank: usize,
    pub place_id: String,
    pub name: String,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub address: String,
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    pub maps_url: String,
}

impl ReportEntry {
    fn from_place(rank: usize, place: &Place, area_query: &str, country_suffix: &str) -> Self {
        Self {
            rank,
            place_id: place.id.clone(),
            name: place.name.clone(),
            rating: place.rating,
            review_count: place.review_count,
            address: augment_address(&place.address, area_query, country_suffix),
            types: place.category_tags.iter().take(MAX_TAGS).cloned().collect(),
            location: place.coordinate,
            maps_url: maps_url(&place.id),
        }
    }

    fn rating_text(&self) -> String {
        match self.rating {
            Some(r) => format!("{:.1}/5.0", r),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    fn types_text(&self) -> String {
        if self.types.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            self.types.iter().map(|t| type_label(t)).collect::<Vec<_>>().join(", ")
        }
    }
}

/// Everything printed (or served) for one search.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    pub mode: SearchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_m: Option<f64>,
    /// Places after filtering (or fallback), before truncation to the top N.
    pub total_count: usize,
    /// Distinct places seen before area filtering.
    pub raw_count: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fell_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<ReportEntry>,
    pub places: Vec<ReportEntry>,
    pub cost: CostEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: String,
}

impl Report {
    pub fn build(findings: &Findings, top_n: usize, config: &Config) -> Self {
        let suffix = config.country_suffix.as_str();
        let area_query = findings.area_query.as_str();
        let places: Vec<ReportEntry> = findings
            .ranked
            .iter()
            .take(top_n)
            .enumerate()
            .map(|(i, p)| ReportEntry::from_place(i + 1, p, area_query, suffix))
            .collect();

        Self {
            area: findings.area_query.clone(),
            keyword: findings.request.keyword.clone(),
            place_type: findings.request.place_type.clone(),
            mode: findings.request.mode,
            resolved_area: findings.area.as_ref().map(|a| a.display_name.clone()),
            center: findings.area.as_ref().map(|a| a.center),
            radius_m: findings.area.as_ref().map(|a| a.radius_m.round()),
            total_count: findings.ranked.len(),
            raw_count: findings.outcome.raw.len(),
            fell_back: findings.outcome.fell_back,
            top: places.first().cloned(),
            places,
            cost: CostEstimate::new(findings.api_calls, config.price_per_call),
            error: findings.failure.as_ref().map(|e| e.to_string()),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn subject(&self) -> String {
        match (&self.keyword, &self.place_type) {
            (Some(k), _) => format!("'{}'", k),
            (None, Some(t)) => type_label(t),
            (None, None) => "Places".to_string(),
        }
    }
}

const RULE_WIDTH: usize = 80;

/// Human-readable report for stdout.
pub fn render_text(report: &Report) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("  Area: {}\n", report.area));
    if let (Some(center), Some(radius)) = (&report.center, report.radius_m) {
        out.push_str(&format!("  Center: {} (radius {:.0} m)\n", format_coords(center), radius));
    }
    if let Some(resolved) = &report.resolved_area {
        out.push_str(&format!("  Resolved as: {}\n", resolved));
    }
    out.push_str(&format!(
        "  Found {} place(s) in area ({} distinct in radius, {} search)\n",
        report.total_count, report.raw_count, report.mode
    ));
    if report.fell_back {
        out.push_str("  Note: no address matched the area; showing every place in the radius.\n");
    }
    if let Some(err) = &report.error {
        out.push_str(&format!("  Warning: {}\n", err));
    }

    let Some(top) = &report.top else {
        out.push_str(&format!("\n  No {} found in {}.\n", report.subject(), report.area));
        push_cost(&mut out, &report.cost);
        return out;
    };

    out.push('\n');
    out.push_str(&heavy);
    out.push('\n');
    out.push_str(&format!("  MOST REVIEWED {} IN {}\n", report.subject().to_uppercase(), report.area.to_uppercase()));
    out.push_str(&heavy);
    out.push('\n');
    out.push_str(&format!("  Name:     {}\n", top.name));
    out.push_str(&format!("  Rating:   {}\n", top.rating_text()));
    out.push_str(&format!("  Reviews:  {}\n", group_thousands(top.review_count)));
    out.push_str(&format!("  Address:  {}\n", top.address));
    out.push_str(&format!("  Types:    {}\n", top.types_text()));
    out.push_str(&format!("  Place ID: {}\n", top.place_id));

    out.push('\n');
    out.push_str(&heavy);
    out.push('\n');
    out.push_str(&format!("  TOP {} (of {} results)\n", report.places.len(), report.total_count));
    out.push_str(&heavy);
    out.push('\n');
    for entry in &report.places {
        out.push_str(&format!("\n  {}. {}\n", entry.rank, entry.name));
        out.push_str(&format!(
            "     Rating: {} | Reviews: {}\n",
            entry.rating_text(),
            group_thousands(entry.review_count)
        ));
        out.push_str(&format!("     Address: {}\n", entry.address));
        out.push_str(&format!("     Types: {}\n", entry.types_text()));
        out.push_str(&format!("     ID: {}\n", entry.place_id));
        out.push_str(&light);
        out.push('\n');
    }

    push_cost(&mut out, &report.cost);
    out
}

fn push_cost(out: &mut String, cost: &CostEstimate) {
    out.push_str(&format!(
        "\n  Estimated cost: {} request(s) x ${:.3} = ${:.3}\n",
        cost.api_calls, cost.price_per_call, cost.total_usd
    ));
}
