//! Mapping-provider subsystem.
//!
//! Area resolution via geocoding, paged place search, and the area
//! membership filter applied to every search result.

pub mod filter;
pub mod provider;
pub mod resolver;
pub mod search;
pub mod types;

pub use filter::{is_in_area, AreaFilter, Membership};
pub use provider::{GoogleMapsClient, MapsProvider};
pub use resolver::AreaResolver;
pub use search::{PagedSearch, SearchOutcome};
pub use types::{Place, SearchArea, SearchMode, SearchRequest};
