use crate::maps::GoogleMapsClient;

pub struct AppState {
    pub client: GoogleMapsClient,
}
