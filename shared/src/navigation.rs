//! Turn-by-turn hand-off to the platform's maps application.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::geo::GeoPoint;

const APPLE_MAPS_BASE: &str = "http://maps.apple.com/";
const GOOGLE_MAPS_DIR_BASE: &str = "https://www.google.com/maps/dir/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    #[default]
    Android,
    Web,
}

fn coord(point: GeoPoint) -> String {
    format!("{},{}", point.latitude, point.longitude)
}

/// Builds the directions URL for `platform`.
///
/// Apple maps take `saddr`/`daddr`; everything else gets a Google Maps
/// directions link with `origin`/`destination`.
pub fn directions_url(
    platform: Platform,
    pickup: GeoPoint,
    delivery: GeoPoint,
) -> Result<Url, url::ParseError> {
    match platform {
        Platform::Ios => Url::parse_with_params(
            APPLE_MAPS_BASE,
            &[("saddr", coord(pickup)), ("daddr", coord(delivery))],
        ),
        Platform::Android | Platform::Web => Url::parse_with_params(
            GOOGLE_MAPS_DIR_BASE,
            &[
                ("api", "1".to_string()),
                ("origin", coord(pickup)),
                ("destination", coord(delivery)),
                ("travelmode", "driving".to_string()),
            ],
        ),
    }
}
