mod auth;
mod geocoder;
mod launcher;
mod location;

pub use self::auth::{
    Auth, AuthError, AuthOperation, AuthOutput, AuthResult, OtpPurpose, Session,
};
pub use self::geocoder::{GeocodeError, GeocodeOperation, GeocodeResult, Geocoder};
pub use self::launcher::{LaunchError, LaunchOperation, LaunchResult, Launcher};
pub use self::location::{
    Location, LocationError, LocationOperation, LocationOutput, LocationResult, PermissionState,
};

// Crux's built-in Render covers view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub geocoder: Geocoder<Event>,
    pub location: Location<Event>,
    pub launcher: Launcher<Event>,
    pub auth: Auth<Event>,
}
