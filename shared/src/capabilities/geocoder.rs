use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;

/// Reverse geocoding: coordinate in, best-effort street address out.
pub struct Geocoder<Ev> {
    context: CapabilityContext<GeocodeOperation, Ev>,
}

impl<Ev> Capability<Ev> for Geocoder<Ev> {
    type Operation = GeocodeOperation;
    type MappedSelf<MappedEv> = Geocoder<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Geocoder::new(self.context.map_event(f))
    }
}

impl<Ev> Geocoder<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<GeocodeOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn reverse<F>(&self, point: GeoPoint, make_event: F)
    where
        F: FnOnce(GeocodeResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(GeocodeOperation::Reverse { point })
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum GeocodeOperation {
    Reverse { point: GeoPoint },
}

impl Operation for GeocodeOperation {
    type Output = GeocodeResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("no address found at this location")]
    NoResult,

    #[error("geocoder unavailable: {message}")]
    Unavailable { message: String },

    #[error("geocoder rate limited")]
    RateLimited,
}

pub type GeocodeResult = Result<String, GeocodeError>;
