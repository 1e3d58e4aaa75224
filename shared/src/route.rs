//! Pickup/delivery endpoints and the long-press pick flow.
//!
//! A `RouteSession` lives exactly as long as the new-delivery flow. It owns the
//! form that consumes picks, so closing the flow drops the consumer with it and
//! late geocoder replies have nowhere to land.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::forms::DeliveryForm;
use crate::geo::{distance_km, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickId(pub u64);

impl std::fmt::Display for PickId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pick-{}", self.0)
    }
}

/// Hands out strictly increasing pick ids for the life of the app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickSequence {
    last: u64,
}

impl PickSequence {
    pub fn next_id(&mut self) -> PickId {
        self.last = self.last.saturating_add(1);
        PickId(self.last)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickTarget {
    Pickup,
    Delivery,
}

impl PickTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRequest {
    pub id: PickId,
    pub target: PickTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum EndpointLabel {
    Resolving,
    Resolved(String),
    Fallback(String),
}

impl EndpointLabel {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Resolving => None,
            Self::Resolved(text) | Self::Fallback(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub point: GeoPoint,
    pub pick_id: PickId,
    pub label: EndpointLabel,
}

/// Endpoints plus the values derived from them.
///
/// `distance_km` and `preview_path` are private and only ever recomputed from
/// the endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteState {
    pickup: Option<Endpoint>,
    delivery: Option<Endpoint>,
    distance_km: f64,
    preview_path: Vec<GeoPoint>,
}

impl RouteState {
    #[must_use]
    pub fn pickup(&self) -> Option<GeoPoint> {
        self.pickup.as_ref().map(|e| e.point)
    }

    #[must_use]
    pub fn delivery(&self) -> Option<GeoPoint> {
        self.delivery.as_ref().map(|e| e.point)
    }

    #[must_use]
    pub fn endpoint(&self, target: PickTarget) -> Option<&Endpoint> {
        match target {
            PickTarget::Pickup => self.pickup.as_ref(),
            PickTarget::Delivery => self.delivery.as_ref(),
        }
    }

    fn endpoint_mut(&mut self, target: PickTarget) -> &mut Option<Endpoint> {
        match target {
            PickTarget::Pickup => &mut self.pickup,
            PickTarget::Delivery => &mut self.delivery,
        }
    }

    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    #[must_use]
    pub fn preview_path(&self) -> &[GeoPoint] {
        &self.preview_path
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pickup.is_some() && self.delivery.is_some()
    }

    pub fn set_endpoint(&mut self, target: PickTarget, endpoint: Endpoint) {
        *self.endpoint_mut(target) = Some(endpoint);
        self.recompute();
    }

    fn recompute(&mut self) {
        match (self.pickup(), self.delivery()) {
            (Some(pickup), Some(delivery)) => {
                self.distance_km = distance_km(pickup, delivery);
                self.preview_path = vec![pickup, delivery];
            }
            _ => {
                self.distance_km = 0.0;
                self.preview_path.clear();
            }
        }
    }

    /// Preview path as a GeoJSON `LineString`, for shells that draw GeoJSON.
    #[must_use]
    pub fn preview_geojson(&self) -> Option<geojson::Geometry> {
        if self.preview_path.is_empty() {
            return None;
        }
        let line = self.preview_path.iter().map(|p| p.to_position()).collect();
        Some(geojson::Geometry::new(geojson::Value::LineString(line)))
    }
}

/// What a consumed long-press produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickOutcome {
    pub request: PickRequest,
    pub point: GeoPoint,
    pub route_complete: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteSession {
    route: RouteState,
    armed: Option<PickRequest>,
    pub form: DeliveryForm,
}

impl RouteSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(&self) -> &RouteState {
        &self.route
    }

    #[must_use]
    pub fn armed(&self) -> Option<PickRequest> {
        self.armed
    }

    /// Arms a pick, replacing any earlier one.
    pub fn arm(&mut self, target: PickTarget, id: PickId) -> PickRequest {
        let request = PickRequest { id, target };
        if let Some(previous) = self.armed.replace(request) {
            debug!(previous = %previous.id, next = %id, "pick request replaced");
        }
        request
    }

    pub fn disarm(&mut self) -> Option<PickRequest> {
        self.armed.take()
    }

    /// Consumes the armed request, if any. Without one the press is a no-op.
    pub fn long_press(&mut self, point: GeoPoint) -> Option<PickOutcome> {
        let request = self.armed.take()?;
        self.route.set_endpoint(
            request.target,
            Endpoint {
                point,
                pick_id: request.id,
                label: EndpointLabel::Resolving,
            },
        );
        self.form.set_point(request.target, point);
        self.sync_distance();
        Some(PickOutcome {
            request,
            point,
            route_complete: self.route.is_complete(),
        })
    }

    /// Stores a geocoder result. Returns false when the endpoint has since
    /// been replaced by a newer pick. An address the user typed after the
    /// pick is kept; only the endpoint label changes.
    pub fn apply_label(&mut self, target: PickTarget, pick_id: PickId, label: EndpointLabel) -> bool {
        let Some(endpoint) = self.route.endpoint_mut(target).as_mut() else {
            return false;
        };
        if endpoint.pick_id != pick_id {
            return false;
        }
        if let Some(text) = label.text() {
            if self.form.address_edited(target) {
                debug!(%pick_id, "address typed by user, keeping it");
            } else {
                self.form.set_address(target, text.to_string());
            }
        }
        endpoint.label = label;
        true
    }

    fn sync_distance(&mut self) {
        self.form.estimated_distance_km = self
            .route
            .is_complete()
            .then(|| self.route.distance_km());
    }
}
