use serde::{Deserialize, Serialize};

use crate::capabilities::OtpPurpose;
use crate::forms::{DeliveryForm, FieldErrors, FormField};
use crate::geo::{format_distance_km, GeoPoint, MapRegion};
use crate::model::{DeliverySummary, Model, Screen};
use crate::route::{EndpointLabel, PickTarget};
use crate::sheet::{QuickActionsPresentation, SheetPanel, SheetPresentation, SheetState};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldErrorView {
    pub field: FormField,
    pub message: String,
}

fn field_error_views(errors: &FieldErrors) -> Vec<FieldErrorView> {
    errors
        .iter()
        .map(|e| FieldErrorView {
            field: e.field,
            message: e.message(),
        })
        .collect()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthView {
    pub busy: bool,
    pub error: Option<String>,
    pub field_errors: Vec<FieldErrorView>,
    pub otp_email: Option<String>,
    pub otp_purpose: Option<OtpPurpose>,
    pub otp_length: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    CurrentLocation,
    Pickup,
    Delivery,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MarkerView {
    pub kind: MarkerKind,
    pub point: GeoPoint,
    pub title: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    /// Region the map should animate to.
    pub region: MapRegion,
    pub markers: Vec<MarkerView>,
    pub polyline: Vec<GeoPoint>,
    /// Same path as a GeoJSON `LineString`, for shells that draw GeoJSON layers.
    pub preview_geojson: Option<geojson::Geometry>,
    /// Which field a long-press will fill, if any.
    pub armed_pick: Option<PickTarget>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SheetView {
    pub state: SheetState,
    pub panel: Option<SheetPanel>,
    pub presentation: SheetPresentation,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuickActionsView {
    pub open: bool,
    pub presentation: QuickActionsPresentation,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewDeliveryView {
    pub form: DeliveryForm,
    pub field_errors: Vec<FieldErrorView>,
    pub pickup_resolving: bool,
    pub delivery_resolving: bool,
    pub distance_km: Option<f64>,
    pub distance_label: Option<String>,
    pub can_open_directions: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub screen: Screen,
    pub auth: AuthView,
    pub user_name: Option<String>,
    pub map: MapView,
    pub sheet: SheetView,
    pub quick_actions: QuickActionsView,
    pub new_delivery: Option<NewDeliveryView>,
    pub deliveries: Vec<DeliverySummary>,
    pub notice: Option<String>,
}

impl ViewModel {
    #[must_use]
    pub fn build(model: &Model) -> Self {
        Self {
            screen: model.screen,
            auth: auth_view(model),
            user_name: model.session.as_ref().map(|s| s.display_name.clone()),
            map: map_view(model),
            sheet: SheetView {
                state: model.sheet,
                panel: model.sheet.panel(),
                presentation: SheetPresentation::of(
                    model.sheet,
                    model.sheet_drag_offset,
                    &model.config,
                ),
            },
            quick_actions: QuickActionsView {
                open: model.quick_actions.is_open(),
                presentation: QuickActionsPresentation::of(model.quick_actions, &model.config),
            },
            new_delivery: new_delivery_view(model),
            deliveries: model.deliveries.clone(),
            notice: model.notice.as_ref().map(|n| n.user_facing_message()),
        }
    }
}

fn auth_view(model: &Model) -> AuthView {
    let auth = &model.auth;
    AuthView {
        busy: auth.is_busy(),
        error: auth.error.clone(),
        field_errors: field_error_views(&auth.field_errors),
        otp_email: auth.otp_email.clone(),
        otp_purpose: auth.otp_purpose,
        otp_length: model.config.otp_length,
    }
}

fn map_view(model: &Model) -> MapView {
    let mut markers = Vec::new();
    if let Some(fix) = model.location.fix {
        markers.push(MarkerView {
            kind: MarkerKind::CurrentLocation,
            point: fix,
            title: None,
        });
    }

    let mut polyline = Vec::new();
    let mut preview_geojson = None;
    let mut armed_pick = None;
    if let Some(session) = &model.new_delivery {
        let route = session.route();
        for (target, kind) in [
            (PickTarget::Pickup, MarkerKind::Pickup),
            (PickTarget::Delivery, MarkerKind::Delivery),
        ] {
            if let Some(endpoint) = route.endpoint(target) {
                markers.push(MarkerView {
                    kind,
                    point: endpoint.point,
                    title: endpoint.label.text().map(str::to_string),
                });
            }
        }
        polyline = route.preview_path().to_vec();
        preview_geojson = route.preview_geojson();
        armed_pick = session.armed().map(|r| r.target);
    }

    MapView {
        region: model.map_region,
        markers,
        polyline,
        preview_geojson,
        armed_pick,
    }
}

fn new_delivery_view(model: &Model) -> Option<NewDeliveryView> {
    let session = model.new_delivery.as_ref()?;
    let route = session.route();
    let resolving = |target| {
        route
            .endpoint(target)
            .is_some_and(|e| e.label == EndpointLabel::Resolving)
    };
    let distance_km = route.is_complete().then(|| route.distance_km());
    Some(NewDeliveryView {
        form: session.form.clone(),
        field_errors: field_error_views(&model.delivery_errors),
        pickup_resolving: resolving(PickTarget::Pickup),
        delivery_resolving: resolving(PickTarget::Delivery),
        distance_km,
        distance_label: distance_km.map(format_distance_km),
        can_open_directions: route.is_complete(),
    })
}
