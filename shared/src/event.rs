use serde::{Deserialize, Serialize};

use crate::capabilities::{AuthResult, GeocodeResult, LaunchResult, LocationResult};
use crate::config::InteractionConfig;
use crate::forms::FormField;
use crate::geo::GeoPoint;
use crate::model::{AuthAction, Screen};
use crate::navigation::Platform;
use crate::route::{PickId, PickTarget};
use crate::sheet::{DragRelease, SheetPanel};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Event {
    #[default]
    Noop,

    ShellStarted {
        platform: Platform,
    },
    Configure(InteractionConfig),
    ConfigureJson(String),
    Navigate(Screen),

    AuthFieldChanged {
        field: FormField,
        value: String,
    },
    SignInSubmitted,
    SignUpSubmitted,
    ResetRequested,
    OtpSubmitted,
    NewPasswordSubmitted,
    SignOut,

    HomeOpened,
    RecenterRequested,

    OpenSheet(SheetPanel),
    ExpandSheet,
    CollapseSheet,
    CloseSheet,
    SheetDragMoved {
        dy: f64,
    },
    SheetDragReleased(DragRelease),
    ToggleQuickActions,
    QuickActionsDragReleased(DragRelease),

    StartNewDelivery,
    CancelNewDelivery,
    ArmPick(PickTarget),
    CancelPick,
    MapLongPressed(GeoPoint),
    DeliveryFieldChanged {
        field: FormField,
        value: String,
    },
    SubmitDelivery,
    OpenDirections,

    DismissNotice,

    // Capability responses; never sent by the shell.
    #[serde(skip)]
    AuthResponse {
        action: AuthAction,
        result: Box<AuthResult>,
    },
    #[serde(skip)]
    LocationPermissionResolved(Box<LocationResult>),
    #[serde(skip)]
    PositionResolved(Box<LocationResult>),
    #[serde(skip)]
    AddressResolved {
        target: PickTarget,
        pick_id: PickId,
        point: GeoPoint,
        result: Box<GeocodeResult>,
    },
    #[serde(skip)]
    DirectionsLaunched(Box<LaunchResult>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::ShellStarted { .. } => "shell_started",
            Self::Configure(_) => "configure",
            Self::ConfigureJson(_) => "configure_json",
            Self::Navigate(_) => "navigate",
            Self::AuthFieldChanged { .. } => "auth_field_changed",
            Self::SignInSubmitted => "sign_in_submitted",
            Self::SignUpSubmitted => "sign_up_submitted",
            Self::ResetRequested => "reset_requested",
            Self::OtpSubmitted => "otp_submitted",
            Self::NewPasswordSubmitted => "new_password_submitted",
            Self::SignOut => "sign_out",
            Self::HomeOpened => "home_opened",
            Self::RecenterRequested => "recenter_requested",
            Self::OpenSheet(_) => "open_sheet",
            Self::ExpandSheet => "expand_sheet",
            Self::CollapseSheet => "collapse_sheet",
            Self::CloseSheet => "close_sheet",
            Self::SheetDragMoved { .. } => "sheet_drag_moved",
            Self::SheetDragReleased(_) => "sheet_drag_released",
            Self::ToggleQuickActions => "toggle_quick_actions",
            Self::QuickActionsDragReleased(_) => "quick_actions_drag_released",
            Self::StartNewDelivery => "start_new_delivery",
            Self::CancelNewDelivery => "cancel_new_delivery",
            Self::ArmPick(_) => "arm_pick",
            Self::CancelPick => "cancel_pick",
            Self::MapLongPressed(_) => "map_long_pressed",
            Self::DeliveryFieldChanged { .. } => "delivery_field_changed",
            Self::SubmitDelivery => "submit_delivery",
            Self::OpenDirections => "open_directions",
            Self::DismissNotice => "dismiss_notice",
            Self::AuthResponse { .. } => "auth_response",
            Self::LocationPermissionResolved(_) => "location_permission_resolved",
            Self::PositionResolved(_) => "position_resolved",
            Self::AddressResolved { .. } => "address_resolved",
            Self::DirectionsLaunched(_) => "directions_launched",
        }
    }

    /// High-frequency gesture events are kept out of info-level logs.
    #[must_use]
    pub const fn is_gesture_stream(&self) -> bool {
        matches!(self, Self::SheetDragMoved { .. })
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::Noop
                | Self::ShellStarted { .. }
                | Self::Configure(_)
                | Self::ConfigureJson(_)
                | Self::AuthResponse { .. }
                | Self::LocationPermissionResolved(_)
                | Self::PositionResolved(_)
                | Self::AddressResolved { .. }
                | Self::DirectionsLaunched(_)
        )
    }
}
