use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capabilities::{OtpPurpose, PermissionState, Session};
use crate::config::InteractionConfig;
use crate::error::AppError;
use crate::forms::{FieldErrors, FormField, NewPasswordForm, SignInForm, SignUpForm};
use crate::geo::{GeoPoint, MapRegion};
use crate::navigation::Platform;
use crate::route::{PickSequence, RouteSession};
use crate::sheet::{DragPolicy, QuickActionsState, SheetState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Welcome,
    SignIn,
    SignUp,
    ForgotPassword,
    VerifyOtp,
    ResetPassword,
    Home,
}

impl Screen {
    #[must_use]
    pub const fn requires_session(self) -> bool {
        matches!(self, Self::Home)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthAction {
    SignIn,
    SignUp,
    RequestReset,
    VerifyOtp,
    ResetPassword,
}

/// Everything the auth screens type into, plus the one in-flight request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthFlow {
    pub sign_in: SignInForm,
    pub sign_up: SignUpForm,
    pub reset_email: String,
    pub otp_code: String,
    pub new_password: NewPasswordForm,
    /// Email the current OTP was sent to.
    pub otp_email: Option<String>,
    pub otp_purpose: Option<OtpPurpose>,
    /// Code accepted during a password reset, replayed on the final step.
    pub verified_code: Option<String>,
    pub pending: Option<AuthAction>,
    pub field_errors: FieldErrors,
    pub error: Option<String>,
}

impl AuthFlow {
    /// Routes a keystroke to the form on `screen`. Returns false when that
    /// screen has no such field.
    pub fn set_field(&mut self, screen: Screen, field: FormField, value: String) -> bool {
        let slot = match (screen, field) {
            (Screen::SignIn, FormField::Email) => &mut self.sign_in.email,
            (Screen::SignIn, FormField::Password) => &mut self.sign_in.password,
            (Screen::SignUp, FormField::Name) => &mut self.sign_up.name,
            (Screen::SignUp, FormField::Email) => &mut self.sign_up.email,
            (Screen::SignUp, FormField::Password) => &mut self.sign_up.password,
            (Screen::SignUp, FormField::ConfirmPassword) => &mut self.sign_up.confirm_password,
            (Screen::ForgotPassword, FormField::Email) => &mut self.reset_email,
            (Screen::VerifyOtp, FormField::OtpCode) => &mut self.otp_code,
            (Screen::ResetPassword, FormField::Password) => &mut self.new_password.password,
            (Screen::ResetPassword, FormField::ConfirmPassword) => {
                &mut self.new_password.confirm_password
            }
            _ => return false,
        };
        *slot = value;
        true
    }

    pub fn clear_feedback(&mut self) {
        self.field_errors.clear();
        self.error = None;
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationState {
    pub permission: PermissionState,
    /// A permission prompt is on screen and has not been answered.
    pub permission_pending: bool,
    pub fix: Option<GeoPoint>,
    pub denial_notice_shown: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySummary {
    pub id: Uuid,
    pub pickup_address: String,
    pub delivery_address: String,
    pub recipient_name: String,
    pub pickup: Option<GeoPoint>,
    pub delivery: Option<GeoPoint>,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub config: InteractionConfig,
    pub platform: Platform,

    pub screen: Screen,
    pub auth: AuthFlow,
    pub session: Option<Session>,

    pub location: LocationState,
    pub map_region: MapRegion,

    pub sheet: SheetState,
    pub sheet_drag_offset: f64,
    pub quick_actions: QuickActionsState,

    pub picks: PickSequence,
    /// Present only while the new-delivery flow is open.
    pub new_delivery: Option<RouteSession>,
    pub delivery_errors: FieldErrors,
    pub deliveries: Vec<DeliverySummary>,

    pub notice: Option<AppError>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn drag_policy(&self) -> DragPolicy {
        DragPolicy::from_config(&self.config)
    }

    /// Drops the screen-local UI state owned by the home screen.
    pub fn reset_screen_local(&mut self) {
        self.sheet = SheetState::Closed;
        self.sheet_drag_offset = 0.0;
        self.quick_actions = QuickActionsState::Closed;
        self.close_new_delivery();
    }

    pub fn close_new_delivery(&mut self) {
        self.new_delivery = None;
        self.delivery_errors.clear();
    }

    pub fn set_notice(&mut self, error: AppError) {
        if error.is_user_visible() {
            self.notice = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::SheetPanel;

    #[test]
    fn test_defaults() {
        let model = Model::new();
        assert_eq!(model.screen, Screen::Welcome);
        assert_eq!(model.sheet, SheetState::Closed);
        assert!(!model.quick_actions.is_open());
        assert!(model.new_delivery.is_none());
        assert_eq!(model.map_region, model.config.default_region);
    }

    #[test]
    fn test_reset_screen_local() {
        let mut model = Model::new();
        model.sheet = SheetState::FullOpen(SheetPanel::NewDelivery);
        model.quick_actions = QuickActionsState::Open;
        model.new_delivery = Some(RouteSession::new());
        model.sheet_drag_offset = 30.0;

        model.reset_screen_local();

        assert_eq!(model.sheet, SheetState::Closed);
        assert_eq!(model.quick_actions, QuickActionsState::Closed);
        assert!(model.new_delivery.is_none());
        assert_eq!(model.sheet_drag_offset, 0.0);
    }

    #[test]
    fn test_auth_fields_route_by_screen() {
        let mut auth = AuthFlow::default();
        assert!(auth.set_field(Screen::SignIn, FormField::Email, "a@b.co".into()));
        assert!(auth.set_field(Screen::ForgotPassword, FormField::Email, "c@d.co".into()));
        assert!(!auth.set_field(Screen::SignIn, FormField::OtpCode, "1".into()));
        assert!(!auth.set_field(Screen::Home, FormField::Email, "x".into()));
        assert_eq!(auth.sign_in.email, "a@b.co");
        assert_eq!(auth.reset_email, "c@d.co");
    }
}
