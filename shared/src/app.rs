use tracing::{debug, info, trace, warn};

use crate::capabilities::{
    AuthError, AuthOutput, AuthResult, Capabilities, GeocodeResult, LaunchResult, LocationError,
    LocationOutput, LocationResult, OtpPurpose, PermissionState,
};
use crate::config::InteractionConfig;
use crate::error::{AppError, ErrorKind};
use crate::event::Event;
use crate::forms::{validate_email, validate_otp, FieldErrors, FormField};
use crate::geo::{coordinate_label, GeoPoint, MapRegion};
use crate::model::{AuthAction, AuthFlow, DeliverySummary, Model, Screen};
use crate::navigation::directions_url;
use crate::route::{EndpointLabel, PickId, PickTarget, RouteSession};
use crate::sheet::{DragOutcome, SheetPanel, SheetState};
use crate::view::ViewModel;

#[derive(Default)]
pub struct App;

impl App {
    /// Returns false when the config is rejected and nothing changed.
    fn apply_config(config: InteractionConfig, model: &mut Model) -> bool {
        let config = match config.validated() {
            Ok(config) => config,
            Err(e) => {
                Self::config_rejected(AppError::from(e));
                return false;
            }
        };
        if model.location.fix.is_none() && model.map_region == model.config.default_region {
            model.map_region = config.default_region;
        }
        model.config = config;
        info!("interaction config applied");
        true
    }

    fn config_rejected(error: AppError) {
        warn!(
            code = error.code(),
            error = %error,
            "config rejected, keeping current settings"
        );
    }

    fn navigate(screen: Screen, model: &mut Model) {
        if screen.requires_session() && model.session.is_none() {
            warn!(?screen, "navigation needs a signed-in session");
            return;
        }
        if model.screen == Screen::Home && screen != Screen::Home {
            model.reset_screen_local();
        }
        model.auth.clear_feedback();
        model.screen = screen;
    }

    /// Moves the sheet, discarding the new-delivery flow when its panel goes.
    fn set_sheet(next: SheetState, model: &mut Model) {
        if next.panel() != Some(SheetPanel::NewDelivery) && model.new_delivery.is_some() {
            info!("new delivery flow discarded");
            model.close_new_delivery();
        }
        model.sheet = next;
    }

    fn start_new_delivery(model: &mut Model) {
        if model.new_delivery.is_none() {
            model.new_delivery = Some(RouteSession::new());
            model.delivery_errors.clear();
            info!("new delivery flow opened");
        }
        model.sheet = model.sheet.open(SheetPanel::NewDelivery);
    }

    // --- auth ---

    fn begin_auth(action: AuthAction, model: &mut Model) -> bool {
        if let Some(pending) = model.auth.pending {
            debug!(?pending, ?action, "auth request already in flight");
            return false;
        }
        model.auth.clear_feedback();
        model.auth.pending = Some(action);
        true
    }

    fn reject_fields(errors: FieldErrors, model: &mut Model) {
        debug!(count = errors.iter().count(), "form rejected");
        model.auth.error = None;
        model.auth.field_errors = errors;
    }

    fn auth_callback(action: AuthAction) -> impl FnOnce(AuthResult) -> Event + Send + 'static {
        move |result| Event::AuthResponse {
            action,
            result: Box::new(result),
        }
    }

    fn submit_sign_in(model: &mut Model, caps: &Capabilities) {
        if let Err(errors) = model.auth.sign_in.validate() {
            return Self::reject_fields(errors, model);
        }
        if !Self::begin_auth(AuthAction::SignIn, model) {
            return;
        }
        let form = &model.auth.sign_in;
        caps.auth.sign_in(
            form.email.trim().to_string(),
            form.password.clone(),
            Self::auth_callback(AuthAction::SignIn),
        );
    }

    fn submit_sign_up(model: &mut Model, caps: &Capabilities) {
        if let Err(errors) = model.auth.sign_up.validate() {
            return Self::reject_fields(errors, model);
        }
        if !Self::begin_auth(AuthAction::SignUp, model) {
            return;
        }
        let form = &model.auth.sign_up;
        caps.auth.sign_up(
            form.name.trim().to_string(),
            form.email.trim().to_string(),
            form.password.clone(),
            Self::auth_callback(AuthAction::SignUp),
        );
    }

    fn submit_reset_request(model: &mut Model, caps: &Capabilities) {
        if let Err(error) = validate_email(&model.auth.reset_email) {
            let mut errors = FieldErrors::default();
            errors.push(FormField::Email, error);
            return Self::reject_fields(errors, model);
        }
        if !Self::begin_auth(AuthAction::RequestReset, model) {
            return;
        }
        caps.auth.request_reset(
            model.auth.reset_email.trim().to_string(),
            Self::auth_callback(AuthAction::RequestReset),
        );
    }

    fn submit_otp(model: &mut Model, caps: &Capabilities) {
        if let Err(error) = validate_otp(&model.auth.otp_code, model.config.otp_length) {
            let mut errors = FieldErrors::default();
            errors.push(FormField::OtpCode, error);
            return Self::reject_fields(errors, model);
        }
        let (Some(email), Some(purpose)) = (model.auth.otp_email.clone(), model.auth.otp_purpose)
        else {
            warn!("otp submitted without a pending verification");
            model.auth.error = Some(
                AppError::new(ErrorKind::InvalidState, "verification expired").user_facing_message(),
            );
            return;
        };
        if !Self::begin_auth(AuthAction::VerifyOtp, model) {
            return;
        }
        caps.auth.verify_otp(
            email,
            model.auth.otp_code.trim().to_string(),
            purpose,
            Self::auth_callback(AuthAction::VerifyOtp),
        );
    }

    fn submit_new_password(model: &mut Model, caps: &Capabilities) {
        if let Err(errors) = model.auth.new_password.validate() {
            return Self::reject_fields(errors, model);
        }
        let (Some(email), Some(code)) = (
            model.auth.otp_email.clone(),
            model.auth.verified_code.clone(),
        ) else {
            warn!("password reset submitted before the code was verified");
            model.auth.error = Some(
                AppError::new(ErrorKind::InvalidState, "verification expired").user_facing_message(),
            );
            return;
        };
        if !Self::begin_auth(AuthAction::ResetPassword, model) {
            return;
        }
        caps.auth.reset_password(
            email,
            code,
            model.auth.new_password.password.clone(),
            Self::auth_callback(AuthAction::ResetPassword),
        );
    }

    fn handle_auth_response(action: AuthAction, result: AuthResult, model: &mut Model) {
        if model.auth.pending != Some(action) {
            debug!(?action, "dropping auth reply with no matching request");
            return;
        }
        model.auth.pending = None;

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                warn!(?action, error = %e, "auth request failed");
                model.auth.error = Some(AppError::from(e).user_facing_message());
                return;
            }
        };

        match (action, output) {
            (AuthAction::SignIn | AuthAction::SignUp, AuthOutput::SignedIn(session)) => {
                info!(user_id = %session.user_id, "signed in");
                model.session = Some(session);
                model.auth = AuthFlow::default();
                model.screen = Screen::Home;
            }
            (AuthAction::SignUp, AuthOutput::VerificationRequired) => {
                model.auth.otp_email = Some(model.auth.sign_up.email.trim().to_string());
                model.auth.otp_purpose = Some(OtpPurpose::SignUp);
                model.auth.otp_code.clear();
                model.screen = Screen::VerifyOtp;
            }
            (AuthAction::RequestReset, AuthOutput::ResetCodeSent) => {
                model.auth.otp_email = Some(model.auth.reset_email.trim().to_string());
                model.auth.otp_purpose = Some(OtpPurpose::PasswordReset);
                model.auth.otp_code.clear();
                model.screen = Screen::VerifyOtp;
            }
            (AuthAction::VerifyOtp, AuthOutput::OtpVerified(session)) => {
                match (model.auth.otp_purpose, session) {
                    (Some(OtpPurpose::SignUp), Some(session)) => {
                        info!(user_id = %session.user_id, "account verified");
                        model.session = Some(session);
                        model.auth = AuthFlow::default();
                        model.screen = Screen::Home;
                    }
                    (Some(OtpPurpose::SignUp), None) => {
                        let email = model.auth.otp_email.take().unwrap_or_default();
                        model.auth = AuthFlow::default();
                        model.auth.sign_in.email = email;
                        model.screen = Screen::SignIn;
                    }
                    (Some(OtpPurpose::PasswordReset), _) => {
                        model.auth.verified_code = Some(model.auth.otp_code.trim().to_string());
                        model.screen = Screen::ResetPassword;
                    }
                    (None, _) => {
                        warn!("otp verified with no purpose on record");
                        model.screen = Screen::SignIn;
                    }
                }
            }
            (AuthAction::ResetPassword, AuthOutput::PasswordUpdated) => {
                let email = model.auth.otp_email.take().unwrap_or_default();
                model.auth = AuthFlow::default();
                model.auth.sign_in.email = email;
                model.screen = Screen::SignIn;
                info!("password reset completed");
            }
            (action, output) => {
                warn!(?action, ?output, "unexpected auth response");
                model.auth.error =
                    Some(AppError::from(AuthError::Other {
                        message: "Unexpected response from the server".into(),
                    })
                    .user_facing_message());
            }
        }
    }

    // --- location ---

    fn handle_permission(result: LocationResult, model: &mut Model, caps: &Capabilities) {
        model.location.permission_pending = false;
        match result {
            Ok(LocationOutput::Permission(PermissionState::Granted)) => {
                model.location.permission = PermissionState::Granted;
                caps.location
                    .current_position(|r| Event::PositionResolved(Box::new(r)));
            }
            Ok(LocationOutput::Permission(PermissionState::Denied))
            | Err(LocationError::PermissionDenied) => Self::permission_denied(model),
            Ok(other) => {
                warn!(?other, "unexpected location permission output");
            }
            Err(e) => {
                // can't ask again without user action; carry on without a fix
                warn!(error = %e, "location permission request failed");
                model.location.permission = PermissionState::Denied;
            }
        }
    }

    fn permission_denied(model: &mut Model) {
        model.location.permission = PermissionState::Denied;
        if !model.location.denial_notice_shown {
            warn!("location permission denied, using default region");
            model.location.denial_notice_shown = true;
            model.set_notice(AppError::from(LocationError::PermissionDenied));
        }
    }

    fn handle_position(result: LocationResult, model: &mut Model) {
        match result {
            Ok(LocationOutput::Position(point)) if point.is_valid() => {
                model.location.fix = Some(point);
                let route_empty = model.new_delivery.as_ref().map_or(true, |s| {
                    s.route().pickup().is_none() && s.route().delivery().is_none()
                });
                if route_empty {
                    model.map_region = MapRegion::around(point);
                }
                debug!(lat = point.latitude, lng = point.longitude, "location fix");
            }
            Ok(LocationOutput::Position(point)) => {
                warn!(?point, "ignoring invalid location fix");
            }
            Ok(other) => warn!(?other, "unexpected location output"),
            Err(LocationError::PermissionDenied) => Self::permission_denied(model),
            Err(e) => warn!(error = %e, "no location fix, keeping current region"),
        }
    }

    // --- pick on map ---

    fn arm_pick(target: PickTarget, model: &mut Model) {
        let Some(session) = model.new_delivery.as_mut() else {
            debug!(pick_target = target.as_str(), "pick armed with no delivery flow open");
            return;
        };
        let request = session.arm(target, model.picks.next_id());
        model.sheet = model.sheet.collapse();
        debug!(pick_target = target.as_str(), pick_id = %request.id, "pick armed");
    }

    fn long_press(point: GeoPoint, model: &mut Model, caps: &Capabilities) {
        let Some(session) = model.new_delivery.as_mut() else {
            trace!("long-press outside the delivery flow");
            return;
        };
        let Some(outcome) = session.long_press(point) else {
            trace!("long-press with no pick armed");
            return;
        };

        let target = outcome.request.target;
        let pick_id = outcome.request.id;
        info!(pick_target = target.as_str(), %pick_id, "location picked");

        if outcome.route_complete {
            let route = session.route();
            if let (Some(pickup), Some(delivery)) = (route.pickup(), route.delivery()) {
                info!(distance_km = route.distance_km(), "route preview updated");
                model.map_region = MapRegion::fitting(pickup, delivery);
            }
        } else {
            model.map_region = MapRegion::around(point);
        }

        caps.geocoder.reverse(point, move |result| Event::AddressResolved {
            target,
            pick_id,
            point,
            result: Box::new(result),
        });
    }

    fn address_resolved(
        target: PickTarget,
        pick_id: PickId,
        point: GeoPoint,
        result: GeocodeResult,
        model: &mut Model,
    ) {
        let precision = model.config.label_precision;
        let Some(session) = model.new_delivery.as_mut() else {
            debug!(%pick_id, "delivery flow closed, dropping address");
            return;
        };
        let label = match result {
            Ok(address) if !address.trim().is_empty() => EndpointLabel::Resolved(address),
            Ok(_) => EndpointLabel::Fallback(coordinate_label(point, precision)),
            Err(e) => {
                let error = AppError::from(e);
                warn!(
                    %pick_id,
                    code = error.code(),
                    error = %error,
                    "reverse geocode failed, using coordinates"
                );
                EndpointLabel::Fallback(coordinate_label(point, precision))
            }
        };
        if !session.apply_label(target, pick_id, label) {
            debug!(%pick_id, pick_target = target.as_str(), "stale address dropped");
        }
    }

    // --- delivery ---

    fn submit_delivery(model: &mut Model) {
        let Some(session) = model.new_delivery.as_ref() else {
            warn!("delivery submitted with no flow open");
            return;
        };
        if let Err(errors) = session.form.validate() {
            debug!(count = errors.iter().count(), "delivery form rejected");
            model.delivery_errors = errors;
            return;
        }

        let form = &session.form;
        let route = session.route();
        let summary = DeliverySummary {
            id: uuid::Uuid::new_v4(),
            pickup_address: form.pickup_address.trim().to_string(),
            delivery_address: form.delivery_address.trim().to_string(),
            recipient_name: form.recipient_name.trim().to_string(),
            pickup: route.pickup(),
            delivery: route.delivery(),
            distance_km: route.is_complete().then(|| route.distance_km()),
        };
        info!(id = %summary.id, "delivery created");
        model.deliveries.push(summary);
        model.close_new_delivery();
        model.sheet = SheetState::Closed.open(SheetPanel::Tracking);
    }

    fn open_directions(model: &Model, caps: &Capabilities) {
        let Some(route) = model.new_delivery.as_ref().map(RouteSession::route) else {
            debug!("directions requested with no delivery flow open");
            return;
        };
        let (Some(pickup), Some(delivery)) = (route.pickup(), route.delivery()) else {
            debug!("directions need both endpoints");
            return;
        };
        match directions_url(model.platform, pickup, delivery) {
            Ok(url) => caps
                .launcher
                .open_url(url.as_str(), |r| Event::DirectionsLaunched(Box::new(r))),
            Err(e) => warn!(error = %e, "could not build directions url"),
        }
    }

    fn directions_launched(result: LaunchResult) {
        match result {
            Ok(()) => debug!("maps app opened"),
            Err(e) => {
                let error = AppError::from(e);
                warn!(code = error.code(), error = %error, "could not open maps app");
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        if event.is_gesture_stream() {
            trace!(event = event.name(), "update");
        } else {
            debug!(
                event = event.name(),
                user = event.is_user_initiated(),
                "update"
            );
        }

        match event {
            Event::Noop => return,

            Event::ShellStarted { platform } => {
                info!(?platform, "shell started");
                model.platform = platform;
            }

            Event::Configure(config) => {
                if !Self::apply_config(config, model) {
                    return;
                }
            }

            Event::ConfigureJson(json) => match InteractionConfig::from_json(&json) {
                Ok(config) => {
                    if !Self::apply_config(config, model) {
                        return;
                    }
                }
                Err(e) => {
                    Self::config_rejected(AppError::from(e));
                    return;
                }
            },

            Event::Navigate(screen) => Self::navigate(screen, model),

            Event::AuthFieldChanged { field, value } => {
                if !model.auth.set_field(model.screen, field, value) {
                    debug!(?field, screen = ?model.screen, "field not on this screen");
                    return;
                }
            }

            Event::SignInSubmitted => Self::submit_sign_in(model, caps),
            Event::SignUpSubmitted => Self::submit_sign_up(model, caps),
            Event::ResetRequested => Self::submit_reset_request(model, caps),
            Event::OtpSubmitted => Self::submit_otp(model, caps),
            Event::NewPasswordSubmitted => Self::submit_new_password(model, caps),

            Event::AuthResponse { action, result } => {
                Self::handle_auth_response(action, *result, model);
            }

            Event::SignOut => {
                info!("signed out");
                model.reset_screen_local();
                model.session = None;
                model.auth = AuthFlow::default();
                model.deliveries.clear();
                model.notice = None;
                model.screen = Screen::Welcome;
            }

            Event::HomeOpened => {
                let permission = model.location.permission;
                if permission.needs_request() {
                    if model.location.permission_pending {
                        debug!("location permission request already in flight");
                        return;
                    }
                    model.location.permission_pending = true;
                    caps.location
                        .request_permission(|r| Event::LocationPermissionResolved(Box::new(r)));
                } else if permission == PermissionState::Granted {
                    caps.location
                        .current_position(|r| Event::PositionResolved(Box::new(r)));
                } else {
                    debug!("location denied earlier, staying on default region");
                }
            }

            Event::LocationPermissionResolved(result) => {
                Self::handle_permission(*result, model, caps);
            }

            Event::PositionResolved(result) => Self::handle_position(*result, model),

            Event::RecenterRequested => {
                model.map_region = model
                    .location
                    .fix
                    .map_or(model.config.default_region, MapRegion::around);
            }

            Event::OpenSheet(SheetPanel::NewDelivery) | Event::StartNewDelivery => {
                Self::start_new_delivery(model);
            }

            Event::OpenSheet(panel) => Self::set_sheet(model.sheet.open(panel), model),
            Event::ExpandSheet => model.sheet = model.sheet.expand(),
            Event::CollapseSheet => model.sheet = model.sheet.collapse(),
            Event::CloseSheet | Event::CancelNewDelivery => Self::set_sheet(SheetState::Closed, model),

            Event::SheetDragMoved { dy } => {
                let offset = if !model.sheet.is_closed() && model.drag_policy().is_intentional(dy)
                {
                    dy
                } else {
                    0.0
                };
                if offset == model.sheet_drag_offset {
                    return;
                }
                model.sheet_drag_offset = offset;
            }

            Event::SheetDragReleased(release) => {
                model.sheet_drag_offset = 0.0;
                match model.sheet.release(&model.drag_policy(), release) {
                    DragOutcome::Committed(next) => {
                        debug!(from = ?model.sheet, to = ?next, "sheet drag committed");
                        Self::set_sheet(next, model);
                    }
                    DragOutcome::SnapBack => trace!("sheet snapped back"),
                    DragOutcome::Ignored => trace!("sheet release inside dead zone"),
                }
            }

            Event::ToggleQuickActions => model.quick_actions = model.quick_actions.toggled(),

            Event::QuickActionsDragReleased(release) => {
                match model.quick_actions.release(&model.drag_policy(), release) {
                    DragOutcome::Committed(next) => model.quick_actions = next,
                    DragOutcome::SnapBack | DragOutcome::Ignored => {
                        trace!("quick actions unchanged");
                    }
                }
            }

            Event::ArmPick(target) => Self::arm_pick(target, model),

            Event::CancelPick => {
                if let Some(request) = model.new_delivery.as_mut().and_then(RouteSession::disarm) {
                    debug!(pick_id = %request.id, "pick cancelled");
                }
            }

            Event::MapLongPressed(point) => Self::long_press(point, model, caps),

            Event::AddressResolved {
                target,
                pick_id,
                point,
                result,
            } => Self::address_resolved(target, pick_id, point, *result, model),

            Event::DeliveryFieldChanged { field, value } => {
                let Some(session) = model.new_delivery.as_mut() else {
                    return;
                };
                if !session.form.set_field(field, value) {
                    debug!(?field, "not a delivery form field");
                    return;
                }
            }

            Event::SubmitDelivery => Self::submit_delivery(model),

            Event::OpenDirections => {
                Self::open_directions(model, caps);
                return;
            }

            Event::DirectionsLaunched(result) => {
                Self::directions_launched(*result);
                return;
            }

            Event::DismissNotice => model.notice = None,
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::build(model)
    }
}
