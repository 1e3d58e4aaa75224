use crux_core::testing::AppTester;
use crux_core::Request;

use courier_shared::capabilities::{AuthError, AuthOperation, AuthOutput, OtpPurpose, Session};
use courier_shared::forms::FormField;
use courier_shared::{App, Effect, Event, Model, Screen};

fn auth_request(effects: Vec<Effect>) -> Option<Request<AuthOperation>> {
    effects.into_iter().find_map(|e| match e {
        Effect::Auth(request) => Some(request),
        _ => None,
    })
}

fn session() -> Session {
    Session {
        user_id: "u-42".into(),
        display_name: "Ana".into(),
        email: "ana@example.com".into(),
    }
}

fn type_into(app: &AppTester<App, Effect>, model: &mut Model, fields: &[(FormField, &str)]) {
    for (field, value) in fields {
        let _ = app.update(
            Event::AuthFieldChanged {
                field: *field,
                value: (*value).to_string(),
            },
            model,
        );
    }
}

fn reply(
    app: &AppTester<App, Effect>,
    model: &mut Model,
    request: &mut Request<AuthOperation>,
    result: Result<AuthOutput, AuthError>,
) {
    let update = app.resolve(request, result).expect("auth request resolves");
    for event in update.events {
        let _ = app.update(event, model);
    }
}

#[test]
fn test_sign_in_flow() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    assert_eq!(model.screen, Screen::Welcome);

    let _ = app.update(Event::Navigate(Screen::SignIn), &mut model);
    assert_eq!(model.screen, Screen::SignIn);

    // invalid input never reaches the shell
    let update = app.update(Event::SignInSubmitted, &mut model);
    assert!(auth_request(update.effects).is_none());
    let view = app.view(&model);
    assert!(view.auth.field_errors.iter().any(|e| e.field == FormField::Email));
    assert!(view.auth.field_errors.iter().any(|e| e.field == FormField::Password));

    type_into(
        &app,
        &mut model,
        &[
            (FormField::Email, " ana@example.com "),
            (FormField::Password, "hunter2hunter2"),
        ],
    );
    let update = app.update(Event::SignInSubmitted, &mut model);
    let mut request = auth_request(update.effects).expect("sign-in requested");
    assert_eq!(
        request.operation,
        AuthOperation::SignIn {
            email: "ana@example.com".into(),
            password: "hunter2hunter2".into(),
        }
    );
    assert!(app.view(&model).auth.busy);

    // a second tap while waiting is swallowed
    let update = app.update(Event::SignInSubmitted, &mut model);
    assert!(auth_request(update.effects).is_none());

    reply(&app, &mut model, &mut request, Ok(AuthOutput::SignedIn(session())));
    assert_eq!(model.screen, Screen::Home);
    assert_eq!(model.session, Some(session()));
    let view = app.view(&model);
    assert_eq!(view.user_name.as_deref(), Some("Ana"));
    assert!(!view.auth.busy);
}

#[test]
fn test_sign_in_rejected_shows_error() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let _ = app.update(Event::Navigate(Screen::SignIn), &mut model);
    type_into(
        &app,
        &mut model,
        &[
            (FormField::Email, "ana@example.com"),
            (FormField::Password, "wrong-password"),
        ],
    );

    let update = app.update(Event::SignInSubmitted, &mut model);
    let mut request = auth_request(update.effects).expect("sign-in requested");
    reply(&app, &mut model, &mut request, Err(AuthError::InvalidCredentials));

    assert_eq!(model.screen, Screen::SignIn);
    assert!(model.session.is_none());
    let view = app.view(&model);
    assert_eq!(view.auth.error.as_deref(), Some("Incorrect email or password"));
    assert!(!view.auth.busy);
}

#[test]
fn test_home_requires_session() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let _ = app.update(Event::Navigate(Screen::Home), &mut model);
    assert_eq!(model.screen, Screen::Welcome);
}

#[test]
fn test_sign_up_with_verification() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let _ = app.update(Event::Navigate(Screen::SignUp), &mut model);
    type_into(
        &app,
        &mut model,
        &[
            (FormField::Name, "Ana"),
            (FormField::Email, "ana@example.com"),
            (FormField::Password, "longenough"),
            (FormField::ConfirmPassword, "different1"),
        ],
    );

    let update = app.update(Event::SignUpSubmitted, &mut model);
    assert!(auth_request(update.effects).is_none());
    assert!(model.auth.field_errors.get(FormField::ConfirmPassword).is_some());

    type_into(&app, &mut model, &[(FormField::ConfirmPassword, "longenough")]);
    let update = app.update(Event::SignUpSubmitted, &mut model);
    let mut request = auth_request(update.effects).expect("sign-up requested");
    reply(&app, &mut model, &mut request, Ok(AuthOutput::VerificationRequired));

    assert_eq!(model.screen, Screen::VerifyOtp);
    let view = app.view(&model);
    assert_eq!(view.auth.otp_email.as_deref(), Some("ana@example.com"));
    assert_eq!(view.auth.otp_purpose, Some(OtpPurpose::SignUp));
    assert_eq!(view.auth.otp_length, 6);

    type_into(&app, &mut model, &[(FormField::OtpCode, "12a4")]);
    let update = app.update(Event::OtpSubmitted, &mut model);
    assert!(auth_request(update.effects).is_none());
    assert!(model.auth.field_errors.get(FormField::OtpCode).is_some());

    type_into(&app, &mut model, &[(FormField::OtpCode, "123456")]);
    let update = app.update(Event::OtpSubmitted, &mut model);
    let mut request = auth_request(update.effects).expect("verification requested");
    assert_eq!(
        request.operation,
        AuthOperation::VerifyOtp {
            email: "ana@example.com".into(),
            code: "123456".into(),
            purpose: OtpPurpose::SignUp,
        }
    );
    reply(
        &app,
        &mut model,
        &mut request,
        Ok(AuthOutput::OtpVerified(Some(session()))),
    );
    assert_eq!(model.screen, Screen::Home);
    assert!(model.session.is_some());
}

#[test]
fn test_password_reset_flow() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let _ = app.update(Event::Navigate(Screen::ForgotPassword), &mut model);
    type_into(&app, &mut model, &[(FormField::Email, "ana@example.com")]);

    let update = app.update(Event::ResetRequested, &mut model);
    let mut request = auth_request(update.effects).expect("reset requested");
    reply(&app, &mut model, &mut request, Ok(AuthOutput::ResetCodeSent));
    assert_eq!(model.screen, Screen::VerifyOtp);
    assert_eq!(model.auth.otp_purpose, Some(OtpPurpose::PasswordReset));

    // a wrong code keeps the user on the code screen
    type_into(&app, &mut model, &[(FormField::OtpCode, "000000")]);
    let update = app.update(Event::OtpSubmitted, &mut model);
    let mut request = auth_request(update.effects).expect("verification requested");
    reply(&app, &mut model, &mut request, Err(AuthError::InvalidCode));
    assert_eq!(model.screen, Screen::VerifyOtp);
    assert_eq!(
        app.view(&model).auth.error.as_deref(),
        Some("The code is invalid or has expired")
    );

    type_into(&app, &mut model, &[(FormField::OtpCode, "654321")]);
    let update = app.update(Event::OtpSubmitted, &mut model);
    let mut request = auth_request(update.effects).expect("verification requested");
    reply(&app, &mut model, &mut request, Ok(AuthOutput::OtpVerified(None)));
    assert_eq!(model.screen, Screen::ResetPassword);

    type_into(
        &app,
        &mut model,
        &[
            (FormField::Password, "brand-new-pass"),
            (FormField::ConfirmPassword, "brand-new-pass"),
        ],
    );
    let update = app.update(Event::NewPasswordSubmitted, &mut model);
    let mut request = auth_request(update.effects).expect("password update requested");
    assert_eq!(
        request.operation,
        AuthOperation::ResetPassword {
            email: "ana@example.com".into(),
            code: "654321".into(),
            new_password: "brand-new-pass".into(),
        }
    );
    reply(&app, &mut model, &mut request, Ok(AuthOutput::PasswordUpdated));

    assert_eq!(model.screen, Screen::SignIn);
    assert_eq!(model.auth.sign_in.email, "ana@example.com");
    assert!(model.auth.otp_email.is_none());
    assert!(model.session.is_none());
}

#[test]
fn test_otp_without_pending_verification_is_rejected() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let _ = app.update(Event::Navigate(Screen::VerifyOtp), &mut model);
    type_into(&app, &mut model, &[(FormField::OtpCode, "123456")]);

    let update = app.update(Event::OtpSubmitted, &mut model);
    assert!(auth_request(update.effects).is_none());
    assert!(model.auth.error.is_some());
}

#[test]
fn test_sign_out_resets_home_state() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model {
        session: Some(session()),
        screen: Screen::Home,
        ..Model::default()
    };
    let _ = app.update(Event::StartNewDelivery, &mut model);
    let _ = app.update(Event::ToggleQuickActions, &mut model);
    assert!(model.new_delivery.is_some());

    let _ = app.update(Event::SignOut, &mut model);
    assert_eq!(model.screen, Screen::Welcome);
    assert!(model.session.is_none());
    assert!(model.new_delivery.is_none());
    assert!(model.sheet.is_closed());
    assert!(!model.quick_actions.is_open());
}
