use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Account service. The shell talks to the real backend, or to a stub in
/// tests and demos.
pub struct Auth<Ev> {
    context: CapabilityContext<AuthOperation, Ev>,
}

impl<Ev> Capability<Ev> for Auth<Ev> {
    type Operation = AuthOperation;
    type MappedSelf<MappedEv> = Auth<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Auth::new(self.context.map_event(f))
    }
}

impl<Ev> Auth<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<AuthOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn sign_up<F>(&self, name: String, email: String, password: String, make_event: F)
    where
        F: FnOnce(AuthResult) -> Ev + Send + 'static,
    {
        self.request(
            AuthOperation::SignUp {
                name,
                email,
                password,
            },
            make_event,
        );
    }

    pub fn sign_in<F>(&self, email: String, password: String, make_event: F)
    where
        F: FnOnce(AuthResult) -> Ev + Send + 'static,
    {
        self.request(AuthOperation::SignIn { email, password }, make_event);
    }

    pub fn request_reset<F>(&self, email: String, make_event: F)
    where
        F: FnOnce(AuthResult) -> Ev + Send + 'static,
    {
        self.request(AuthOperation::RequestReset { email }, make_event);
    }

    pub fn verify_otp<F>(&self, email: String, code: String, purpose: OtpPurpose, make_event: F)
    where
        F: FnOnce(AuthResult) -> Ev + Send + 'static,
    {
        self.request(
            AuthOperation::VerifyOtp {
                email,
                code,
                purpose,
            },
            make_event,
        );
    }

    pub fn reset_password<F>(&self, email: String, code: String, new_password: String, make_event: F)
    where
        F: FnOnce(AuthResult) -> Ev + Send + 'static,
    {
        self.request(
            AuthOperation::ResetPassword {
                email,
                code,
                new_password,
            },
            make_event,
        );
    }

    fn request<F>(&self, operation: AuthOperation, make_event: F)
    where
        F: FnOnce(AuthResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    SignUp,
    PasswordReset,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthOperation {
    SignUp {
        name: String,
        email: String,
        password: String,
    },
    SignIn {
        email: String,
        password: String,
    },
    RequestReset {
        email: String,
    },
    VerifyOtp {
        email: String,
        code: String,
        purpose: OtpPurpose,
    },
    ResetPassword {
        email: String,
        code: String,
        new_password: String,
    },
}

// Passwords and codes never reach logs.
impl fmt::Debug for AuthOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignUp { email, .. } => f.debug_struct("SignUp").field("email", email).finish(),
            Self::SignIn { email, .. } => f.debug_struct("SignIn").field("email", email).finish(),
            Self::RequestReset { email } => {
                f.debug_struct("RequestReset").field("email", email).finish()
            }
            Self::VerifyOtp { email, purpose, .. } => f
                .debug_struct("VerifyOtp")
                .field("email", email)
                .field("purpose", purpose)
                .finish(),
            Self::ResetPassword { email, .. } => {
                f.debug_struct("ResetPassword").field("email", email).finish()
            }
        }
    }
}

impl Operation for AuthOperation {
    type Output = AuthResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthOutput {
    SignedIn(Session),
    /// Account created; the emailed code must be verified before sign-in.
    VerificationRequired,
    ResetCodeSent,
    OtpVerified(Option<Session>),
    PasswordUpdated,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("No account found for this email")]
    UnknownAccount,

    #[error("The code is invalid or has expired")]
    InvalidCode,

    #[error("Could not reach the server. Try again.")]
    Network,

    #[error("{message}")]
    Other { message: String },
}

pub type AuthResult = Result<AuthOutput, AuthError>;
