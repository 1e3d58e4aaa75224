use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{AuthError, GeocodeError, LaunchError, LocationError};
use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Logged, nothing shown.
    Silent,
    /// Shown to the user; the flow carries on.
    Notice,
    /// Shown next to the offending input; blocks only that submission.
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    LocationPermissionDenied,
    Location,
    Geocode,
    Launch,
    Validation,
    Authentication,
    Config,
    InvalidState,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::LocationPermissionDenied => "LOCATION_PERMISSION_DENIED",
            Self::Location => "LOCATION_ERROR",
            Self::Geocode => "GEOCODE_ERROR",
            Self::Launch => "LAUNCH_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTH_ERROR",
            Self::Config => "CONFIG_ERROR",
            Self::InvalidState => "INVALID_STATE",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Geocode | Self::Launch | Self::Location | Self::Config | Self::InvalidState => {
                ErrorSeverity::Silent
            }
            Self::LocationPermissionDenied => ErrorSeverity::Notice,
            Self::Validation | Self::Authentication => ErrorSeverity::Inline,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        self.severity != ErrorSeverity::Silent
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::LocationPermissionDenied => {
                "Location access is off. Showing the default area instead.".into()
            }
            ErrorKind::Authentication | ErrorKind::Validation => self.message.clone(),
            _ => "Something went wrong.".into(),
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        Self::new(ErrorKind::Geocode, e.to_string())
    }
}

impl From<LaunchError> for AppError {
    fn from(e: LaunchError) -> Self {
        Self::new(ErrorKind::Launch, e.to_string())
    }
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        let kind = match e {
            LocationError::PermissionDenied => ErrorKind::LocationPermissionDenied,
            _ => ErrorKind::Location,
        };
        Self::new(kind, e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        Self::new(ErrorKind::Authentication, e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::new(ErrorKind::Config, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_taxonomy() {
        assert_eq!(
            ErrorKind::LocationPermissionDenied.default_severity(),
            ErrorSeverity::Notice
        );
        assert_eq!(ErrorKind::Geocode.default_severity(), ErrorSeverity::Silent);
        assert_eq!(ErrorKind::Launch.default_severity(), ErrorSeverity::Silent);
        assert_eq!(ErrorKind::Validation.default_severity(), ErrorSeverity::Inline);
    }

    #[test]
    fn test_permission_denied_maps_to_notice() {
        let err = AppError::from(LocationError::PermissionDenied);
        assert_eq!(err.kind, ErrorKind::LocationPermissionDenied);
        assert!(err.is_user_visible());
        assert_eq!(err.code(), "LOCATION_PERMISSION_DENIED");
    }

    #[test]
    fn test_launch_failure_is_silent() {
        let err = AppError::from(LaunchError::NoHandler);
        assert!(!err.is_user_visible());
    }

    #[test]
    fn test_auth_error_message_passes_through() {
        let err = AppError::from(AuthError::InvalidCredentials);
        assert_eq!(err.user_facing_message(), "Incorrect email or password");
    }

    #[test]
    fn test_geocode_and_config_errors_stay_silent() {
        let err = AppError::from(GeocodeError::RateLimited);
        assert_eq!(err.code(), "GEOCODE_ERROR");
        assert!(!err.is_user_visible());

        let err = AppError::from(ConfigError::SheetFractions);
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert_eq!(err.user_facing_message(), "Something went wrong.");
    }
}
