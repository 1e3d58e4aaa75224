//! Client-side form state and validation.
//!
//! Validation never talks to a service. Errors are collected per field so the
//! shell can render them inline; any error blocks submission.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{MIN_PASSWORD_LENGTH, MIN_PHONE_DIGITS};
use crate::geo::GeoPoint;
use crate::route::PickTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Password,
    ConfirmPassword,
    OtpCode,
    PickupAddress,
    DeliveryAddress,
    RecipientName,
    RecipientPhone,
    Notes,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Enter the {len}-digit code")]
    InvalidOtp { len: usize },

    #[error("Enter a valid phone number")]
    InvalidPhone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub error: ValidationError,
}

impl FieldError {
    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: FormField, error: ValidationError) {
        self.0.push(FieldError { field, error });
    }

    fn check(&mut self, field: FormField, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.push(field, error);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field).map(|e| &e.error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required)
    } else {
        Ok(())
    }
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || value.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required);
    }
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

pub fn validate_otp(value: &str, len: usize) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.len() != len || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidOtp { len });
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')');
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if !value.trim().chars().all(allowed) || digits < MIN_PHONE_DIGITS {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

fn matching(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if confirm.is_empty() {
        return Err(ValidationError::Required);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(FormField::Email, validate_email(&self.email));
        errors.check(FormField::Password, required(&self.password));
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(FormField::Name, required(&self.name));
        errors.check(FormField::Email, validate_email(&self.email));
        errors.check(FormField::Password, validate_password(&self.password));
        errors.check(
            FormField::ConfirmPassword,
            matching(&self.password, &self.confirm_password),
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

impl NewPasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(FormField::Password, validate_password(&self.password));
        errors.check(
            FormField::ConfirmPassword,
            matching(&self.password, &self.confirm_password),
        );
        errors.into_result()
    }
}

/// The new-delivery form; also the consumer of map picks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryForm {
    pub pickup_address: String,
    pub delivery_address: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub notes: String,
    pub pickup_point: Option<GeoPoint>,
    pub delivery_point: Option<GeoPoint>,
    pub estimated_distance_km: Option<f64>,
    /// Set when the user typed the address after the last pick.
    #[serde(default)]
    pub pickup_edited: bool,
    #[serde(default)]
    pub delivery_edited: bool,
}

impl DeliveryForm {
    pub fn set_point(&mut self, target: PickTarget, point: GeoPoint) {
        match target {
            PickTarget::Pickup => {
                self.pickup_point = Some(point);
                self.pickup_edited = false;
            }
            PickTarget::Delivery => {
                self.delivery_point = Some(point);
                self.delivery_edited = false;
            }
        }
    }

    #[must_use]
    pub fn address_edited(&self, target: PickTarget) -> bool {
        match target {
            PickTarget::Pickup => self.pickup_edited,
            PickTarget::Delivery => self.delivery_edited,
        }
    }

    pub fn set_address(&mut self, target: PickTarget, address: String) {
        match target {
            PickTarget::Pickup => self.pickup_address = address,
            PickTarget::Delivery => self.delivery_address = address,
        }
    }

    /// Updates a free-text field. Returns false for fields this form lacks.
    pub fn set_field(&mut self, field: FormField, value: String) -> bool {
        let slot = match field {
            FormField::PickupAddress => {
                self.pickup_edited = true;
                &mut self.pickup_address
            }
            FormField::DeliveryAddress => {
                self.delivery_edited = true;
                &mut self.delivery_address
            }
            FormField::RecipientName => &mut self.recipient_name,
            FormField::RecipientPhone => &mut self.recipient_phone,
            FormField::Notes => &mut self.notes,
            _ => return false,
        };
        *slot = value;
        true
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(FormField::PickupAddress, required(&self.pickup_address));
        errors.check(FormField::DeliveryAddress, required(&self.delivery_address));
        errors.check(FormField::RecipientName, required(&self.recipient_name));
        errors.check(FormField::RecipientPhone, validate_phone(&self.recipient_phone));
        errors.into_result()
    }
}
