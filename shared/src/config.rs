//! Tunable interaction thresholds and defaults.
//!
//! The shell may send an `InteractionConfig` at startup (usually parsed from a
//! bundled JSON file). Any field it leaves out keeps its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{GeoPoint, MapRegion};

pub const DEFAULT_DEAD_ZONE_PX: f64 = 10.0;
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 50.0;
/// px per millisecond, signed like `dy` (positive is downward).
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_HALF_OPEN_FRACTION: f64 = 0.5;
pub const DEFAULT_FULL_OPEN_FRACTION: f64 = 0.9;
pub const DEFAULT_SHEET_TRANSITION_MS: u32 = 300;
pub const DEFAULT_LABEL_PRECISION: usize = 6;
pub const DEFAULT_OTP_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_PHONE_DIGITS: usize = 7;

pub const DEFAULT_REGION_CENTER: GeoPoint = GeoPoint::new(37.7749, -122.4194);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(String),

    #[error("{field} must be a positive finite number")]
    NotPositive { field: &'static str },

    #[error("sheet fractions must satisfy 0 < half < full <= 1")]
    SheetFractions,

    #[error("dead zone must be smaller than the drag threshold")]
    DeadZoneTooLarge,

    #[error("default region center is outside valid coordinates")]
    InvalidRegion,

    #[error("label precision must be at most 10")]
    LabelPrecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub dead_zone_px: f64,
    pub drag_threshold_px: f64,
    pub velocity_threshold: f64,
    pub half_open_fraction: f64,
    pub full_open_fraction: f64,
    pub sheet_transition_ms: u32,
    pub label_precision: usize,
    pub default_region: MapRegion,
    pub otp_length: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            dead_zone_px: DEFAULT_DEAD_ZONE_PX,
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            half_open_fraction: DEFAULT_HALF_OPEN_FRACTION,
            full_open_fraction: DEFAULT_FULL_OPEN_FRACTION,
            sheet_transition_ms: DEFAULT_SHEET_TRANSITION_MS,
            label_precision: DEFAULT_LABEL_PRECISION,
            default_region: MapRegion::around(DEFAULT_REGION_CENTER),
            otp_length: DEFAULT_OTP_LENGTH,
        }
    }
}

impl InteractionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        let positive = [
            ("dead_zone_px", self.dead_zone_px),
            ("drag_threshold_px", self.drag_threshold_px),
            ("velocity_threshold", self.velocity_threshold),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field });
            }
        }
        if self.dead_zone_px >= self.drag_threshold_px {
            return Err(ConfigError::DeadZoneTooLarge);
        }
        if !(self.half_open_fraction > 0.0
            && self.half_open_fraction < self.full_open_fraction
            && self.full_open_fraction <= 1.0)
        {
            return Err(ConfigError::SheetFractions);
        }
        if !self.default_region.center.is_valid() {
            return Err(ConfigError::InvalidRegion);
        }
        if self.label_precision > 10 {
            return Err(ConfigError::LabelPrecision);
        }
        if self.otp_length == 0 {
            return Err(ConfigError::NotPositive {
                field: "otp_length",
            });
        }
        Ok(self)
    }
}
