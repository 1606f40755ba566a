//! Distance (delivery) calculator tariff.

use std::fmt;
use std::str::FromStr;

use std::result::Result as StdResult;

use serde::{Deserialize, Deserializer, Serialize};

use crate::de::null_default;
use crate::error::{ModelError, Result};

/// Transport size tier. The set is closed: unknown classes are rejected,
/// never mapped to a neutral coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    /// Light van up to 1.5 t.
    Small,
    /// Truck up to 3.5 t.
    Medium,
    /// Truck of 5 t and above.
    Large,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [
        VehicleClass::Small,
        VehicleClass::Medium,
        VehicleClass::Large,
    ];

    /// Key used in stored tariffs and route requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Small => "small",
            VehicleClass::Medium => "medium",
            VehicleClass::Large => "large",
        }
    }

    /// Human-readable tier description for previews.
    pub fn label(&self) -> &'static str {
        match self {
            VehicleClass::Small => "Light van up to 1.5 t",
            VehicleClass::Medium => "Truck up to 3.5 t",
            VehicleClass::Large => "Truck 5 t and above",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleClass {
    type Err = ModelError;

    /// Parses a class key, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim();
        VehicleClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| ModelError::UnknownVehicleClass(s.to_string()))
    }
}

/// Per-class multipliers applied to the per-kilometre rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleCoefficients {
    #[serde(deserialize_with = "null_small")]
    pub small: f64,
    #[serde(deserialize_with = "null_medium")]
    pub medium: f64,
    #[serde(deserialize_with = "null_large")]
    pub large: f64,
}

impl Default for VehicleCoefficients {
    fn default() -> Self {
        Self {
            small: 1.0,
            medium: 1.2,
            large: 1.5,
        }
    }
}

impl VehicleCoefficients {
    pub fn get(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Small => self.small,
            VehicleClass::Medium => self.medium,
            VehicleClass::Large => self.large,
        }
    }

    pub fn set(&mut self, class: VehicleClass, value: f64) {
        match class {
            VehicleClass::Small => self.small = value,
            VehicleClass::Medium => self.medium = value,
            VehicleClass::Large => self.large = value,
        }
    }
}

/// Tariff of a distance calculator.
///
/// Absent or `null` fields load as: base 0, 45 per km, no loading or
/// unloading fee, coefficients 1.0 / 1.2 / 1.5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistanceParams {
    #[serde(deserialize_with = "null_default")]
    pub base_price: f64,
    #[serde(deserialize_with = "null_price_per_km")]
    pub price_per_km: f64,
    #[serde(deserialize_with = "null_default")]
    pub loading_price: f64,
    #[serde(deserialize_with = "null_default")]
    pub unloading_price: f64,
    #[serde(rename = "vehicleCoefs", deserialize_with = "null_default")]
    pub vehicle_coefficients: VehicleCoefficients,
}

const DEFAULT_PRICE_PER_KM: f64 = 45.0;

fn null_or<'de, D: Deserializer<'de>>(deserializer: D, fallback: f64) -> StdResult<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(fallback))
}

fn null_price_per_km<'de, D: Deserializer<'de>>(deserializer: D) -> StdResult<f64, D::Error> {
    null_or(deserializer, DEFAULT_PRICE_PER_KM)
}

fn null_small<'de, D: Deserializer<'de>>(deserializer: D) -> StdResult<f64, D::Error> {
    null_or(deserializer, VehicleCoefficients::default().small)
}

fn null_medium<'de, D: Deserializer<'de>>(deserializer: D) -> StdResult<f64, D::Error> {
    null_or(deserializer, VehicleCoefficients::default().medium)
}

fn null_large<'de, D: Deserializer<'de>>(deserializer: D) -> StdResult<f64, D::Error> {
    null_or(deserializer, VehicleCoefficients::default().large)
}

impl Default for DistanceParams {
    fn default() -> Self {
        Self {
            base_price: 0.0,
            price_per_km: DEFAULT_PRICE_PER_KM,
            loading_price: 0.0,
            unloading_price: 0.0,
            vehicle_coefficients: VehicleCoefficients::default(),
        }
    }
}

impl DistanceParams {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loading plus unloading; charged once per job.
    pub fn load_sum(&self) -> f64 {
        self.loading_price + self.unloading_price
    }

    /// Multiplier for `class`. Stored values must be finite and positive.
    pub fn coefficient(&self, class: VehicleClass) -> Result<f64> {
        let value = self.vehicle_coefficients.get(class);
        if !value.is_finite() || value <= 0.0 {
            return Err(ModelError::NonPositiveCoefficient { class, value });
        }
        Ok(value)
    }

    /// Same as [`DistanceParams::coefficient`] for a raw class key.
    pub fn coefficient_for(&self, class: &str) -> Result<f64> {
        self.coefficient(class.parse()?)
    }
}
