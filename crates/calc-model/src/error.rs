use std::fmt;

use thiserror::Error;

use crate::distance::VehicleClass;

/// Which keyed collection a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    View,
    Option,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::View => f.write_str("view"),
            KeyKind::Option => f.write_str("option"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{kind} `{key}` already exists")]
    DuplicateKey { kind: KeyKind, key: String },
    #[error("invalid {kind} key {key:?}")]
    InvalidKey { kind: KeyKind, key: String },
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("unknown view `{0}`")]
    UnknownView(String),
    #[error("unknown vehicle class `{0}` (expected small, medium or large)")]
    UnknownVehicleClass(String),
    #[error("coefficient for vehicle class {class} must be a positive number, got {value}")]
    NonPositiveCoefficient { class: VehicleClass, value: f64 },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
