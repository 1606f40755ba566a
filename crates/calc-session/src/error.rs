//! Session error types.

use thiserror::Error;

use calc_engine::EngineError;
use calc_model::ModelError;

/// Rejected edit or collaborator completion.
///
/// A rejected event leaves the session exactly as it was.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{field} must be a finite, non-negative amount, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, SessionError>;
