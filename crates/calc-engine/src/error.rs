use thiserror::Error;

use calc_model::ModelError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("distance must be a finite, non-negative number of kilometres, got {0}")]
    InvalidDistance(f64),
    #[error("route {0} address is required")]
    MissingRouteEndpoint(&'static str),
    #[error("invalid mortgage input: {0}")]
    InvalidMortgage(&'static str),
}

pub type Result<T> = std::result::Result<T, EngineError>;
