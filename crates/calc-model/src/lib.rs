//! Data model for calculator products.
//!
//! Two product documents live here: the layered [`ConfigModel`] (views and
//! stackable priced options) and the distance tariff [`DistanceParams`].
//! Both are plain values exchanged with the configuration store. The
//! transient [`SelectionState`] of a preview session sits alongside them so
//! that model edits with selection side effects can say so in their
//! signatures.

pub mod config;
mod de;
pub mod distance;
pub mod error;
pub mod money;
pub mod selection;
pub mod starter;

pub use config::{ConfigModel, FRONT_VIEW, LayerOption, NEW_OPTION_LABEL, REAR_VIEW};
pub use distance::{DistanceParams, VehicleClass, VehicleCoefficients};
pub use error::{KeyKind, ModelError, Result};
pub use money::Money;
pub use selection::SelectionState;
pub use starter::{distance_starter, layered_starter};
