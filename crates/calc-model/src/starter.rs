//! Starting documents for freshly created calculators.

use crate::config::{ConfigModel, LayerOption};
use crate::distance::DistanceParams;
use crate::money::Money;

/// Demo trailer: two views, a tent frame selected by default and a spare
/// wheel mount.
pub fn layered_starter() -> ConfigModel {
    let mut model = ConfigModel::new()
        .with_view("front", "/img/trailer_front_base.png")
        .with_view("rear", "/img/trailer_rear_base.png")
        .with_option(
            LayerOption::new("frame_tent", "Lifting frame with tent", Money::new(40_000))
                .with_default(true)
                .with_order(1)
                .with_layer("front", "/img/trailer_front_tent.png")
                .with_layer("rear", "/img/trailer_rear_tent.png"),
        )
        .with_option(
            LayerOption::new("spare_wheel", "Spare wheel mount", Money::new(4_700))
                .with_order(2)
                .with_layer("front", "/img/trailer_front_spare.png")
                .with_layer("rear", "/img/trailer_rear_spare.png"),
        );
    model.set_base_description("Base package without additional options.");
    model
}

/// Demo city delivery tariff.
pub fn distance_starter() -> DistanceParams {
    DistanceParams {
        base_price: 1500.0,
        ..DistanceParams::default()
    }
}
