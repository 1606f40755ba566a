//! Edit events understood by the sessions.

use calc_model::{Money, VehicleClass};

/// Edit or preview interaction on a configurator product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    ViewAdded { key: String },
    ViewImageChanged { key: String, image: String },
    ViewImageCleared { key: String },
    RearViewToggled { show: bool },
    BasePriceChanged { price: Money },
    BaseDescriptionChanged { description: String },
    OptionAdded,
    OptionRemoved { id: String },
    OptionRenamed { from: String, to: String },
    OptionLabelChanged { id: String, label: String },
    OptionPriceChanged { id: String, price: Money },
    OptionOrderChanged { id: String, order: i64 },
    OptionDefaultChanged { id: String, default_selected: bool },
    OptionLayerChanged { id: String, view: String, image: String },
    OptionLayerCleared { id: String, view: String },
    /// Customer switched the preview camera.
    ViewSelected { key: String },
    /// Customer switched an option on or off in the preview.
    OptionToggled { id: String },
}

impl ConfigEvent {
    /// Stable event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigEvent::ViewAdded { .. } => "view_added",
            ConfigEvent::ViewImageChanged { .. } => "view_image_changed",
            ConfigEvent::ViewImageCleared { .. } => "view_image_cleared",
            ConfigEvent::RearViewToggled { .. } => "rear_view_toggled",
            ConfigEvent::BasePriceChanged { .. } => "base_price_changed",
            ConfigEvent::BaseDescriptionChanged { .. } => "base_description_changed",
            ConfigEvent::OptionAdded => "option_added",
            ConfigEvent::OptionRemoved { .. } => "option_removed",
            ConfigEvent::OptionRenamed { .. } => "option_renamed",
            ConfigEvent::OptionLabelChanged { .. } => "option_label_changed",
            ConfigEvent::OptionPriceChanged { .. } => "option_price_changed",
            ConfigEvent::OptionOrderChanged { .. } => "option_order_changed",
            ConfigEvent::OptionDefaultChanged { .. } => "option_default_changed",
            ConfigEvent::OptionLayerChanged { .. } => "option_layer_changed",
            ConfigEvent::OptionLayerCleared { .. } => "option_layer_cleared",
            ConfigEvent::ViewSelected { .. } => "view_selected",
            ConfigEvent::OptionToggled { .. } => "option_toggled",
        }
    }

    /// True for preview interactions that leave the product untouched.
    pub fn is_selection_only(&self) -> bool {
        matches!(
            self,
            ConfigEvent::ViewSelected { .. } | ConfigEvent::OptionToggled { .. }
        )
    }
}

/// Edit of a distance tariff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceEvent {
    BasePriceChanged(f64),
    PricePerKmChanged(f64),
    LoadingPriceChanged(f64),
    UnloadingPriceChanged(f64),
    CoefficientChanged { vehicle: VehicleClass, value: f64 },
}

impl DistanceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DistanceEvent::BasePriceChanged(_) => "base_price_changed",
            DistanceEvent::PricePerKmChanged(_) => "price_per_km_changed",
            DistanceEvent::LoadingPriceChanged(_) => "loading_price_changed",
            DistanceEvent::UnloadingPriceChanged(_) => "unloading_price_changed",
            DistanceEvent::CoefficientChanged { .. } => "coefficient_changed",
        }
    }
}
