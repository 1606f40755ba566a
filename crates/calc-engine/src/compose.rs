//! Composition of the preview image stack.
//!
//! The [`Resolver`] answers three questions for a model and a selection:
//! which views may be shown, which view is active, and which images are
//! painted for it, bottom to top.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use calc_model::{ConfigModel, SelectionState};

use crate::options::{PreviewOptions, SeedPolicy};

/// Where a painted image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum LayerSource {
    Base,
    Option(String),
}

/// One image in the paint stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    pub source: LayerSource,
    pub image: String,
}

/// Paint stack for the active view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum Composition {
    /// The product has no visible view, so there is nothing to paint.
    Empty,
    /// A view is active. `layers` may still be empty when neither the base
    /// nor any active option has an image for it.
    View { view: String, layers: Vec<Layer> },
}

impl Composition {
    pub fn is_empty_product(&self) -> bool {
        matches!(self, Composition::Empty)
    }

    pub fn view(&self) -> Option<&str> {
        match self {
            Composition::Empty => None,
            Composition::View { view, .. } => Some(view),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        match self {
            Composition::Empty => &[],
            Composition::View { layers, .. } => layers,
        }
    }

    /// Image references in paint order.
    pub fn images(&self) -> Vec<&str> {
        self.layers()
            .iter()
            .map(|layer| layer.image.as_str())
            .collect()
    }
}

/// Resolves views, selections and paint stacks under a set of options.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: PreviewOptions,
}

impl Resolver {
    pub fn new(options: PreviewOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PreviewOptions {
        &self.options
    }

    /// View keys in insertion order, without the hidden view when the
    /// product's rear-view flag is off.
    pub fn visible_view_keys<'a>(&self, model: &'a ConfigModel) -> Vec<&'a str> {
        model
            .views()
            .keys()
            .map(String::as_str)
            .filter(|key| model.show_rear_view() || *key != self.options.hidden_view_key)
            .collect()
    }

    /// Keeps the selected view while it is visible, otherwise falls back to
    /// the preferred view, then the first visible one.
    pub fn resolve_active_view(
        &self,
        model: &ConfigModel,
        state: &SelectionState,
    ) -> Option<String> {
        let visible = self.visible_view_keys(model);
        if let Some(current) = state.active_view()
            && visible.contains(&current)
        {
            return Some(current.to_string());
        }
        visible
            .iter()
            .find(|key| **key == self.options.preferred_view_key)
            .or_else(|| visible.first())
            .map(|key| (*key).to_string())
    }

    /// Drops ids that no longer name an option and applies defaults
    /// according to the seed policy.
    ///
    /// Repeated calls without intervening toggles return the same set.
    pub fn resolve_active_options<'s>(
        &self,
        model: &ConfigModel,
        state: &'s mut SelectionState,
    ) -> &'s BTreeSet<String> {
        state.retain_options(|id| model.contains_option(id));
        let reseed = match self.options.seed_policy {
            SeedPolicy::Once => !state.is_seeded(),
            SeedPolicy::WhenEmpty => true,
        };
        if reseed && state.active_options().is_empty() {
            let defaults: Vec<&str> = model.default_option_ids().collect();
            debug!(count = defaults.len(), "seeding default options");
            state.seed(defaults);
        } else {
            state.mark_seeded();
        }
        state.active_options()
    }

    /// Brings `state` in line with `model`: resolved active view and
    /// seeded, pruned option set.
    pub fn refresh(&self, model: &ConfigModel, state: &mut SelectionState) {
        let view = self.resolve_active_view(model, state);
        state.set_active_view(view);
        self.resolve_active_options(model, state);
    }

    /// Paint stack for the active view: the base image, then each active
    /// option's layer in ascending `order`.
    ///
    /// Uses the selection as given; call [`Resolver::refresh`] first so that
    /// defaults are applied.
    pub fn composite(&self, model: &ConfigModel, state: &SelectionState) -> Composition {
        let Some(view) = self.resolve_active_view(model, state) else {
            return Composition::Empty;
        };
        let mut layers = Vec::new();
        if let Some(image) = model.view_image(&view) {
            layers.push(Layer {
                source: LayerSource::Base,
                image: image.to_string(),
            });
        }
        for option in model.options_in_order() {
            if option.id.is_empty() || !state.is_active(&option.id) {
                continue;
            }
            if let Some(image) = option.layer(&view) {
                layers.push(Layer {
                    source: LayerSource::Option(option.id.clone()),
                    image: image.to_string(),
                });
            }
        }
        Composition::View { view, layers }
    }
}

/// [`Resolver::visible_view_keys`] with default options.
pub fn visible_view_keys(model: &ConfigModel) -> Vec<&str> {
    Resolver::default().visible_view_keys(model)
}

/// [`Resolver::resolve_active_view`] with default options.
pub fn resolve_active_view(model: &ConfigModel, state: &SelectionState) -> Option<String> {
    Resolver::default().resolve_active_view(model, state)
}

/// [`Resolver::resolve_active_options`] with default options.
pub fn resolve_active_options<'s>(
    model: &ConfigModel,
    state: &'s mut SelectionState,
) -> &'s BTreeSet<String> {
    Resolver::default().resolve_active_options(model, state)
}

/// [`Resolver::composite`] with default options.
pub fn composite(model: &ConfigModel, state: &SelectionState) -> Composition {
    Resolver::default().composite(model, state)
}
