//! Layered configurator product definition.
//!
//! A [`ConfigModel`] is the document handed to and received from the
//! configuration store: base price and description, the camera views of the
//! base product, and the priced add-on options with their per-view layers.
//!
//! The JSON shape uses the store's field names (`baseViews`, `showRear`,
//! `default`); every field is optional on load and falls back to the values
//! of [`ConfigModel::default`].

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::de::{null_default, null_true};
use crate::error::{KeyKind, ModelError, Result};
use crate::money::Money;
use crate::selection::SelectionState;

/// View key that the visibility flag hides.
pub const REAR_VIEW: &str = "rear";

/// View key preferred when the active view has to be chosen.
pub const FRONT_VIEW: &str = "front";

/// Label given to options created by [`ConfigModel::add_option`].
pub const NEW_OPTION_LABEL: &str = "New option";

/// A priced add-on that paints one image per view on top of the base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOption {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    pub price: Money,
    /// Whether a new preview session starts with this option switched on.
    #[serde(rename = "default", deserialize_with = "null_default")]
    pub default_selected: bool,
    /// Paint and listing order. Not unique; ties keep list position.
    #[serde(deserialize_with = "null_default")]
    pub order: i64,
    /// View key to image reference. Sparse: a view may have no layer.
    #[serde(deserialize_with = "null_default")]
    pub layers: IndexMap<String, String>,
}

impl Default for LayerOption {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            price: Money::ZERO,
            default_selected: false,
            order: 0,
            layers: IndexMap::new(),
        }
    }
}

impl LayerOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            price,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default_selected: bool) -> Self {
        self.default_selected = default_selected;
        self
    }

    #[must_use]
    pub fn with_layer(mut self, view: impl Into<String>, image: impl Into<String>) -> Self {
        self.layers.insert(view.into(), image.into());
        self
    }

    /// Image painted for `view`, if one is set.
    pub fn layer(&self, view: &str) -> Option<&str> {
        self.layers
            .get(view)
            .map(String::as_str)
            .filter(|image| !image.is_empty())
    }
}

/// Configurator product: views, options and base pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigModel {
    #[serde(rename = "baseViews", deserialize_with = "null_default")]
    views: IndexMap<String, String>,
    #[serde(deserialize_with = "null_default")]
    options: Vec<LayerOption>,
    base_price: Money,
    #[serde(deserialize_with = "null_default")]
    base_description: String,
    #[serde(rename = "showRear", deserialize_with = "null_true")]
    show_rear_view: bool,
}

impl Default for ConfigModel {
    fn default() -> Self {
        Self {
            views: IndexMap::new(),
            options: Vec::new(),
            base_price: Money::ZERO,
            base_description: String::new(),
            show_rear_view: true,
        }
    }
}

impl ConfigModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a stored configuration, filling absent or `null` fields with
    /// defaults.
    ///
    /// Fails with [`ModelError::DuplicateKey`] when two options share a
    /// non-empty id.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.check_option_ids()?;
        Ok(model)
    }

    /// Rejects option ids used more than once. Blank ids are exempt; they
    /// never take part in selection or pricing.
    pub fn check_option_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for option in &self.options {
            if !option.id.is_empty() && !seen.insert(option.id.as_str()) {
                return Err(ModelError::DuplicateKey {
                    kind: KeyKind::Option,
                    key: option.id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn set_base_price(&mut self, price: Money) {
        self.base_price = price;
    }

    pub fn base_description(&self) -> &str {
        &self.base_description
    }

    pub fn set_base_description(&mut self, description: impl Into<String>) {
        self.base_description = description.into();
    }

    pub fn show_rear_view(&self) -> bool {
        self.show_rear_view
    }

    /// Hides or shows the rear view. The rear image itself is untouched.
    pub fn set_show_rear_view(&mut self, show: bool) {
        self.show_rear_view = show;
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// All views in insertion order, including hidden ones.
    pub fn views(&self) -> &IndexMap<String, String> {
        &self.views
    }

    pub fn has_view(&self, key: &str) -> bool {
        self.views.contains_key(key)
    }

    /// Base image for `key`, if the view exists and its image is set.
    pub fn view_image(&self, key: &str) -> Option<&str> {
        self.views
            .get(key)
            .map(String::as_str)
            .filter(|image| !image.is_empty())
    }

    /// Adds a view with no image.
    ///
    /// Views cannot be removed; clear the image instead.
    pub fn add_view(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ModelError::InvalidKey {
                kind: KeyKind::View,
                key,
            });
        }
        if self.views.contains_key(&key) {
            return Err(ModelError::DuplicateKey {
                kind: KeyKind::View,
                key,
            });
        }
        self.views.insert(key, String::new());
        Ok(())
    }

    pub fn set_view_image(&mut self, key: &str, image: impl Into<String>) -> Result<()> {
        let slot = self
            .views
            .get_mut(key)
            .ok_or_else(|| ModelError::UnknownView(key.to_string()))?;
        *slot = image.into();
        Ok(())
    }

    pub fn clear_view_image(&mut self, key: &str) -> Result<()> {
        self.set_view_image(key, String::new())
    }

    #[must_use]
    pub fn with_view(mut self, key: impl Into<String>, image: impl Into<String>) -> Self {
        self.views.insert(key.into(), image.into());
        self
    }

    // ------------------------------------------------------------------
    // Options
    // ------------------------------------------------------------------

    /// Options in list order.
    pub fn options(&self) -> &[LayerOption] {
        &self.options
    }

    /// Options sorted by `order`; equal orders keep their list position.
    pub fn options_in_order(&self) -> Vec<&LayerOption> {
        let mut ordered: Vec<&LayerOption> = self.options.iter().collect();
        ordered.sort_by_key(|option| option.order);
        ordered
    }

    pub fn option(&self, id: &str) -> Option<&LayerOption> {
        if id.is_empty() {
            return None;
        }
        self.options.iter().find(|option| option.id == id)
    }

    pub fn contains_option(&self, id: &str) -> bool {
        self.option(id).is_some()
    }

    /// Ids of options flagged as selected by default.
    pub fn default_option_ids(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|option| option.default_selected && !option.id.is_empty())
            .map(|option| option.id.as_str())
    }

    /// Appends an option, rejecting an id already used by another option.
    pub fn push_option(&mut self, option: LayerOption) -> Result<()> {
        if self.contains_option(&option.id) {
            return Err(ModelError::DuplicateKey {
                kind: KeyKind::Option,
                key: option.id,
            });
        }
        self.options.push(option);
        Ok(())
    }

    #[must_use]
    pub fn with_option(mut self, option: LayerOption) -> Self {
        self.options.push(option);
        self
    }

    /// Appends a blank option after the current highest `order`.
    ///
    /// The id is `option_<n>`, starting from the new order and counting up
    /// until it does not collide with an existing option. At most
    /// `options.len()` candidates can collide, so the search is bounded.
    pub fn add_option(&mut self) -> &LayerOption {
        let order = self
            .options
            .iter()
            .map(|option| option.order)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        let start = i128::from(order);
        let mut step: i128 = 0;
        let id = loop {
            let candidate = format!("option_{}", start + step);
            if !self.contains_option(&candidate) {
                break candidate;
            }
            step += 1;
        };
        self.options
            .push(LayerOption::new(id, NEW_OPTION_LABEL, Money::ZERO).with_order(order));
        let index = self.options.len() - 1;
        &self.options[index]
    }

    /// Removes an option and drops it from the active selection.
    ///
    /// An empty `id` removes the first option whose id is still blank.
    pub fn remove_option(
        &mut self,
        id: &str,
        selection: &mut SelectionState,
    ) -> Result<LayerOption> {
        let index = self
            .options
            .iter()
            .position(|option| option.id == id)
            .ok_or_else(|| ModelError::UnknownOption(id.to_string()))?;
        selection.deactivate(id);
        Ok(self.options.remove(index))
    }

    /// Changes an option id, keeping its active state in `selection`.
    ///
    /// `to` may be empty while the operator is still typing; a non-empty `to`
    /// must not belong to another option. A blank id can never be active, so
    /// renaming an active option to `""` switches it off in `selection` and
    /// giving it a real id again leaves it off.
    pub fn rename_option(
        &mut self,
        from: &str,
        to: impl Into<String>,
        selection: &mut SelectionState,
    ) -> Result<()> {
        let to = to.into();
        let index = self
            .options
            .iter()
            .position(|option| option.id == from)
            .ok_or_else(|| ModelError::UnknownOption(from.to_string()))?;
        if from == to {
            return Ok(());
        }
        if self.contains_option(&to) {
            return Err(ModelError::DuplicateKey {
                kind: KeyKind::Option,
                key: to,
            });
        }
        selection.rename(from, &to);
        self.options[index].id = to;
        Ok(())
    }

    pub fn set_option_label(&mut self, id: &str, label: impl Into<String>) -> Result<()> {
        self.option_mut(id)?.label = label.into();
        Ok(())
    }

    pub fn set_option_price(&mut self, id: &str, price: Money) -> Result<()> {
        self.option_mut(id)?.price = price;
        Ok(())
    }

    pub fn set_option_order(&mut self, id: &str, order: i64) -> Result<()> {
        self.option_mut(id)?.order = order;
        Ok(())
    }

    /// Sets the default flag and mirrors it into the running preview.
    pub fn set_option_default(
        &mut self,
        id: &str,
        default_selected: bool,
        selection: &mut SelectionState,
    ) -> Result<()> {
        self.option_mut(id)?.default_selected = default_selected;
        if default_selected {
            selection.activate(id);
        } else {
            selection.deactivate(id);
        }
        Ok(())
    }

    /// Sets the layer image of an option for a view.
    ///
    /// The view only has to exist; hidden views can still carry layers.
    pub fn set_option_layer(
        &mut self,
        id: &str,
        view: &str,
        image: impl Into<String>,
    ) -> Result<()> {
        if !self.views.contains_key(view) {
            // Report the option first when both are missing.
            self.option_mut(id)?;
            return Err(ModelError::UnknownView(view.to_string()));
        }
        self.option_mut(id)?
            .layers
            .insert(view.to_string(), image.into());
        Ok(())
    }

    pub fn clear_option_layer(&mut self, id: &str, view: &str) -> Result<()> {
        if !self.views.contains_key(view) {
            self.option_mut(id)?;
            return Err(ModelError::UnknownView(view.to_string()));
        }
        self.option_mut(id)?.layers.shift_remove(view);
        Ok(())
    }

    fn option_mut(&mut self, id: &str) -> Result<&mut LayerOption> {
        if id.is_empty() {
            return Err(ModelError::UnknownOption(String::new()));
        }
        self.options
            .iter_mut()
            .find(|option| option.id == id)
            .ok_or_else(|| ModelError::UnknownOption(id.to_string()))
    }
}
