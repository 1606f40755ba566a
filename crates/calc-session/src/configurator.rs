//! Editing session for a layered configurator.
//!
//! The session owns the product document and the preview selection. Every
//! entry point that changes either one recomputes the [`Preview`] before it
//! returns, so the editor and the preview never observe different states.

use tracing::{debug, info, warn};

use calc_engine::{Composition, PriceBreakdown, PreviewOptions, Resolver, price_breakdown};
use calc_model::{ConfigModel, ModelError, SelectionState};

use crate::context::SessionContext;
use crate::dirty::DirtyTracker;
use crate::error::Result;
use crate::event::ConfigEvent;
use crate::requests::{Completion, RequestKind, RequestTicket, RequestTracker};

/// Everything the preview surface paints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub description: String,
    pub visible_views: Vec<String>,
    pub active_view: Option<String>,
    pub composition: Composition,
    pub price: PriceBreakdown,
}

impl Preview {
    fn compute(resolver: &Resolver, model: &ConfigModel, selection: &SelectionState) -> Self {
        let composition = resolver.composite(model, selection);
        Self {
            description: model.base_description().to_string(),
            visible_views: resolver
                .visible_view_keys(model)
                .into_iter()
                .map(str::to_string)
                .collect(),
            active_view: composition.view().map(str::to_string),
            composition,
            price: price_breakdown(model, selection),
        }
    }
}

#[derive(Debug)]
pub struct ConfiguratorSession {
    context: SessionContext,
    model: ConfigModel,
    selection: SelectionState,
    resolver: Resolver,
    preview: Preview,
    dirty: DirtyTracker,
    requests: RequestTracker,
}

impl ConfiguratorSession {
    pub fn new(context: SessionContext, model: ConfigModel, options: PreviewOptions) -> Self {
        let resolver = Resolver::new(options);
        let mut selection = SelectionState::new();
        resolver.refresh(&model, &mut selection);
        let preview = Preview::compute(&resolver, &model, &selection);
        Self {
            context,
            model,
            selection,
            resolver,
            preview,
            dirty: DirtyTracker::new(),
            requests: RequestTracker::new(),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn model(&self) -> &ConfigModel {
        &self.model
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.dirty.is_saving()
    }

    /// Applies one event and returns the refreshed preview.
    ///
    /// On error nothing changes: model, selection and preview stay as they
    /// were before the call.
    pub fn apply(&mut self, event: ConfigEvent) -> Result<&Preview> {
        let name = event.name();
        let selection_only = event.is_selection_only();
        if let Err(error) = self.mutate(event) {
            warn!(calculator = self.context.label(), event = name, %error, "edit rejected");
            return Err(error);
        }
        if !selection_only {
            self.dirty.mark_dirty();
        }
        debug!(calculator = self.context.label(), event = name, "edit applied");
        self.recompute();
        Ok(&self.preview)
    }

    fn mutate(&mut self, event: ConfigEvent) -> Result<()> {
        let model = &mut self.model;
        let selection = &mut self.selection;
        match event {
            ConfigEvent::ViewAdded { key } => model.add_view(key)?,
            ConfigEvent::ViewImageChanged { key, image } => model.set_view_image(&key, image)?,
            ConfigEvent::ViewImageCleared { key } => model.clear_view_image(&key)?,
            ConfigEvent::RearViewToggled { show } => model.set_show_rear_view(show),
            ConfigEvent::BasePriceChanged { price } => model.set_base_price(price),
            ConfigEvent::BaseDescriptionChanged { description } => {
                model.set_base_description(description);
            }
            ConfigEvent::OptionAdded => {
                let added = model.add_option();
                debug!(id = %added.id, order = added.order, "option added");
            }
            ConfigEvent::OptionRemoved { id } => {
                model.remove_option(&id, selection)?;
            }
            ConfigEvent::OptionRenamed { from, to } => model.rename_option(&from, to, selection)?,
            ConfigEvent::OptionLabelChanged { id, label } => model.set_option_label(&id, label)?,
            ConfigEvent::OptionPriceChanged { id, price } => model.set_option_price(&id, price)?,
            ConfigEvent::OptionOrderChanged { id, order } => model.set_option_order(&id, order)?,
            ConfigEvent::OptionDefaultChanged {
                id,
                default_selected,
            } => model.set_option_default(&id, default_selected, selection)?,
            ConfigEvent::OptionLayerChanged { id, view, image } => {
                model.set_option_layer(&id, &view, image)?;
            }
            ConfigEvent::OptionLayerCleared { id, view } => model.clear_option_layer(&id, &view)?,
            ConfigEvent::ViewSelected { key } => {
                if !self
                    .resolver
                    .visible_view_keys(model)
                    .contains(&key.as_str())
                {
                    return Err(ModelError::UnknownView(key).into());
                }
                selection.set_active_view(Some(key));
            }
            ConfigEvent::OptionToggled { id } => {
                if !model.contains_option(&id) {
                    return Err(ModelError::UnknownOption(id).into());
                }
                selection.toggle(&id);
            }
        }
        Ok(())
    }

    fn recompute(&mut self) {
        self.resolver.refresh(&self.model, &mut self.selection);
        self.preview = Preview::compute(&self.resolver, &self.model, &self.selection);
    }

    /// Replaces the whole document and starts a fresh preview selection.
    pub fn replace_model(&mut self, model: ConfigModel) {
        self.model = model;
        self.selection = SelectionState::new();
        self.recompute();
    }

    /// Document to hand to the configuration store. Derived values are
    /// never part of it.
    pub fn save_payload(&self) -> Result<String> {
        Ok(self.model.to_json_pretty()?)
    }

    // ------------------------------------------------------------------
    // Collaborator round trips
    // ------------------------------------------------------------------

    pub fn begin_load(&mut self) -> RequestTicket {
        self.requests.begin(RequestKind::Load)
    }

    /// Applies a loaded document unless a newer load was issued meanwhile.
    pub fn complete_load(&mut self, ticket: RequestTicket, json: &str) -> Result<Completion> {
        if !self.requests.finish(ticket) {
            warn!(calculator = self.context.label(), seq = ticket.seq(), "discarding stale load");
            return Ok(Completion::Discarded);
        }
        let model = ConfigModel::from_json(json)?;
        info!(
            calculator = self.context.label(),
            views = model.views().len(),
            options = model.options().len(),
            "configuration loaded"
        );
        self.replace_model(model);
        self.dirty.mark_clean();
        Ok(Completion::Applied)
    }

    /// Issues a save and returns the payload to send with it.
    pub fn begin_save(&mut self) -> Result<(RequestTicket, String)> {
        let payload = self.save_payload()?;
        let ticket = self.requests.begin(RequestKind::Save);
        self.dirty.start_save();
        Ok((ticket, payload))
    }

    pub fn complete_save(&mut self, ticket: RequestTicket) -> Completion {
        if !self.requests.finish(ticket) {
            warn!(calculator = self.context.label(), seq = ticket.seq(), "discarding stale save");
            return Completion::Discarded;
        }
        self.dirty.save_complete();
        info!(calculator = self.context.label(), "configuration saved");
        Completion::Applied
    }

    pub fn fail_save(&mut self, ticket: RequestTicket) -> Completion {
        if !self.requests.finish(ticket) {
            return Completion::Discarded;
        }
        self.dirty.save_failed();
        warn!(calculator = self.context.label(), "configuration save failed");
        Completion::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_model::{Money, layered_starter};

    fn session() -> ConfiguratorSession {
        ConfiguratorSession::new(
            SessionContext::new("calc_1"),
            layered_starter(),
            PreviewOptions::default(),
        )
    }

    #[test]
    fn starts_with_defaults_applied() {
        let session = session();
        let preview = session.preview();
        assert_eq!(preview.active_view.as_deref(), Some("front"));
        assert_eq!(preview.price.total, Money::new(40_000));
        assert_eq!(
            preview.composition.images(),
            vec!["/img/trailer_front_base.png", "/img/trailer_front_tent.png"]
        );
        assert!(!session.is_dirty());
    }

    #[test]
    fn selection_events_do_not_dirty_the_document() {
        let mut session = session();
        session
            .apply(ConfigEvent::OptionToggled {
                id: "spare_wheel".into(),
            })
            .unwrap();
        assert!(!session.is_dirty());
        assert_eq!(session.preview().price.total, Money::new(44_700));
    }

    #[test]
    fn rejected_event_changes_nothing() {
        let mut session = session();
        let before = session.preview().clone();
        let err = session
            .apply(ConfigEvent::OptionLayerChanged {
                id: "frame_tent".into(),
                view: "side".into(),
                image: "/img/x.png".into(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            crate::SessionError::Model(ModelError::UnknownView(_))
        ));
        assert_eq!(session.preview(), &before);
        assert!(!session.is_dirty());
    }

    #[test]
    fn selecting_a_hidden_view_is_rejected() {
        let mut session = session();
        session
            .apply(ConfigEvent::RearViewToggled { show: false })
            .unwrap();
        assert!(
            session
                .apply(ConfigEvent::ViewSelected { key: "rear".into() })
                .is_err()
        );
    }
}
