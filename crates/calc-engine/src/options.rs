//! Preview behaviour options.

use serde::{Deserialize, Serialize};

use calc_model::{FRONT_VIEW, REAR_VIEW};

/// When default-selected options are switched on in a preview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// Apply defaults once per session. An emptied selection stays empty.
    #[default]
    Once,
    /// Re-apply defaults whenever the selection becomes empty.
    ///
    /// Reproduces the legacy editor preview, where switching every option
    /// off immediately brings the defaults back.
    WhenEmpty,
}

/// Options controlling how previews are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    pub seed_policy: SeedPolicy,
    /// View key hidden when the product's rear-view flag is off.
    pub hidden_view_key: String,
    /// View picked first when the active view must be re-resolved.
    pub preferred_view_key: String,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            seed_policy: SeedPolicy::Once,
            hidden_view_key: REAR_VIEW.to_string(),
            preferred_view_key: FRONT_VIEW.to_string(),
        }
    }
}

impl PreviewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.seed_policy = policy;
        self
    }
}
