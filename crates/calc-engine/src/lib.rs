//! Derived values for calculator previews.
//!
//! Everything here is a function of a product document and, for the
//! configurator, the current [`SelectionState`](calc_model::SelectionState):
//!
//! - [`compose`]: visible views, active view resolution, default seeding and
//!   the paint stack.
//! - [`pricing`]: configurator price breakdown.
//! - [`distance`]: distance tariff quotes and the routing service contract.
//! - [`mortgage`]: annuity payment plan.

pub mod compose;
pub mod distance;
pub mod error;
pub mod mortgage;
pub mod options;
pub mod pricing;

pub use compose::{
    Composition, Layer, LayerSource, Resolver, composite, resolve_active_options,
    resolve_active_view, visible_view_keys,
};
pub use distance::{
    DistanceQuote, QuoteCheck, QuoteMismatch, RoutePoint, RouteRequest, RouteResponse,
    TariffSummary, cross_check, quote, quote_for, tariff_summary,
};
pub use error::{EngineError, Result};
pub use mortgage::{MortgageInput, MortgageQuote, mortgage};
pub use options::{PreviewOptions, SeedPolicy};
pub use pricing::{PriceBreakdown, PriceLine, price_breakdown};
