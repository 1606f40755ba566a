//! Configurator price breakdown.

use serde::Serialize;

use calc_model::{ConfigModel, Money, SelectionState};

/// One active option as it appears on the price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceLine {
    pub id: String,
    pub label: String,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base: Money,
    pub options_total: Money,
    pub total: Money,
    /// Active options in display order.
    pub lines: Vec<PriceLine>,
}

/// Base price plus every active option. Nothing is ever subtracted and
/// options with a blank id never count.
pub fn price_breakdown(model: &ConfigModel, state: &SelectionState) -> PriceBreakdown {
    let lines: Vec<PriceLine> = model
        .options_in_order()
        .into_iter()
        .filter(|option| !option.id.is_empty() && state.is_active(&option.id))
        .map(|option| PriceLine {
            id: option.id.clone(),
            label: option.label.clone(),
            price: option.price,
        })
        .collect();
    let options_total: Money = lines.iter().map(|line| line.price).sum();
    let base = model.base_price();
    PriceBreakdown {
        base,
        options_total,
        total: base + options_total,
        lines,
    }
}
