//! Annuity mortgage calculator.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageInput {
    pub amount: f64,
    /// Annual interest rate in percent.
    pub rate: f64,
    pub years: u32,
}

/// Payment plan, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageQuote {
    pub monthly: f64,
    pub total: f64,
    pub overpayment: f64,
}

/// Fixed monthly annuity payment. A zero rate splits the amount evenly.
pub fn mortgage(input: MortgageInput) -> Result<MortgageQuote> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(EngineError::InvalidMortgage("amount must be positive"));
    }
    if input.years == 0 {
        return Err(EngineError::InvalidMortgage("term must be at least one year"));
    }
    if !input.rate.is_finite() || input.rate < 0.0 {
        return Err(EngineError::InvalidMortgage("rate must not be negative"));
    }

    let months = f64::from(input.years) * 12.0;
    let monthly_rate = input.rate / 100.0 / 12.0;
    let payment = if monthly_rate == 0.0 {
        input.amount / months
    } else {
        let growth = (1.0 + monthly_rate).powf(months);
        input.amount * monthly_rate * growth / (growth - 1.0)
    };
    let total = payment * months;

    Ok(MortgageQuote {
        monthly: round_cents(payment),
        total: round_cents(total),
        overpayment: round_cents(total - input.amount),
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
