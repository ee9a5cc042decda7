//! Affordability check.
//!
//! Caps the recommended loan at a multiple of average monthly inflow and
//! penalises the approval probability when the request exceeds it.

use tracing::debug;

use crate::config::ScoringConfig;
use crate::types::format_money;

/// Outcome of comparing a request against the affordability ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Affordability {
    pub average_monthly_inflow: f64,
    pub max_recommended_loan: f64,
    pub within_limit: bool,
    /// Probability after any over-limit penalty
    pub adjusted_probability: f64,
    /// Message prefix; empty when the request is within the ceiling
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct AffordabilityCheck {
    loan_multiple: f64,
    over_limit_penalty: f64,
    currency: String,
}

impl AffordabilityCheck {
    pub fn new(config: &ScoringConfig, currency: impl Into<String>) -> Self {
        Self {
            loan_multiple: config.loan_multiple,
            over_limit_penalty: config.over_limit_penalty,
            currency: currency.into(),
        }
    }

    /// Ceiling for a given average monthly inflow.
    pub fn ceiling(&self, average_monthly_inflow: f64) -> f64 {
        average_monthly_inflow * self.loan_multiple
    }

    /// Compare `requested_amount` against the ceiling derived from
    /// `average_monthly_inflow` and adjust `base_probability`.
    pub fn evaluate(
        &self,
        average_monthly_inflow: f64,
        requested_amount: f64,
        base_probability: f64,
    ) -> Affordability {
        let max_recommended_loan = self.ceiling(average_monthly_inflow);
        let within_limit = requested_amount <= max_recommended_loan;

        let (adjusted_probability, note) = if within_limit {
            (base_probability, String::new())
        } else {
            debug!(
                requested = requested_amount,
                ceiling = max_recommended_loan,
                penalty = self.over_limit_penalty,
                "Request exceeds affordability ceiling"
            );
            (
                base_probability * self.over_limit_penalty,
                format!(
                    "Requested loan {} exceeds max recommended ({}). ",
                    format_money(&self.currency, requested_amount),
                    format_money(&self.currency, max_recommended_loan),
                ),
            )
        };

        Affordability {
            average_monthly_inflow,
            max_recommended_loan,
            within_limit,
            adjusted_probability,
            note,
        }
    }
}

impl Default for AffordabilityCheck {
    fn default() -> Self {
        Self::new(&ScoringConfig::default(), "NGN")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
