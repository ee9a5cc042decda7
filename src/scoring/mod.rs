//! Scoring engine: trend fit, trend classification, and affordability.

pub mod affordability;
pub mod regression;
pub mod trend;

use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::types::{validate_amount, EligibilityError, EligibilityResult, TransactionRecord};
use affordability::AffordabilityCheck;
use regression::LinearFit;
use trend::{ThresholdClassifier, TrendClassifier};

const LIKELY_ELIGIBLE: &str = "Likely eligible.";
const UNLIKELY_ELIGIBLE: &str = "Unlikely to be eligible.";

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Pipelines regression → trend classification → affordability → decision.
///
/// Holds only immutable configuration, so a single instance can be shared
/// across threads and requests.
pub struct EligibilityScorer {
    classifier: Box<dyn TrendClassifier>,
    affordability: AffordabilityCheck,
    approval_threshold: f64,
}

impl EligibilityScorer {
    pub fn new(
        classifier: Box<dyn TrendClassifier>,
        affordability: AffordabilityCheck,
        approval_threshold: f64,
    ) -> Self {
        Self {
            classifier,
            affordability,
            approval_threshold,
        }
    }

    /// Build the stock threshold-table scorer from configuration.
    pub fn from_config(config: &ScoringConfig, currency: &str) -> Self {
        Self::new(
            Box::new(ThresholdClassifier::new(config)),
            AffordabilityCheck::new(config, currency),
            config.approval_threshold,
        )
    }

    /// Name of the active trend classifier.
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Score one loan request against a customer's chronological series.
    ///
    /// An empty series yields a `NOT_FOUND` result. Errors only on a
    /// non-positive amount, a malformed series, or inflows so large that
    /// the fit or the ceiling is not finite.
    pub fn assess_eligibility(
        &self,
        customer_id: &str,
        requested_amount: f64,
        series: &[TransactionRecord],
    ) -> Result<EligibilityResult, EligibilityError> {
        validate_amount(requested_amount)?;

        if series.is_empty() {
            info!(customer_id, "Customer not found");
            return Ok(EligibilityResult::not_found());
        }
        validate_series(customer_id, series)?;

        // Step 1 – trend fit over month indices 0..n
        let inflows: Vec<f64> = series.iter().map(|r| r.monthly_inflow).collect();
        let fit = LinearFit::fit(&inflows).ok_or_else(|| {
            EligibilityError::InvalidInput("series has no observations".to_string())
        })?;
        if !fit.is_finite() {
            return Err(EligibilityError::InvalidInput(format!(
                "trend fit is not finite (slope {}, mean {})",
                fit.slope, fit.mean_y
            )));
        }

        // Step 2 – slope → label + base probability
        let trend = self.classifier.classify(fit.slope);

        // Step 3 – affordability ceiling and over-limit penalty
        let afford = self
            .affordability
            .evaluate(fit.mean_y, requested_amount, trend.base_probability);
        if !afford.max_recommended_loan.is_finite() {
            return Err(EligibilityError::InvalidInput(format!(
                "affordability ceiling overflows for average inflow {}",
                fit.mean_y
            )));
        }

        // Step 4 – decision
        let probability = afford.adjusted_probability;
        let eligible = probability >= self.approval_threshold;
        let mut message = afford.note;
        message.push_str(if eligible { LIKELY_ELIGIBLE } else { UNLIKELY_ELIGIBLE });

        info!(
            customer_id,
            months = series.len(),
            slope = format!("{:.2}", fit.slope),
            trend = %trend.label,
            probability = format!("{:.1}%", probability * 100.0),
            within_limit = afford.within_limit,
            eligible,
            "Eligibility assessed"
        );

        Ok(EligibilityResult {
            eligible,
            trend_label: trend.label,
            probability_of_approval: probability,
            average_monthly_inflow: Some(afford.average_monthly_inflow),
            max_recommended_loan: Some(afford.max_recommended_loan),
            message,
            slope: Some(fit.slope),
        })
    }
}

impl Default for EligibilityScorer {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default(), "NGN")
    }
}

// ---------------------------------------------------------------------------
// Series validation
// ---------------------------------------------------------------------------

/// Reject records that break the series contract: foreign customer ids,
/// negative or non-finite amounts, and dates that are not strictly
/// increasing.
pub fn validate_series(
    customer_id: &str,
    series: &[TransactionRecord],
) -> Result<(), EligibilityError> {
    for (i, record) in series.iter().enumerate() {
        if record.customer_id != customer_id {
            return Err(EligibilityError::InvalidInput(format!(
                "record {i} belongs to '{}', expected '{customer_id}'",
                record.customer_id
            )));
        }
        if !record.monthly_inflow.is_finite() || record.monthly_inflow < 0.0 {
            return Err(EligibilityError::InvalidInput(format!(
                "record {i} has invalid monthly inflow {}",
                record.monthly_inflow
            )));
        }
        if !record.balance.is_finite() || record.balance < 0.0 {
            return Err(EligibilityError::InvalidInput(format!(
                "record {i} has invalid balance {}",
                record.balance
            )));
        }
    }

    if let Some(pair) = series.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(EligibilityError::InvalidInput(format!(
            "dates must be strictly increasing ({} followed by {})",
            pair[0].date, pair[1].date
        )));
    }

    debug!(customer_id, records = series.len(), "Series validated");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
