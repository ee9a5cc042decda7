//! Eligibility service.
//!
//! Ties a `TransactionStore` to an `EligibilityScorer`: normalises the
//! request, fetches the customer's series, scores it and attaches the
//! fitted trend line for charting.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::scoring::regression::TrendLine;
use crate::scoring::{validate_series, EligibilityScorer};
use crate::store::TransactionStore;
use crate::types::{normalize_customer_id, EligibilityError, EligibilityResult, LoanRequest};

/// Verdict for one request plus chart data.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    /// The request as scored (customer id normalised)
    pub request: LoanRequest,
    pub result: EligibilityResult,
    /// Observed inflows against the fitted line; `None` when not found
    pub trend_line: Option<TrendLine>,
}

pub struct EligibilityService {
    store: Arc<dyn TransactionStore>,
    scorer: EligibilityScorer,
}

impl EligibilityService {
    pub fn new(store: Arc<dyn TransactionStore>, scorer: EligibilityScorer) -> Self {
        Self { store, scorer }
    }

    /// Validate, fetch and score a single loan request.
    pub async fn assess(&self, request: &LoanRequest) -> Result<Assessment, EligibilityError> {
        request.validate()?;
        let request = request.normalized();

        let series = self.store.series_for_customer(&request.customer_id).await?;
        debug!(
            store = self.store.name(),
            customer_id = %request.customer_id,
            records = series.len(),
            "Series loaded for assessment"
        );

        let result = self.scorer.assess_eligibility(
            &request.customer_id,
            request.requested_amount,
            &series,
        )?;
        let trend_line = TrendLine::from_series(&series);

        info!(
            customer_id = %request.customer_id,
            requested = request.requested_amount,
            result = %result,
            "Assessment complete"
        );

        Ok(Assessment {
            request,
            result,
            trend_line,
        })
    }

    /// Chart data for a customer without scoring a request.
    ///
    /// Applies the same series checks as `assess`.
    pub async fn trend_line(
        &self,
        customer_id: &str,
    ) -> Result<Option<TrendLine>, EligibilityError> {
        let customer_id = normalize_customer_id(customer_id);
        let series = self.store.series_for_customer(&customer_id).await?;
        validate_series(&customer_id, &series)?;

        match TrendLine::from_series(&series) {
            Some(line) if !(line.slope.is_finite() && line.intercept.is_finite()) => {
                Err(EligibilityError::InvalidInput(format!(
                    "trend line for '{customer_id}' is not finite"
                )))
            }
            line => Ok(line),
        }
    }

    /// All customers known to the store.
    pub async fn customers(&self) -> Result<Vec<String>, EligibilityError> {
        self.store.customers().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
