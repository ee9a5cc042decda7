//! Shared types for CASHTREND.
//!
//! These types form the data model used across all modules.
//! They are kept free of scoring logic so that the store, scoring,
//! service and API layers can depend on them without cycles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// One month of cash-flow activity for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub customer_id: String,
    pub date: NaiveDate,
    /// Total incoming funds for the month (>= 0)
    pub monthly_inflow: f64,
    /// Account balance at the end of the month (>= 0)
    pub balance: f64,
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} inflow={:.2} balance={:.2}",
            self.customer_id, self.date, self.monthly_inflow, self.balance,
        )
    }
}

/// Normalise a customer identifier for lookup (trimmed, lowercased).
pub fn normalize_customer_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Loan request
// ---------------------------------------------------------------------------

/// A customer's request for a loan of a given size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub customer_id: String,
    pub requested_amount: f64,
}

impl LoanRequest {
    pub fn new(customer_id: impl Into<String>, requested_amount: f64) -> Self {
        Self {
            customer_id: customer_id.into(),
            requested_amount,
        }
    }

    /// Copy of this request with the customer id normalised.
    pub fn normalized(&self) -> Self {
        Self {
            customer_id: normalize_customer_id(&self.customer_id),
            requested_amount: self.requested_amount,
        }
    }

    /// Reject empty ids and non-positive or non-finite amounts.
    pub fn validate(&self) -> Result<(), EligibilityError> {
        if self.customer_id.trim().is_empty() {
            return Err(EligibilityError::InvalidInput(
                "customer id must not be empty".to_string(),
            ));
        }
        validate_amount(self.requested_amount)
    }
}

/// A requested amount must be a finite, strictly positive number.
pub fn validate_amount(amount: f64) -> Result<(), EligibilityError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EligibilityError::InvalidInput(format!(
            "requested amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Trend label
// ---------------------------------------------------------------------------

/// Direction and strength of a customer's inflow trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendLabel {
    StrongUp,
    ModerateUp,
    Stable,
    ModerateDown,
    StrongDown,
    NotFound,
}

impl TrendLabel {
    /// Labels produced by trend classification (everything but `NotFound`).
    pub const CLASSIFIED: &'static [TrendLabel] = &[
        TrendLabel::StrongUp,
        TrendLabel::ModerateUp,
        TrendLabel::Stable,
        TrendLabel::ModerateDown,
        TrendLabel::StrongDown,
    ];

    /// Human-readable name used in reports and chart legends.
    pub fn display_name(&self) -> &'static str {
        match self {
            TrendLabel::StrongUp => "Strong Uptrend",
            TrendLabel::ModerateUp => "Moderate Uptrend",
            TrendLabel::Stable => "Stable",
            TrendLabel::ModerateDown => "Moderate Downtrend",
            TrendLabel::StrongDown => "Strong Downtrend",
            TrendLabel::NotFound => "N/A",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::StrongUp => write!(f, "STRONG_UP"),
            TrendLabel::ModerateUp => write!(f, "MODERATE_UP"),
            TrendLabel::Stable => write!(f, "STABLE"),
            TrendLabel::ModerateDown => write!(f, "MODERATE_DOWN"),
            TrendLabel::StrongDown => write!(f, "STRONG_DOWN"),
            TrendLabel::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

// ---------------------------------------------------------------------------
// Eligibility result
// ---------------------------------------------------------------------------

/// Structured verdict for a single loan request.
///
/// `average_monthly_inflow`, `max_recommended_loan` and `slope` are present
/// only when the customer had at least one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub trend_label: TrendLabel,
    /// Heuristic approval score in [0, 1]
    pub probability_of_approval: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub average_monthly_inflow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_recommended_loan: Option<f64>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub slope: Option<f64>,
}

impl EligibilityResult {
    /// Message returned when the store has no records for a customer.
    pub const NOT_FOUND_MESSAGE: &'static str = "Customer not found";

    /// Negative result for a customer with no records.
    pub fn not_found() -> Self {
        Self {
            eligible: false,
            trend_label: TrendLabel::NotFound,
            probability_of_approval: 0.0,
            average_monthly_inflow: None,
            max_recommended_loan: None,
            message: Self::NOT_FOUND_MESSAGE.to_string(),
            slope: None,
        }
    }

    /// Whether the customer was found in the store.
    pub fn is_found(&self) -> bool {
        self.trend_label != TrendLabel::NotFound
    }
}

impl fmt::Display for EligibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | P={:.1}% | eligible={}",
            self.trend_label,
            self.probability_of_approval * 100.0,
            self.eligible,
        )?;
        if let Some(slope) = self.slope {
            write!(f, " | slope={slope:.2}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Money formatting
// ---------------------------------------------------------------------------

/// Format an amount with a currency prefix and thousands separators,
/// e.g. `NGN 6,450.00`.
pub fn format_money(currency: &str, amount: f64) -> String {
    format!("{currency} {}", group_thousands(amount))
}

/// `1234567.891` -> `1,234,567.89`
fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for CASHTREND.
///
/// An unknown customer is not an error: it yields a `NOT_FOUND` result.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction store error ({store}): {message}")]
    Store { store: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
