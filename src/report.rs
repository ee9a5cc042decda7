//! Human-readable formatting for assessment output.
//!
//! Amounts are rendered with thousands separators and two decimals
//! (`NGN 6,450.00`); probabilities as whole percentages (`75%`).

use std::fmt::Write as _;

use crate::service::Assessment;
use crate::types::format_money;

/// Format a probability in [0, 1] as a rounded percentage.
pub fn format_percent(probability: f64) -> String {
    format!("{:.0}%", probability * 100.0)
}

/// Multi-line text summary of an assessment, as shown to a loan officer.
pub fn render_text(assessment: &Assessment, currency: &str) -> String {
    let request = &assessment.request;
    let result = &assessment.result;
    let mut out = String::new();

    let _ = writeln!(out, "Customer:                 {}", request.customer_id);
    let _ = writeln!(
        out,
        "Loan Amount:              {}",
        format_money(currency, request.requested_amount)
    );

    if !result.is_found() {
        let _ = writeln!(out, "Result:                   {}", result.message);
        return out;
    }

    let slope = result.slope.unwrap_or_default();
    let _ = writeln!(
        out,
        "Trend:                    {} (Slope: {slope:.2})",
        result.trend_label.display_name()
    );
    if let Some(avg) = result.average_monthly_inflow {
        let _ = writeln!(out, "Average Monthly Inflow:   {}", format_money(currency, avg));
    }
    if let Some(max) = result.max_recommended_loan {
        let _ = writeln!(out, "Max Recommended Loan:     {}", format_money(currency, max));
    }
    let _ = writeln!(
        out,
        "Probability of Approval:  {}",
        format_percent(result.probability_of_approval)
    );
    if let Some(line) = &assessment.trend_line {
        let _ = writeln!(
            out,
            "Fit:                      R² = {:.3} over {} months",
            line.r_squared,
            line.points.len()
        );
    }
    let _ = writeln!(out, "Verdict:                  {}", result.message);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
