//! Ordinary least-squares trend fitting.
//!
//! Fits `y = intercept + slope·x` where `x` is the 0-based month index of
//! each record in chronological order.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::TransactionRecord;

// ---------------------------------------------------------------------------
// Linear fit
// ---------------------------------------------------------------------------

/// Closed-form OLS result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Change in monthly inflow per month
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; 0.0 when y has no variance or n < 2
    pub r_squared: f64,
    pub mean_y: f64,
    pub n: usize,
}

impl LinearFit {
    /// Fit a line to `ys` indexed `0..n`.
    ///
    /// Returns `None` for an empty slice. A single point yields slope 0 and
    /// an intercept equal to that point.
    pub fn fit(ys: &[f64]) -> Option<Self> {
        let n = ys.len();
        if n == 0 {
            return None;
        }

        // Running mean stays finite for any finite input
        let mean_y = ys
            .iter()
            .enumerate()
            .fold(0.0, |mean, (i, y)| mean + (y - mean) / (i + 1) as f64);
        if n == 1 {
            return Some(Self {
                slope: 0.0,
                intercept: mean_y,
                r_squared: 0.0,
                mean_y,
                n,
            });
        }

        let mean_x = (n - 1) as f64 / 2.0;
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        let mut syy = 0.0;
        for (i, y) in ys.iter().enumerate() {
            let dx = i as f64 - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        // sxx > 0 whenever n >= 2
        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let r_squared = if syy > 0.0 {
            (sxy * sxy) / (sxx * syy)
        } else {
            0.0
        };

        Some(Self {
            slope,
            intercept,
            r_squared,
            mean_y,
            n,
        })
    }

    /// True when every fitted quantity is a finite number.
    pub fn is_finite(&self) -> bool {
        self.slope.is_finite() && self.intercept.is_finite() && self.mean_y.is_finite()
    }

    /// Fitted value at month index `x`.
    pub fn predict(&self, x: usize) -> f64 {
        self.intercept + self.slope * x as f64
    }
}

// ---------------------------------------------------------------------------
// Trend line (chart data)
// ---------------------------------------------------------------------------

/// A single observation alongside its fitted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub x: usize,
    pub date: NaiveDate,
    pub inflow: f64,
    pub fitted: f64,
}

/// Observed inflows against the fitted line, ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub points: Vec<TrendPoint>,
}

impl TrendLine {
    /// Build chart data for a chronologically ordered series.
    pub fn from_series(series: &[TransactionRecord]) -> Option<Self> {
        let ys: Vec<f64> = series.iter().map(|r| r.monthly_inflow).collect();
        let fit = LinearFit::fit(&ys)?;
        let points = series
            .iter()
            .enumerate()
            .map(|(x, r)| TrendPoint {
                x,
                date: r.date,
                inflow: r.monthly_inflow,
                fitted: fit.predict(x),
            })
            .collect();

        Some(Self {
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            points,
        })
    }

    /// Legend caption for the fitted line.
    pub fn legend(&self) -> String {
        format!("Trend Line (Slope: {:.2})", self.slope)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
