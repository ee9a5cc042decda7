//! Trend classification.
//!
//! Maps a fitted slope to a trend label and a base approval probability.
//! The stock implementation is a fixed threshold table; alternative risk
//! models plug in through `TrendClassifier`.

use tracing::debug;

use crate::config::ScoringConfig;
use crate::types::TrendLabel;

/// Label and base probability for a fitted slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAssessment {
    pub label: TrendLabel,
    pub base_probability: f64,
}

/// Strategy seam: slope -> {label, base probability}.
pub trait TrendClassifier: Send + Sync {
    fn classify(&self, slope: f64) -> TrendAssessment;

    /// Name for logging and identification.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Threshold table
// ---------------------------------------------------------------------------

/// Rule-based classifier: descending slope bands, first match wins.
///
/// Each band uses a strict `>` comparison, so a slope exactly on a
/// threshold falls into the band below it.
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    /// (exclusive lower bound, label, base probability), highest first
    bands: Vec<(f64, TrendLabel, f64)>,
    floor: TrendAssessment,
}

impl ThresholdClassifier {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            bands: vec![
                (
                    config.strong_up_slope,
                    TrendLabel::StrongUp,
                    config.strong_up_probability,
                ),
                (
                    config.moderate_up_slope,
                    TrendLabel::ModerateUp,
                    config.moderate_up_probability,
                ),
                (
                    config.stable_floor_slope,
                    TrendLabel::Stable,
                    config.stable_probability,
                ),
                (
                    config.moderate_down_slope,
                    TrendLabel::ModerateDown,
                    config.moderate_down_probability,
                ),
            ],
            floor: TrendAssessment {
                label: TrendLabel::StrongDown,
                base_probability: config.strong_down_probability,
            },
        }
    }
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl TrendClassifier for ThresholdClassifier {
    fn classify(&self, slope: f64) -> TrendAssessment {
        let assessment = self
            .bands
            .iter()
            .find(|(bound, _, _)| slope > *bound)
            .map(|&(_, label, base_probability)| TrendAssessment {
                label,
                base_probability,
            })
            .unwrap_or(self.floor);

        debug!(
            slope = format!("{:.2}", slope),
            label = %assessment.label,
            base_probability = assessment.base_probability,
            "Trend classified"
        );

        assessment
    }

    fn name(&self) -> &str {
        "threshold-table"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
