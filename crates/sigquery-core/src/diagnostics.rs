use core::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Informational event raised while building a query vector.
///
/// None of these stop the build; the vector is always returned alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No gene passed the p-value threshold, so it was relaxed and the retry found genes.
    PvalueThresholdRelaxed {
        /// Threshold from the configuration
        requested: f64,
        /// Threshold used for the retry
        applied: f64,
    },
    /// No gene passed the fold threshold, so it was relaxed and the retry found genes.
    FoldThresholdRelaxed {
        /// Threshold from the configuration
        requested: f64,
        /// Threshold used for the retry
        applied: f64,
    },
    /// Selection ended empty.
    NoDifferentiallyExpressedGenes,
    /// The vector sums to zero: no selected key exists in the reference space.
    NoReferenceMatches,
}

impl Diagnostic {
    /// Logs the event and appends it to `sink`.
    pub fn record(self, sink: &mut Vec<Self>) {
        tracing::info!("{self}");
        sink.push(self);
    }
}

impl Display for Diagnostic {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::PvalueThresholdRelaxed { requested, applied } => write!(
                formatter,
                "no genes passed pvalue_threshold {requested}; relaxed to {applied}"
            ),
            Self::FoldThresholdRelaxed { requested, applied } => write!(
                formatter,
                "no genes passed fold_threshold {requested}; relaxed to {applied}"
            ),
            Self::NoDifferentiallyExpressedGenes => {
                formatter.write_str("no differentially expressed genes")
            }
            Self::NoReferenceMatches => formatter.write_str("no genes matched in reference profiles"),
        }
    }
}
