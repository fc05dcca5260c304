//! Thresholds and effect direction used when selecting differentially expressed genes.

use serde::{Deserialize, Serialize};

use crate::types::DesiredEffect;
use crate::{Error, Result};

/// Default absolute fold-change threshold.
pub const DEFAULT_FOLD_THRESHOLD: f64 = 0.0;
/// Default p-value threshold.
pub const DEFAULT_PVALUE_THRESHOLD: f64 = 0.05;
/// Fold threshold forced when only the p-value filter found genes.
pub const FALLBACK_FOLD_THRESHOLD: f64 = 0.0;
/// P-value threshold forced when only the fold filter found genes.
pub const FALLBACK_PVALUE_THRESHOLD: f64 = 0.05;

/// Query construction settings.
///
/// Missing fields in serialized form fall back to the named defaults, so a
/// TOML document may set only the values it cares about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Mimic (`pos`) or revert (`neg`) the phenotype
    pub desired_effect: DesiredEffect,
    /// Genes pass when `|fold_change| > fold_threshold`
    pub fold_threshold: f64,
    /// Genes pass when `p_value < pvalue_threshold`
    pub pvalue_threshold: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            desired_effect: DesiredEffect::Neg,
            fold_threshold: DEFAULT_FOLD_THRESHOLD,
            pvalue_threshold: DEFAULT_PVALUE_THRESHOLD,
        }
    }
}

impl QueryConfig {
    /// Set the desired effect.
    #[must_use]
    pub fn with_desired_effect(mut self, desired_effect: DesiredEffect) -> Self {
        self.desired_effect = desired_effect;
        self
    }

    /// Set the fold-change threshold.
    #[must_use]
    pub fn with_fold_threshold(mut self, fold_threshold: f64) -> Self {
        self.fold_threshold = fold_threshold;
        self
    }

    /// Set the p-value threshold.
    #[must_use]
    pub fn with_pvalue_threshold(mut self, pvalue_threshold: f64) -> Self {
        self.pvalue_threshold = pvalue_threshold;
        self
    }

    /// Parse and validate a config from TOML text.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML for this type or the
    /// thresholds fail [`QueryConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        tracing::debug!(
            "Loaded query config: effect={}, fold_threshold={}, pvalue_threshold={}",
            config.desired_effect,
            config.fold_threshold,
            config.pvalue_threshold
        );

        Ok(config)
    }

    /// Check that both thresholds are usable numbers.
    ///
    /// Any finite value is accepted: a threshold nothing can pass simply
    /// empties its filter, which the builder handles through its fallback.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if either threshold is NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        if !self.fold_threshold.is_finite() {
            return Err(Error::Config(format!(
                "fold_threshold must be a finite number, got {}",
                self.fold_threshold
            )));
        }

        if !self.pvalue_threshold.is_finite() {
            return Err(Error::Config(format!(
                "pvalue_threshold must be a finite number, got {}",
                self.pvalue_threshold
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, to_string};

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert_eq!(config.desired_effect, DesiredEffect::Neg);
        assert!(config.fold_threshold.abs() < f64::EPSILON);
        assert!((config.pvalue_threshold - 0.05).abs() < f64::EPSILON);
        if let Err(error) = config.validate() {
            panic!("default config should validate: {error}");
        }
    }

    #[test]
    fn test_serialization() {
        let config = QueryConfig::default()
            .with_desired_effect(DesiredEffect::Pos)
            .with_fold_threshold(1.0);
        let json = match to_string(&config) {
            Ok(serialized_json) => serialized_json,
            Err(error) => panic!("serialize failed: {error}"),
        };
        assert!(json.contains("\"desired_effect\":\"pos\""));
        let deserialized: QueryConfig = match from_str(&json) {
            Ok(value) => value,
            Err(error) => panic!("deserialize failed: {error}"),
        };
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = match QueryConfig::from_toml_str("desired_effect = \"pos\"\n") {
            Ok(config) => config,
            Err(error) => panic!("parse failed: {error}"),
        };
        assert_eq!(config.desired_effect, DesiredEffect::Pos);
        assert!((config.pvalue_threshold - DEFAULT_PVALUE_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_toml() {
        let toml_content = r#"
desired_effect = "neg"
fold_threshold = 1.5
pvalue_threshold = 0.01
"#;
        let config = match QueryConfig::from_toml_str(toml_content) {
            Ok(config) => config,
            Err(error) => panic!("parse failed: {error}"),
        };
        assert!((config.fold_threshold - 1.5).abs() < f64::EPSILON);
        assert!((config.pvalue_threshold - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toml_rejects_unknown_effect() {
        let result = QueryConfig::from_toml_str("desired_effect = \"sideways\"\n");
        let Err(Error::Toml(error)) = result else {
            panic!("unknown effect should fail to deserialize");
        };
        assert!(
            error
                .to_string()
                .contains("Invalid desired effect: sideways")
        );
    }

    #[test]
    fn test_toml_rejects_non_finite_threshold() {
        let result = QueryConfig::from_toml_str("pvalue_threshold = nan\n");
        assert!(matches!(result, Err(Error::Config(_))));

        let result_inf = QueryConfig::from_toml_str("fold_threshold = inf\n");
        assert!(matches!(result_inf, Err(Error::Config(_))));
    }

    #[test]
    fn test_toml_accepts_out_of_range_thresholds() {
        let toml_content = r#"
fold_threshold = -1.0
pvalue_threshold = 1.5
"#;
        let config = match QueryConfig::from_toml_str(toml_content) {
            Ok(config) => config,
            Err(error) => panic!("finite thresholds should parse: {error}"),
        };
        assert!((config.fold_threshold + 1.0).abs() < f64::EPSILON);
        assert!((config.pvalue_threshold - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_thresholds() {
        let infinite_fold = QueryConfig::default().with_fold_threshold(f64::INFINITY);
        assert!(matches!(infinite_fold.validate(), Err(Error::Config(_))));

        let nan_fold = QueryConfig::default().with_fold_threshold(f64::NAN);
        assert!(matches!(nan_fold.validate(), Err(Error::Config(_))));

        let nan_pvalue = QueryConfig::default().with_pvalue_threshold(f64::NAN);
        assert!(matches!(nan_pvalue.validate(), Err(Error::Config(_))));

        let negative_infinite_pvalue =
            QueryConfig::default().with_pvalue_threshold(f64::NEG_INFINITY);
        assert!(matches!(
            negative_infinite_pvalue.validate(),
            Err(Error::Config(_))
        ));

        for config in [
            QueryConfig::default().with_fold_threshold(-1.0),
            QueryConfig::default().with_pvalue_threshold(0.0),
            QueryConfig::default().with_pvalue_threshold(2.0),
        ] {
            if let Err(error) = config.validate() {
                panic!("finite thresholds should validate: {error}");
            }
        }
    }
}
