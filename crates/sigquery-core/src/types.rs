use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Entrez gene identifier, kept in its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntrezId(String);

impl EntrezId {
    /// Wraps an identifier.
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntrezId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for EntrezId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for EntrezId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u32> for EntrezId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for EntrezId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Regulation direction of a differentially expressed gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Positive fold-change.
    Up,
    /// Negative fold-change.
    Down,
}

impl Direction {
    /// Labels a fold-change. Zero and NaN carry no direction.
    pub fn from_fold_change(fold_change: f64) -> Option<Self> {
        match fold_change {
            value if value > 0.0 => Some(Self::Up),
            value if value < 0.0 => Some(Self::Down),
            _ => None,
        }
    }

    /// Label used inside reference-space keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.as_str())
    }
}

/// Whether the query should mimic (`pos`) or revert (`neg`) the observed phenotype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DesiredEffect {
    /// Look for profiles that mimic the phenotype.
    Pos,
    /// Look for profiles that revert the phenotype.
    #[default]
    Neg,
}

impl DesiredEffect {
    /// Applies the effect to a fold-change: `neg` flips its sign.
    pub fn apply(self, fold_change: f64) -> f64 {
        match self {
            Self::Pos => fold_change,
            Self::Neg => -fold_change,
        }
    }

    /// Flag value as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pos => "pos",
            Self::Neg => "neg",
        }
    }
}

impl Display for DesiredEffect {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for DesiredEffect {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "pos" => Ok(Self::Pos),
            "neg" => Ok(Self::Neg),
            other => Err(Error::InvalidEffect(other.to_owned())),
        }
    }
}

impl TryFrom<String> for DesiredEffect {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Two aligned numeric columns: log-fold-change and p-value, one row per gene.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    fold_changes: Vec<f64>,
    p_values: Vec<f64>,
}

impl ExpressionMatrix {
    /// Builds a matrix from a fold-change column and a p-value column.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInputShape`] if the columns differ in length.
    pub fn new(fold_changes: Vec<f64>, p_values: Vec<f64>) -> Result<Self> {
        if fold_changes.len() != p_values.len() {
            return Err(Error::InvalidInputShape(format!(
                "fold-change column has {} rows but p-value column has {}",
                fold_changes.len(),
                p_values.len()
            )));
        }

        Ok(Self {
            fold_changes,
            p_values,
        })
    }

    /// Builds a matrix from column-major data, which must hold exactly two columns.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInputShape`] on any other column count or on
    /// columns of different length.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self> {
        let column_count = columns.len();
        let Ok([fold_changes, p_values]) = <[Vec<f64>; 2]>::try_from(columns) else {
            return Err(Error::InvalidInputShape(format!(
                "expected 2 columns (fold-change, p-value), got {column_count}"
            )));
        };
        Self::new(fold_changes, p_values)
    }

    /// Builds a matrix from row-major data where every row is `[fold_change, p_value]`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInputShape`] if a row does not have exactly two values.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let mut fold_changes = Vec::with_capacity(rows.len());
        let mut p_values = Vec::with_capacity(rows.len());

        for (row_index, row) in rows.iter().enumerate() {
            let [fold, pvalue] = row.as_slice() else {
                return Err(Error::InvalidInputShape(format!(
                    "row {row_index} has {} values, expected 2",
                    row.len()
                )));
            };
            fold_changes.push(*fold);
            p_values.push(*pvalue);
        }

        Ok(Self {
            fold_changes,
            p_values,
        })
    }

    /// Number of genes (rows).
    pub fn len(&self) -> usize {
        self.fold_changes.len()
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.fold_changes.is_empty()
    }

    /// Fold-change column.
    pub fn fold_changes(&self) -> &[f64] {
        &self.fold_changes
    }

    /// P-value column.
    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    /// Returns a copy with every fold-change negated.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            fold_changes: self.fold_changes.iter().map(|value| -value).collect(),
            p_values: self.p_values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_fold_change() {
        assert_eq!(Direction::from_fold_change(1.5), Some(Direction::Up));
        assert_eq!(Direction::from_fold_change(-0.2), Some(Direction::Down));
        assert_eq!(Direction::from_fold_change(0.0), None);
        assert_eq!(Direction::from_fold_change(-0.0), None);
        assert_eq!(Direction::from_fold_change(f64::NAN), None);
    }

    #[test]
    fn test_desired_effect_parsing() {
        assert_eq!("pos".parse::<DesiredEffect>().ok(), Some(DesiredEffect::Pos));
        assert_eq!("neg".parse::<DesiredEffect>().ok(), Some(DesiredEffect::Neg));
        assert!(matches!(
            "mimic".parse::<DesiredEffect>(),
            Err(Error::InvalidEffect(value)) if value == "mimic"
        ));
        assert_eq!(DesiredEffect::default(), DesiredEffect::Neg);
    }

    #[test]
    fn test_desired_effect_deserializes_through_parse() {
        let parsed: Option<DesiredEffect> = serde_json::from_str("\"pos\"").ok();
        assert_eq!(parsed, Some(DesiredEffect::Pos));

        let Err(error) = serde_json::from_str::<DesiredEffect>("\"both\"") else {
            panic!("unknown effect should be rejected");
        };
        assert!(error.to_string().contains("Invalid desired effect: both"));
        assert!(matches!(
            DesiredEffect::try_from("up".to_owned()),
            Err(Error::InvalidEffect(value)) if value == "up"
        ));
    }

    #[test]
    fn test_desired_effect_apply() {
        assert!(DesiredEffect::Neg.apply(2.0) < 0.0);
        assert!(DesiredEffect::Pos.apply(2.0) > 0.0);
        assert_eq!(
            Direction::from_fold_change(DesiredEffect::Neg.apply(-3.0)),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_entrez_id_conversions() {
        assert_eq!(EntrezId::from(7157_u32), EntrezId::from("7157"));
        assert_eq!(EntrezId::new("672").to_string(), "672");
        assert_eq!(EntrezId::from(1_u64).as_str(), "1");
    }

    #[test]
    fn test_matrix_rejects_misaligned_columns() {
        let result = ExpressionMatrix::new(vec![1.0, 2.0], vec![0.01]);
        assert!(matches!(result, Err(Error::InvalidInputShape(_))));
    }

    #[test]
    fn test_matrix_from_columns_requires_two() {
        let three = ExpressionMatrix::from_columns(vec![vec![1.0], vec![0.01], vec![5.0]]);
        assert!(matches!(three, Err(Error::InvalidInputShape(_))));

        let one = ExpressionMatrix::from_columns(vec![vec![1.0]]);
        assert!(matches!(one, Err(Error::InvalidInputShape(_))));

        let two = ExpressionMatrix::from_columns(vec![vec![1.0, -1.0], vec![0.01, 0.2]]);
        assert_eq!(two.as_ref().map(ExpressionMatrix::len).ok(), Some(2));
    }

    #[test]
    fn test_matrix_from_rows() {
        let matrix = ExpressionMatrix::from_rows(&[vec![2.0, 0.01], vec![-1.0, 0.5]]);
        let Ok(matrix) = matrix else {
            panic!("two-wide rows should be accepted");
        };
        assert_eq!(matrix.fold_changes(), &[2.0, -1.0]);
        assert_eq!(matrix.p_values(), &[0.01, 0.5]);

        let ragged = ExpressionMatrix::from_rows(&[vec![2.0, 0.01], vec![-1.0]]);
        assert!(matches!(ragged, Err(Error::InvalidInputShape(message)) if message.contains("row 1")));
    }

    #[test]
    fn test_matrix_negated() {
        let Ok(matrix) = ExpressionMatrix::new(vec![1.0, -2.0], vec![0.1, 0.2]) else {
            panic!("aligned columns should be accepted");
        };
        let negated = matrix.negated();
        assert_eq!(negated.fold_changes(), &[-1.0, 2.0]);
        assert_eq!(negated.p_values(), matrix.p_values());
    }
}
