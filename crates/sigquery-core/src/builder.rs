//! Differential-expression query vector construction.
//!
//! Genes are selected by an absolute fold-change filter and a p-value filter.
//! When exactly one of the filters comes back empty it is relaxed to a fixed
//! fallback threshold and retried once; the other filter is left alone.
//! Selected genes are then projected onto a [`ReferenceSpace`] by key.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::{FALLBACK_FOLD_THRESHOLD, FALLBACK_PVALUE_THRESHOLD, QueryConfig};
use crate::diagnostics::Diagnostic;
use crate::reference::{QueryVector, ReferenceSpace, composite_key};
use crate::types::{Direction, EntrezId, ExpressionMatrix};
use crate::{Error, Result};

/// Thresholds that were in force once fallback resolution finished.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedThresholds {
    /// Fold-change threshold used for the final selection
    pub fold: f64,
    /// P-value threshold used for the final selection
    pub pvalue: f64,
}

/// A gene that passed selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedGene {
    /// Row in the expression matrix
    pub index: usize,
    /// Entrez identifier of the row
    pub entrez: EntrezId,
    /// Direction after effect inversion
    pub direction: Direction,
    /// `"{entrez} {direction}"` key matched against the reference space
    pub key: String,
}

/// Everything produced by one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    /// Binary vector aligned to the reference space
    pub vector: QueryVector,
    /// Informational events, in the order they were raised
    pub diagnostics: Vec<Diagnostic>,
    /// Thresholds after fallback resolution
    pub thresholds: ResolvedThresholds,
    /// Selected genes in input order
    pub selected: Vec<SelectedGene>,
}

impl QueryOutcome {
    /// Drops everything but the vector.
    pub fn into_vector(self) -> QueryVector {
        self.vector
    }

    /// Number of selected genes whose key is present in `reference`.
    pub fn matched_count(&self, reference: &ReferenceSpace) -> usize {
        self.selected
            .iter()
            .filter(|gene| reference.contains(&gene.key))
            .count()
    }
}

/// Builds query vectors from differential expression profiles.
#[derive(Debug, Clone, Default)]
pub struct QueryVectorBuilder {
    config: QueryConfig,
}

impl QueryVectorBuilder {
    /// Create a builder, validating the configuration once.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the thresholds are invalid.
    pub fn new(config: QueryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Build the query vector for one expression profile.
    ///
    /// `entrez` must hold one identifier per row of `expression`. The returned
    /// vector always has `reference.len()` positions; threshold misses are
    /// reported through [`QueryOutcome::diagnostics`], never as errors.
    ///
    /// # Errors
    /// Returns [`Error::MissingIdentifiers`] if `entrez` is `None` and
    /// [`Error::InvalidInputShape`] if it is not aligned with `expression`.
    pub fn build(
        &self,
        expression: &ExpressionMatrix,
        entrez: Option<&[EntrezId]>,
        reference: &ReferenceSpace,
    ) -> Result<QueryOutcome> {
        let entrez = entrez.ok_or(Error::MissingIdentifiers)?;
        if entrez.len() != expression.len() {
            return Err(Error::InvalidInputShape(format!(
                "expression has {} rows but {} entrez identifiers were given",
                expression.len(),
                entrez.len()
            )));
        }

        let mut diagnostics = Vec::new();
        let (indices, thresholds) = self.resolve_selection(expression, &mut diagnostics);
        let selected = self.label_selection(expression, entrez, &indices);

        if selected.is_empty() {
            Diagnostic::NoDifferentiallyExpressedGenes.record(&mut diagnostics);
        }

        let vector = project(&selected, reference);
        if vector.sum() == 0 {
            Diagnostic::NoReferenceMatches.record(&mut diagnostics);
        }

        tracing::debug!(
            "Built query vector: {} rows, {} selected, {} of {} positions set",
            expression.len(),
            selected.len(),
            vector.sum(),
            vector.len()
        );

        Ok(QueryOutcome {
            vector,
            diagnostics,
            thresholds,
            selected,
        })
    }

    /// Apply both filters, relaxing at most one of them when it alone is empty.
    fn resolve_selection(
        &self,
        expression: &ExpressionMatrix,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (Vec<usize>, ResolvedThresholds) {
        let mut thresholds = ResolvedThresholds {
            fold: self.config.fold_threshold,
            pvalue: self.config.pvalue_threshold,
        };
        let fold_pass = fold_candidates(expression, thresholds.fold);
        let pvalue_pass = pvalue_candidates(expression, thresholds.pvalue);

        tracing::debug!(
            "Threshold candidates: {} pass fold > {}, {} pass pvalue < {}",
            fold_pass.len(),
            thresholds.fold,
            pvalue_pass.len(),
            thresholds.pvalue
        );

        let indices = match (fold_pass.is_empty(), pvalue_pass.is_empty()) {
            (false, false) => intersect(&fold_pass, &pvalue_pass),
            (false, true) => {
                thresholds.pvalue = FALLBACK_PVALUE_THRESHOLD;
                let relaxed = pvalue_candidates(expression, thresholds.pvalue);
                let indices = intersect(&fold_pass, &relaxed);
                if !indices.is_empty() {
                    Diagnostic::PvalueThresholdRelaxed {
                        requested: self.config.pvalue_threshold,
                        applied: thresholds.pvalue,
                    }
                    .record(diagnostics);
                }
                indices
            }
            (true, false) => {
                thresholds.fold = FALLBACK_FOLD_THRESHOLD;
                let relaxed = fold_candidates(expression, thresholds.fold);
                let indices = intersect(&relaxed, &pvalue_pass);
                if !indices.is_empty() {
                    Diagnostic::FoldThresholdRelaxed {
                        requested: self.config.fold_threshold,
                        applied: thresholds.fold,
                    }
                    .record(diagnostics);
                }
                indices
            }
            (true, true) => Vec::new(),
        };

        (indices, thresholds)
    }

    /// Attach direction and key to each selected row. Rows without a direction drop out.
    fn label_selection(
        &self,
        expression: &ExpressionMatrix,
        entrez: &[EntrezId],
        indices: &[usize],
    ) -> Vec<SelectedGene> {
        let effect = self.config.desired_effect;
        let fold_changes = expression.fold_changes();

        indices
            .iter()
            .filter_map(|&index| {
                let direction = Direction::from_fold_change(effect.apply(fold_changes[index]))?;
                let gene_id = entrez[index].clone();
                let key = composite_key(&gene_id, direction);
                Some(SelectedGene {
                    index,
                    entrez: gene_id,
                    direction,
                    key,
                })
            })
            .collect()
    }
}

/// Build a query vector with every setting passed explicitly.
///
/// # Errors
/// Returns [`Error::Config`] for invalid thresholds, otherwise the errors of
/// [`QueryVectorBuilder::build`].
pub fn build_query_vector(
    expression: &ExpressionMatrix,
    entrez: Option<&[EntrezId]>,
    config: QueryConfig,
    reference: &ReferenceSpace,
) -> Result<QueryVector> {
    QueryVectorBuilder::new(config)?
        .build(expression, entrez, reference)
        .map(QueryOutcome::into_vector)
}

fn fold_candidates(expression: &ExpressionMatrix, threshold: f64) -> Vec<usize> {
    expression
        .fold_changes()
        .iter()
        .enumerate()
        .filter(|&(_, fold_change)| fold_change.abs() > threshold)
        .map(|(index, _)| index)
        .collect()
}

fn pvalue_candidates(expression: &ExpressionMatrix, threshold: f64) -> Vec<usize> {
    expression
        .p_values()
        .iter()
        .enumerate()
        .filter(|&(_, &p_value)| p_value < threshold)
        .map(|(index, _)| index)
        .collect()
}

/// Rows present in both lists, in the order of `left`.
fn intersect(left: &[usize], right: &[usize]) -> Vec<usize> {
    let right_set: HashSet<usize> = right.iter().copied().collect();
    left.iter()
        .copied()
        .filter(|index| right_set.contains(index))
        .collect()
}

fn project(selected: &[SelectedGene], reference: &ReferenceSpace) -> QueryVector {
    let mut vector = QueryVector::zeros(reference.len());
    for gene in selected {
        for &position in reference.positions(&gene.key) {
            vector.set(position);
        }
    }
    vector
}
