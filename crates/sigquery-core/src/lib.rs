//! Query signature construction for connectivity-style similarity search.
//!
//! This crate turns a differential expression profile (log-fold-change and
//! p-value per gene) into a binary vector over a reference gene space of
//! `"{entrez} {direction}"` keys, ready to be handed to a similarity search.

/// Differential-expression query vector construction.
pub mod builder;
/// Query configuration with named defaults.
pub mod config;
/// Non-fatal informational events raised while building a query.
pub mod diagnostics;
/// Error types and result definitions.
pub mod error;
/// Reference gene space and the query vector aligned to it.
pub mod reference;
/// Core data types for expression profiles and gene directions.
pub mod types;

pub use builder::{
    QueryOutcome, QueryVectorBuilder, ResolvedThresholds, SelectedGene, build_query_vector,
};
pub use config::QueryConfig;
pub use diagnostics::Diagnostic;
pub use error::{Error, Result};
pub use reference::{QueryVector, ReferenceSpace, composite_key};
pub use types::{DesiredEffect, Direction, EntrezId, ExpressionMatrix};
