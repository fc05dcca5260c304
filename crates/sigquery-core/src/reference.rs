use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Direction, EntrezId};

/// Formats the `"{entrez} {direction}"` key used by reference gene spaces.
pub fn composite_key(entrez: &EntrezId, direction: Direction) -> String {
    format!("{entrez} {direction}")
}

/// Ordered reference gene space defining the coordinates of a query vector.
///
/// Keys are indexed once on construction so that projecting a query costs a
/// hash lookup per selected gene. A key may occur more than once; every
/// occurrence is a separate output position.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSpace {
    keys: Vec<String>,
    index: HashMap<String, Vec<usize>>,
}

impl ReferenceSpace {
    /// Indexes an ordered list of composite keys.
    pub fn new(keys: Vec<String>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::with_capacity(keys.len());
        for (position, key) in keys.iter().enumerate() {
            index.entry(key.clone()).or_default().push(position);
        }

        Self { keys, index }
    }

    /// Builds the space from `(entrez, direction)` pairs, in order.
    pub fn from_pairs<I, E>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, Direction)>,
        E: Into<EntrezId>,
    {
        let keys = pairs
            .into_iter()
            .map(|(entrez, direction)| composite_key(&entrez.into(), direction))
            .collect();
        Self::new(keys)
    }

    /// Number of positions (M).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the space has no positions.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in output order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Every position holding `key`; empty when the key is absent.
    pub fn positions(&self, key: &str) -> &[usize] {
        self.index.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `key` occurs anywhere in the space.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }
}

impl From<Vec<String>> for ReferenceSpace {
    fn from(keys: Vec<String>) -> Self {
        Self::new(keys)
    }
}

impl<'key> FromIterator<&'key str> for ReferenceSpace {
    fn from_iter<I: IntoIterator<Item = &'key str>>(keys: I) -> Self {
        Self::new(keys.into_iter().map(str::to_owned).collect())
    }
}

/// Binary query signature aligned to a [`ReferenceSpace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryVector(Vec<u8>);

impl QueryVector {
    /// All-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub(crate) fn set(&mut self, position: usize) {
        if let Some(slot) = self.0.get_mut(position) {
            *slot = 1;
        }
    }

    /// Vector length (M).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no positions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw 0/1 values.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of positions set to 1.
    pub fn sum(&self) -> usize {
        self.0.iter().map(|&value| usize::from(value)).sum()
    }

    /// Indices of the positions set to 1, in ascending order.
    pub fn active_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == 1)
            .map(|(position, _)| position)
    }

    /// Consumes the vector and returns the raw values.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}
