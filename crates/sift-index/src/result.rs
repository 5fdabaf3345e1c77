//! The typed result envelope returned by query execution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single hit: an item plus its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    /// Unique item identifier.
    pub id: String,
    /// Item name.
    pub name: String,
    /// Item path.
    pub path: String,
    /// Item language.
    pub language: String,
    /// Template name.
    pub template: String,
    /// Item content.
    pub body: String,
    /// Relevance score; filters never contribute to it.
    pub score: f32,
    /// Index-assigned insertion order, the tie-breaker for equal scores.
    pub ordinal: u64,
}

/// One facet value and the number of matching items carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    /// The field value.
    pub value: String,
    /// Number of items in the match set with this value.
    pub count: usize,
}

/// Everything a query execution produces.
///
/// `total_count` and `facets` always describe the full match set: paging
/// only limits `hits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Matching items, sorted by descending score then ordinal.
    pub hits: Vec<Hit>,
    /// Number of matches ignoring paging.
    pub total_count: usize,
    /// Facet counts per requested field, each sorted by descending count
    /// then value.
    pub facets: BTreeMap<String, Vec<FacetCount>>,
}

impl ResultEnvelope {
    /// Sum of the counts reported for one facet field.
    pub fn facet_total(&self, field: &str) -> usize {
        self.facets
            .get(field)
            .map(|counts| counts.iter().map(|c| c.count).sum())
            .unwrap_or(0)
    }
}
