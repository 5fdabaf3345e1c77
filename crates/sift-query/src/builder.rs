//! Incremental query construction and build-time validation.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::{
    error::QueryError,
    predicate::{Operator, Predicate, PredicateGroup},
    schema::SearchSchema,
};

/// A request to compute value counts for a field over the match set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRequest {
    /// Field to aggregate.
    pub field: String,
}

/// A user-chosen facet value used to narrow results.
///
/// Selections are filters: they narrow the match set without participating
/// in relevance scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    /// Field the selection applies to.
    pub field: String,
    /// Selected value.
    pub value: String,
}

/// Paging parameters. `size` is non-zero by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Zero-based page index.
    pub index: usize,
    /// Number of hits per page.
    pub size: NonZeroUsize,
}

impl Page {
    /// Number of hits to skip before the first hit of this page.
    pub fn offset(&self) -> usize {
        self.index * self.size.get()
    }
}

/// An immutable, validated query ready for execution.
///
/// Built once via [`QueryBuilder::build`], executed once, then discarded.
/// Paging never affects the total count or facet aggregates reported for
/// the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Ranking-affecting predicate groups, combined with AND.
    pub query_groups: Vec<PredicateGroup>,
    /// Non-ranking predicate groups, combined with AND.
    pub filter_groups: Vec<PredicateGroup>,
    /// Fields to compute facet counts for.
    pub facet_requests: Vec<FacetRequest>,
    /// Facet values chosen by the caller, applied as filters.
    pub facet_selections: Vec<FacetSelection>,
    /// Paging, if any.
    pub page: Option<Page>,
}

/// Accumulates predicates, facets, and paging, then validates the whole
/// query in one pass.
///
/// Successive [`with_query`](Self::with_query) and
/// [`with_filter`](Self::with_filter) calls intersect (AND semantics), so a
/// broad OR group can be narrowed step by step without touching earlier
/// clauses.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    /// Field registry used for validation.
    schema: SearchSchema,
    /// Accumulated query groups.
    query_groups: Vec<PredicateGroup>,
    /// Accumulated filter groups.
    filter_groups: Vec<PredicateGroup>,
    /// Accumulated facet requests.
    facet_requests: Vec<FacetRequest>,
    /// Accumulated facet selections.
    facet_selections: Vec<FacetSelection>,
    /// Paging, if set.
    page: Option<Page>,
}

impl QueryBuilder {
    /// Creates a builder validating against the given schema.
    pub fn new(schema: SearchSchema) -> Self {
        Self {
            schema,
            query_groups: Vec::new(),
            filter_groups: Vec::new(),
            facet_requests: Vec::new(),
            facet_selections: Vec::new(),
            page: None,
        }
    }

    /// Adds a ranking-affecting predicate group.
    #[must_use]
    pub fn with_query(mut self, group: impl Into<PredicateGroup>) -> Self {
        self.query_groups.push(group.into());
        self
    }

    /// Adds a predicate group that narrows results without affecting scores.
    #[must_use]
    pub fn with_filter(mut self, group: impl Into<PredicateGroup>) -> Self {
        self.filter_groups.push(group.into());
        self
    }

    /// Requests facet counts for `field`.
    #[must_use]
    pub fn facet_on(mut self, field: impl Into<String>) -> Self {
        self.facet_requests.push(FacetRequest {
            field: field.into(),
        });
        self
    }

    /// Narrows results to documents whose `field` equals `value`.
    ///
    /// Applied as a filter; when counting facets for the same field the
    /// selection is excluded so alternative values remain visible.
    #[must_use]
    pub fn with_facet_selection(
        mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.facet_selections.push(FacetSelection {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Sets paging. Total counts and facets still reflect the full match set.
    #[must_use]
    pub fn page(mut self, index: usize, size: NonZeroUsize) -> Self {
        self.page = Some(Page { index, size });
        self
    }

    /// Validates every predicate and finalizes the query.
    ///
    /// Fails fast with [`QueryError::InvalidPredicate`] for malformed input
    /// and [`QueryError::UnsupportedPredicate`] for predicates the backend
    /// cannot translate. Nothing is deferred to execution time.
    pub fn build(self) -> Result<Query, QueryError> {
        for group in self.query_groups.iter().chain(self.filter_groups.iter()) {
            for predicate in group.predicates() {
                validate_predicate(&self.schema, predicate)?;
            }
        }

        for request in &self.facet_requests {
            validate_facet_field(&self.schema, &request.field)?;
        }
        for selection in &self.facet_selections {
            validate_facet_field(&self.schema, &selection.field)?;
        }

        Ok(Query {
            query_groups: self.query_groups,
            filter_groups: self.filter_groups,
            facet_requests: self.facet_requests,
            facet_selections: self.facet_selections,
            page: self.page,
        })
    }
}

/// Checks a single predicate against the schema.
fn validate_predicate(schema: &SearchSchema, predicate: &Predicate) -> Result<(), QueryError> {
    if predicate.field.is_empty() {
        return Err(QueryError::invalid(&predicate.field, "empty field name"));
    }

    let Some(kind) = schema.kind(&predicate.field) else {
        return Err(QueryError::invalid(&predicate.field, "unknown field"));
    };

    if !kind.supports(&predicate.operator) {
        return Err(QueryError::unsupported(
            &predicate.field,
            format!(
                "operator `{}` is not supported on a {kind:?} field",
                predicate.operator.name()
            ),
        ));
    }

    match &predicate.operator {
        // Empty patterns are legal and match nothing at execution time.
        Operator::Matches(pattern) if !pattern.is_empty() => {
            tantivy_fst::Regex::new(pattern).map_err(|e| {
                QueryError::invalid(&predicate.field, format!("invalid regex: {e}"))
            })?;
        }
        Operator::FuzzyLike { threshold, .. } => {
            if !(0.0..=1.0).contains(threshold) {
                return Err(QueryError::invalid(
                    &predicate.field,
                    format!("similarity threshold {threshold} is outside [0, 1]"),
                ));
            }
        }
        _ => {}
    }

    Ok(())
}

/// Checks that a field exists and can be faceted on.
fn validate_facet_field(schema: &SearchSchema, field: &str) -> Result<(), QueryError> {
    let Some(kind) = schema.kind(field) else {
        return Err(QueryError::invalid(field, "unknown field"));
    };
    if !kind.facetable() {
        return Err(QueryError::unsupported(
            field,
            format!("{kind:?} fields cannot be faceted on"),
        ));
    }
    Ok(())
}
