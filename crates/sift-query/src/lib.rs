//! Predicate model and query builder for sift search.
//!
//! This crate is the backend-independent half of sift: it models search
//! conditions as immutable [`Predicate`]s, combines them into
//! [`PredicateGroup`] trees, and accumulates them in a [`QueryBuilder`] that
//! validates everything up front and produces an immutable [`Query`].
//!
//! The builder keeps two separate predicate chains:
//!
//! - **Query predicates** ([`QueryBuilder::with_query`]) participate in
//!   relevance scoring.
//! - **Filter predicates** ([`QueryBuilder::with_filter`]) narrow the match
//!   set without moving any scores.
//!
//! Folding a precise restriction into the query chain skews ranking toward
//! documents that merely satisfy the restriction; keeping it on the filter
//! chain preserves the broad query's relevance order while still narrowing
//! the results. Facet selections are always filters for the same reason.
//!
//! Validation happens in [`QueryBuilder::build`], never at execution time:
//! unknown fields and malformed regexes fail with
//! [`QueryError::InvalidPredicate`], and predicates the index backend cannot
//! push down fail with [`QueryError::UnsupportedPredicate`]. There is no
//! fetch-the-corpus-and-filter-in-memory fallback.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use sift_query::{Predicate, QueryBuilder, SearchSchema, FieldKind};
//!
//! let schema = SearchSchema::new()
//!     .with_field("name", FieldKind::Text)
//!     .with_field("language", FieldKind::Keyword);
//!
//! let query = QueryBuilder::new(schema)
//!     .with_query(Predicate::contains("name", "media").or(Predicate::contains("name", "fda")))
//!     .facet_on("language")
//!     .page(0, NonZeroUsize::new(10).unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(query.facet_requests.len(), 1);
//! ```

#![warn(missing_docs)]

mod builder;
mod error;
pub mod facet;
mod predicate;
mod schema;

pub use builder::{FacetRequest, FacetSelection, Page, Query, QueryBuilder};
pub use error::QueryError;
pub use predicate::{Operator, Predicate, PredicateGroup};
pub use schema::{FieldKind, SearchSchema};
