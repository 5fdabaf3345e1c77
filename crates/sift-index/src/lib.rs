//! Tantivy-backed index client for sift search.
//!
//! This crate executes validated [`sift_query::Query`] values against a
//! Tantivy index and returns a typed [`ResultEnvelope`]: scored hits, a
//! total count that ignores paging, and facet value counts. It also
//! provides the [`IndexWriter`] used to populate an index from [`Item`]
//! documents.
//!
//! # Example
//!
//! ```no_run
//! use sift_index::{ClientOptions, IndexClient, IndexProvider, IndexWriter, Item, search_schema};
//! use sift_query::{Predicate, QueryBuilder};
//!
//! let mut writer = IndexWriter::open("./index".as_ref()).unwrap();
//! writer
//!     .add_item(&Item {
//!         id: "item-1".to_string(),
//!         name: "Media Folder".to_string(),
//!         path: "/content/media".to_string(),
//!         ancestors: vec!["root".to_string(), "content".to_string()],
//!         language: "en".to_string(),
//!         template: "Folder".to_string(),
//!         body: "Shared media assets".to_string(),
//!     })
//!     .unwrap();
//! writer.commit().unwrap();
//!
//! let client = IndexClient::open("./index".as_ref(), &ClientOptions::default()).unwrap();
//! let query = QueryBuilder::new(search_schema())
//!     .with_query(Predicate::contains("name", "media"))
//!     .facet_on("language")
//!     .build()
//!     .unwrap();
//! let results = client.execute(&query).unwrap();
//! assert_eq!(results.total_count, results.hits.len());
//! ```

#![warn(missing_docs)]

mod analyzer;
mod client;
mod compile;
mod document;
mod error;
mod result;
mod schema;
mod writer;

pub use client::{ClientOptions, IndexClient, IndexProvider};
pub use document::Item;
pub use error::IndexError;
pub use result::{FacetCount, Hit, ResultEnvelope};
pub use schema::{IndexSchema, search_schema};
pub use writer::IndexWriter;
