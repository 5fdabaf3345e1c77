//! Query execution against a Tantivy index.
//!
//! [`IndexClient`] is the concrete [`IndexProvider`]: it translates a
//! validated [`Query`] into Tantivy's native representation and returns a
//! [`ResultEnvelope`]. Three invariants drive the execution plan:
//!
//! - the total count is computed on the unpaged match set, so paging can
//!   never change it;
//! - filter predicates and facet selections are attached as zero-boost
//!   clauses, so they narrow results without moving scores;
//! - facet counts for a field ignore selections on that same field, so
//!   alternative values stay visible while one is selected.
//!
//! Each execution acquires its own reader and releases it on every exit
//! path; executions are independent and safe to run concurrently.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    path::Path,
    time::{Duration, Instant},
};

use tantivy::{
    Index, TantivyDocument,
    collector::{Count, DocSetCollector, TopDocs},
    directory::MmapDirectory,
    query::{BooleanQuery, Occur, Query as TantivyQuery},
    schema::{Field, Value},
    tokenizer::TextAnalyzer,
};

use crate::{
    analyzer::{SIFT_TOKENIZER, build_analyzer_from_name},
    compile::{PredicateCompiler, unscored},
    error::IndexError,
    result::{FacetCount, Hit, ResultEnvelope},
    schema::IndexSchema,
};
use sift_query::{Predicate, Query, QueryError};

/// The capability an index backend must provide.
///
/// Any engine that can translate and execute a [`Query`] is pluggable
/// behind this trait; callers receive it by injection rather than through
/// a process-wide registry.
pub trait IndexProvider {
    /// Executes a validated query, returning hits, the paging-independent
    /// total count, and facet counts.
    fn execute(&self, query: &Query) -> Result<ResultEnvelope, IndexError>;
}

/// Options controlling how an [`IndexClient`] executes queries.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Stemmer language used for query-side analysis.
    pub language: String,
    /// Deadline for a single query execution.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            language: "english".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// A per-execution deadline, checked between execution phases.
struct Deadline {
    /// When the execution started.
    start: Instant,
    /// The configured budget.
    budget: Duration,
}

impl Deadline {
    /// Starts the clock for one execution.
    fn start(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// Fails with [`IndexError::Timeout`] once the budget is exhausted.
    fn check(&self) -> Result<(), IndexError> {
        if self.start.elapsed() > self.budget {
            Err(IndexError::Timeout {
                budget_ms: self.budget.as_millis() as u64,
            })
        } else {
            Ok(())
        }
    }
}

/// Executes queries against a Tantivy index.
pub struct IndexClient {
    /// The Tantivy index.
    index: Index,
    /// Schema with field handles.
    schema: IndexSchema,
    /// Analyzer for query-side tokenization.
    analyzer: TextAnalyzer,
    /// Per-execution deadline.
    timeout: Duration,
}

impl IndexClient {
    /// Opens an existing index for querying.
    ///
    /// Fails with [`IndexError::Unavailable`] when the index directory does
    /// not exist or cannot be opened.
    pub fn open(path: &Path, options: &ClientOptions) -> Result<Self, IndexError> {
        if !path.exists() {
            return Err(IndexError::Unavailable {
                path: path.to_path_buf(),
                message: "index directory does not exist".to_string(),
            });
        }

        let schema = IndexSchema::new();

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            IndexError::unavailable(path.to_path_buf(), &err)
        })?;

        let index =
            Index::open(dir).map_err(|e| IndexError::unavailable(path.to_path_buf(), &e))?;

        let analyzer = build_analyzer_from_name(&options.language)?;
        index.tokenizers().register(SIFT_TOKENIZER, analyzer.clone());

        Ok(Self {
            index,
            schema,
            analyzer,
            timeout: options.timeout,
        })
    }

    /// Returns the number of documents in the index.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self.index.reader().map_err(|e| IndexError::execute(&e))?;
        Ok(reader.searcher().num_docs())
    }

    /// Compiles the full query, optionally leaving out facet selections on
    /// `exclude_selection_field`.
    fn compiled(
        &self,
        compiler: &mut PredicateCompiler,
        query: &Query,
        exclude_selection_field: Option<&str>,
    ) -> Result<Box<dyn TantivyQuery>, IndexError> {
        let scored = compiler.conjunction(&query.query_groups)?;

        let mut filter_parts: Vec<Box<dyn TantivyQuery>> = Vec::new();
        for group in &query.filter_groups {
            filter_parts.push(compiler.group(group)?);
        }
        for selection in &query.facet_selections {
            if exclude_selection_field == Some(selection.field.as_str()) {
                continue;
            }
            let predicate = Predicate::equals(&selection.field, &selection.value);
            filter_parts.push(compiler.group(&predicate.into())?);
        }

        if filter_parts.is_empty() {
            return Ok(scored);
        }

        let mut clauses: Vec<(Occur, Box<dyn TantivyQuery>)> = vec![(Occur::Must, scored)];
        for part in filter_parts {
            clauses.push((Occur::Must, unscored(part)));
        }
        Ok(Box::new(BooleanQuery::new(clauses)))
    }

    /// Converts a stored document into a hit.
    fn to_hit(&self, doc: &TantivyDocument, score: f32) -> Hit {
        Hit {
            id: get_text(doc, self.schema.id),
            name: get_text(doc, self.schema.name),
            path: get_text(doc, self.schema.path),
            language: get_text(doc, self.schema.language),
            template: get_text(doc, self.schema.template),
            body: get_text(doc, self.schema.body),
            score,
            ordinal: doc
                .get_first(self.schema.ordinal)
                .and_then(|v| v.as_u64())
                .unwrap_or(0),
        }
    }

    /// Counts values of `field` over the documents matching `facet_query`.
    fn count_facet(
        &self,
        searcher: &tantivy::Searcher,
        facet_query: &dyn TantivyQuery,
        field: Field,
    ) -> Result<Vec<FacetCount>, IndexError> {
        let docs = searcher
            .search(facet_query, &DocSetCollector)
            .map_err(|e| IndexError::execute(&e))?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for address in docs {
            let doc: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| IndexError::execute(&e))?;
            if let Some(value) = doc.get_first(field).and_then(|v| v.as_str()) {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }

        let mut values: Vec<FacetCount> = counts
            .into_iter()
            .map(|(value, count)| FacetCount { value, count })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        Ok(values)
    }
}

impl IndexProvider for IndexClient {
    fn execute(&self, query: &Query) -> Result<ResultEnvelope, IndexError> {
        let deadline = Deadline::start(self.timeout);
        let mut compiler = PredicateCompiler::new(self.schema.clone(), self.analyzer.clone());

        // Reader lifetime is scoped to this execution.
        let reader = self.index.reader().map_err(|e| IndexError::execute(&e))?;
        let searcher = reader.searcher();

        let main = self.compiled(&mut compiler, query, None)?;

        // The total always reflects the unpaged match set.
        let total = searcher
            .search(&*main, &Count)
            .map_err(|e| IndexError::execute(&e))?;
        deadline.check()?;

        let mut hits: Vec<Hit> = Vec::new();
        if total > 0 {
            let limit = match query.page {
                Some(page) => page.offset() + page.size.get(),
                None => total,
            };
            let top = searcher
                .search(&*main, &TopDocs::with_limit(limit))
                .map_err(|e| IndexError::execute(&e))?;

            for (score, address) in top {
                let doc: TantivyDocument = searcher
                    .doc(address)
                    .map_err(|e| IndexError::execute(&e))?;
                hits.push(self.to_hit(&doc, score));
            }

            // Descending score, ties broken by insertion order so repeated
            // identical queries paginate identically.
            hits.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.ordinal.cmp(&b.ordinal))
            });

            if let Some(page) = query.page {
                hits = hits
                    .into_iter()
                    .skip(page.offset())
                    .take(page.size.get())
                    .collect();
            }
        }
        deadline.check()?;

        let mut facets = BTreeMap::new();
        for request in &query.facet_requests {
            let field = self
                .schema
                .keyword(&request.field)
                .ok_or_else(|| QueryError::UnsupportedPredicate {
                    field: request.field.clone(),
                    message: "field is not facetable".to_string(),
                })?;

            let facet_query = self.compiled(&mut compiler, query, Some(&request.field))?;
            let values = self.count_facet(&searcher, &*facet_query, field)?;
            facets.insert(request.field.clone(), values);
            deadline.check()?;
        }

        Ok(ResultEnvelope {
            hits,
            total_count: total,
            facets,
        })
    }
}

/// Extracts a stored text field value from a document.
fn get_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, num::NonZeroUsize};

    use tempfile::TempDir;

    use super::*;
    use crate::{
        document::Item,
        schema::search_schema,
        writer::IndexWriter,
    };
    use sift_query::QueryBuilder;

    /// Builds an item.
    fn item(id: &str, name: &str, language: &str, template: &str, ancestors: &[&str]) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            path: format!("/content/{id}"),
            ancestors: ancestors.iter().map(|a| a.to_string()).collect(),
            language: language.to_string(),
            template: template.to_string(),
            body: format!("Content of {name}."),
        }
    }

    /// 25 items matching "media" or "fda" (20 en, 5 da) plus a handful of
    /// non-matching items.
    fn corpus() -> Vec<Item> {
        let mut items = Vec::new();
        for i in 1..=15 {
            let language = if i <= 10 { "en" } else { "da" };
            items.push(item(
                &format!("media-{i}"),
                &format!("Media Folder {i}"),
                language,
                "Folder",
                &["root", "content"],
            ));
        }
        for i in 1..=10 {
            items.push(item(
                &format!("fda-{i}"),
                &format!("FDA Report {i}"),
                "en",
                "Report",
                &["root", "reports"],
            ));
        }
        items.push(item(
            "standard-1",
            "Standard Values",
            "en",
            "Template",
            &["root", "system"],
        ));
        items.push(item(
            "standard-2",
            "Standard Layout",
            "en",
            "Template",
            &["root", "content"],
        ));
        items.push(item("zephyr", "zephyr", "en", "Misc", &["root"]));
        items.push(item("zephyrx", "zephyrx", "en", "Misc", &["root"]));
        items
    }

    /// Creates a populated index and returns a client over it.
    fn fixture(temp: &TempDir) -> IndexClient {
        let mut writer = IndexWriter::open(temp.path()).unwrap();
        writer.add_items(&corpus()).unwrap();
        writer.commit().unwrap();
        IndexClient::open(temp.path(), &ClientOptions::default()).unwrap()
    }

    /// Builder over the standard schema.
    fn builder() -> QueryBuilder {
        QueryBuilder::new(search_schema())
    }

    /// The broad OR query used across scenarios.
    fn media_or_fda() -> sift_query::PredicateGroup {
        Predicate::contains("name", "Media").or(Predicate::contains("name", "FDA"))
    }

    #[test]
    fn or_query_with_paging_reports_full_totals() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder()
            .with_query(media_or_fda())
            .facet_on("language")
            .page(0, NonZeroUsize::new(10).unwrap())
            .build()
            .unwrap();

        let results = client.execute(&query).unwrap();

        assert_eq!(results.total_count, 25);
        assert_eq!(results.hits.len(), 10);
        assert_eq!(results.facet_total("language"), 25);

        let languages = &results.facets["language"];
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[0].value, "en");
        assert_eq!(languages[0].count, 20);
        assert_eq!(languages[1].value, "da");
        assert_eq!(languages[1].count, 5);
    }

    #[test]
    fn total_count_ignores_paging() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        for (index, size) in [(0, 3), (1, 7), (2, 10), (0, 25), (0, 40), (5, 10)] {
            let query = builder()
                .with_query(media_or_fda())
                .page(index, NonZeroUsize::new(size).unwrap())
                .build()
                .unwrap();

            let results = client.execute(&query).unwrap();
            assert_eq!(results.total_count, 25, "page({index}, {size})");
            assert_eq!(
                results.hits.len(),
                25usize.saturating_sub(index * size).min(size),
                "page({index}, {size})"
            );
        }
    }

    #[test]
    fn pages_partition_the_unpaged_order() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let unpaged = client
            .execute(&builder().with_query(media_or_fda()).build().unwrap())
            .unwrap();
        let unpaged_ids: Vec<String> = unpaged.hits.iter().map(|h| h.id.clone()).collect();

        let mut paged_ids = Vec::new();
        for index in 0..3 {
            let query = builder()
                .with_query(media_or_fda())
                .page(index, NonZeroUsize::new(10).unwrap())
                .build()
                .unwrap();
            let page = client.execute(&query).unwrap();
            paged_ids.extend(page.hits.into_iter().map(|h| h.id));
        }

        assert_eq!(paged_ids, unpaged_ids);
    }

    #[test]
    fn repeated_execution_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder().with_query(media_or_fda()).build().unwrap();

        let first: Vec<String> = client
            .execute(&query)
            .unwrap()
            .hits
            .into_iter()
            .map(|h| h.id)
            .collect();
        let second: Vec<String> = client
            .execute(&query)
            .unwrap()
            .hits
            .into_iter()
            .map(|h| h.id)
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn chained_queries_intersect_regardless_of_order() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let forward = builder()
            .with_query(Predicate::contains("name", "media"))
            .with_query(Predicate::contains("name", "folder"))
            .build()
            .unwrap();
        let backward = builder()
            .with_query(Predicate::contains("name", "folder"))
            .with_query(Predicate::contains("name", "media"))
            .build()
            .unwrap();

        let mut forward_ids: Vec<String> = client
            .execute(&forward)
            .unwrap()
            .hits
            .into_iter()
            .map(|h| h.id)
            .collect();
        let mut backward_ids: Vec<String> = client
            .execute(&backward)
            .unwrap()
            .hits
            .into_iter()
            .map(|h| h.id)
            .collect();

        forward_ids.sort();
        backward_ids.sort();
        assert_eq!(forward_ids, backward_ids);
        assert_eq!(forward_ids.len(), 15);
    }

    #[test]
    fn ancestor_membership_narrows_name_matches() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder()
            .with_query(Predicate::contains("name", "standard"))
            .with_query(Predicate::in_set("ancestors", "system"))
            .build()
            .unwrap();

        let results = client.execute(&query).unwrap();
        assert_eq!(results.total_count, 1);
        assert_eq!(results.hits[0].id, "standard-1");
    }

    #[test]
    fn filters_narrow_without_changing_scores() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let unfiltered = client
            .execute(
                &builder()
                    .with_query(Predicate::contains("name", "media"))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let filtered = client
            .execute(
                &builder()
                    .with_query(Predicate::contains("name", "media"))
                    .with_filter(Predicate::equals("language", "en"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(unfiltered.total_count, 15);
        assert_eq!(filtered.total_count, 10);

        let unfiltered_scores: HashMap<String, f32> = unfiltered
            .hits
            .iter()
            .map(|h| (h.id.clone(), h.score))
            .collect();
        for hit in &filtered.hits {
            assert_eq!(hit.language, "en");
            let baseline = unfiltered_scores[&hit.id];
            assert!(
                (hit.score - baseline).abs() < f32::EPSILON,
                "filter moved score of {}: {} vs {baseline}",
                hit.id,
                hit.score
            );
        }
    }

    #[test]
    fn facet_selection_filters_but_keeps_own_facet_complete() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder()
            .with_query(media_or_fda())
            .facet_on("language")
            .with_facet_selection("language", "da")
            .build()
            .unwrap();

        let results = client.execute(&query).unwrap();

        // The selection narrows hits and total...
        assert_eq!(results.total_count, 5);
        assert!(results.hits.iter().all(|h| h.language == "da"));

        // ...but the language facet still shows the alternative value.
        let languages = &results.facets["language"];
        assert_eq!(languages.len(), 2);
        assert_eq!(results.facet_total("language"), 25);
    }

    #[test]
    fn selections_on_other_fields_do_constrain_a_facet() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder()
            .with_query(media_or_fda())
            .facet_on("language")
            .with_facet_selection("template", "Report")
            .build()
            .unwrap();

        let results = client.execute(&query).unwrap();

        assert_eq!(results.total_count, 10);
        let languages = &results.facets["language"];
        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].value, "en");
        assert_eq!(languages[0].count, 10);
    }

    #[test]
    fn empty_regex_pattern_matches_nothing() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder()
            .with_query(Predicate::matches("name", ""))
            .build()
            .unwrap();

        let results = client.execute(&query).unwrap();
        assert_eq!(results.total_count, 0);
        assert!(results.hits.is_empty());
    }

    #[test]
    fn regex_matches_indexed_terms() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder()
            .with_query(Predicate::matches("name", "med.*"))
            .build()
            .unwrap();

        let results = client.execute(&query).unwrap();
        assert_eq!(results.total_count, 15);
    }

    #[test]
    fn exact_fuzzy_threshold_equals_equality() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let by_equality = client
            .execute(
                &builder()
                    .with_query(Predicate::equals("name", "zephyr"))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let by_fuzzy = client
            .execute(
                &builder()
                    .with_query(Predicate::fuzzy_like("name", "zephyr", 1.0))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let equality_ids: Vec<&str> = by_equality.hits.iter().map(|h| h.id.as_str()).collect();
        let fuzzy_ids: Vec<&str> = by_fuzzy.hits.iter().map(|h| h.id.as_str()).collect();

        assert_eq!(equality_ids, vec!["zephyr"]);
        assert_eq!(fuzzy_ids, equality_ids);
    }

    #[test]
    fn loose_fuzzy_threshold_widens_the_match_set() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder()
            .with_query(Predicate::fuzzy_like("name", "zephyr", 0.5))
            .build()
            .unwrap();

        let results = client.execute(&query).unwrap();
        let mut ids: Vec<&str> = results.hits.iter().map(|h| h.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["zephyr", "zephyrx"]);
    }

    #[test]
    fn open_nonexistent_index_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let result = IndexClient::open(&missing, &ClientOptions::default());
        assert!(matches!(result, Err(IndexError::Unavailable { .. })));
    }

    #[test]
    fn exhausted_deadline_times_out() {
        let temp = TempDir::new().unwrap();
        let mut writer = IndexWriter::open(temp.path()).unwrap();
        writer.add_items(&corpus()).unwrap();
        writer.commit().unwrap();

        let options = ClientOptions {
            timeout: Duration::ZERO,
            ..ClientOptions::default()
        };
        let client = IndexClient::open(temp.path(), &options).unwrap();

        let query = builder().with_query(media_or_fda()).build().unwrap();
        let result = client.execute(&query);

        assert!(matches!(result, Err(IndexError::Timeout { .. })));
    }

    #[test]
    fn queryless_execution_matches_everything() {
        let temp = TempDir::new().unwrap();
        let client = fixture(&temp);

        let query = builder()
            .with_filter(Predicate::equals("template", "Misc"))
            .build()
            .unwrap();

        let results = client.execute(&query).unwrap();
        assert_eq!(results.total_count, 2);
    }
}
