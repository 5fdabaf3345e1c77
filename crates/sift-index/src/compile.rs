//! Translation of predicates into Tantivy queries.
//!
//! Query-side predicates become scored Tantivy queries; filter-side
//! predicates are wrapped in a zero boost so they constrain the match set
//! without contributing to BM25 scores. Every predicate reaching this
//! module has already been validated by the query builder; translation
//! failures here are reported as errors rather than falling back to any
//! in-memory evaluation.

use tantivy::{
    Term,
    query::{
        AllQuery, BooleanQuery, BoostQuery, EmptyQuery, FuzzyTermQuery, Occur, PhraseQuery,
        Query, RegexQuery, TermQuery,
    },
    schema::IndexRecordOption,
    tokenizer::{TextAnalyzer, TokenStream},
};

use crate::{
    error::IndexError,
    schema::{IndexSchema, ResolvedField},
};
use sift_query::{Operator, Predicate, PredicateGroup, QueryError};

/// Maps a similarity threshold in `[0, 1]` to a Levenshtein edit distance.
///
/// `1.0` demands an exact term; lower thresholds allow one, then two edits.
fn fuzzy_distance(threshold: f32) -> u8 {
    if threshold >= 1.0 {
        0
    } else if threshold >= 0.75 {
        1
    } else {
        2
    }
}

/// Tokenizes text through the index analyzer.
fn tokenize(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while let Some(token) = stream.next() {
        tokens.push(token.text.clone());
    }
    tokens
}

/// Compiles predicate groups into Tantivy queries.
pub(crate) struct PredicateCompiler {
    /// Schema with field handles.
    schema: IndexSchema,
    /// Analyzer applied to `contains` and `fuzzy-like` operands.
    analyzer: TextAnalyzer,
}

impl PredicateCompiler {
    /// Creates a compiler over the given schema and analyzer.
    pub(crate) fn new(schema: IndexSchema, analyzer: TextAnalyzer) -> Self {
        Self { schema, analyzer }
    }

    /// Compiles the conjunction of several groups into one scored query.
    ///
    /// An empty slice compiles to a match-all query.
    pub(crate) fn conjunction(
        &mut self,
        groups: &[PredicateGroup],
    ) -> Result<Box<dyn Query>, IndexError> {
        match groups.len() {
            0 => Ok(Box::new(AllQuery)),
            1 => self.group(&groups[0]),
            _ => {
                let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(groups.len());
                for group in groups {
                    clauses.push((Occur::Must, self.group(group)?));
                }
                Ok(Box::new(BooleanQuery::new(clauses)))
            }
        }
    }

    /// Compiles a single predicate group.
    pub(crate) fn group(&mut self, group: &PredicateGroup) -> Result<Box<dyn Query>, IndexError> {
        match group {
            PredicateGroup::Leaf(predicate) => self.predicate(predicate),
            PredicateGroup::All(groups) => {
                if groups.is_empty() {
                    return Ok(Box::new(AllQuery));
                }
                let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(groups.len());
                for inner in groups {
                    clauses.push((Occur::Must, self.group(inner)?));
                }
                Ok(Box::new(BooleanQuery::new(clauses)))
            }
            PredicateGroup::Any(groups) => {
                if groups.is_empty() {
                    return Ok(Box::new(EmptyQuery));
                }
                let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(groups.len());
                for inner in groups {
                    clauses.push((Occur::Should, self.group(inner)?));
                }
                Ok(Box::new(BooleanQuery::new(clauses)))
            }
        }
    }

    /// Compiles a single predicate.
    fn predicate(&mut self, predicate: &Predicate) -> Result<Box<dyn Query>, IndexError> {
        let Some(resolved) = self.schema.resolve(&predicate.field) else {
            return Err(QueryError::InvalidPredicate {
                field: predicate.field.clone(),
                message: "unknown field".to_string(),
            }
            .into());
        };

        match (resolved, &predicate.operator) {
            (ResolvedField::Text { exact, .. }, Operator::Equals(value)) => {
                let term = Term::from_field_text(exact, &value.to_lowercase());
                Ok(Box::new(TermQuery::new(term, IndexRecordOption::Basic)))
            }
            (ResolvedField::Text { terms, .. }, Operator::Contains(value)) => {
                let tokens = tokenize(&mut self.analyzer, value);
                Ok(self.term_sequence(terms, &tokens))
            }
            (ResolvedField::Text { terms, .. }, Operator::Matches(pattern)) => {
                if pattern.is_empty() {
                    // An empty pattern matches nothing, by contract.
                    return Ok(Box::new(EmptyQuery));
                }
                let query = RegexQuery::from_pattern(pattern, terms)
                    .map_err(|e| IndexError::execute(&e))?;
                Ok(Box::new(query))
            }
            (ResolvedField::Text { terms, .. }, Operator::FuzzyLike { value, threshold }) => {
                let distance = fuzzy_distance(*threshold);
                let tokens = tokenize(&mut self.analyzer, value);
                if tokens.is_empty() {
                    return Ok(Box::new(EmptyQuery));
                }
                let clauses: Vec<(Occur, Box<dyn Query>)> = tokens
                    .iter()
                    .map(|token| {
                        let term = Term::from_field_text(terms, token);
                        let query: Box<dyn Query> =
                            Box::new(FuzzyTermQuery::new(term, distance, true));
                        (Occur::Must, query)
                    })
                    .collect();
                if clauses.len() == 1 {
                    let (_, single) = clauses.into_iter().next().expect("length checked");
                    Ok(single)
                } else {
                    Ok(Box::new(BooleanQuery::new(clauses)))
                }
            }
            (ResolvedField::Keyword(field), Operator::Equals(value)) => {
                let term = Term::from_field_text(field, value);
                Ok(Box::new(TermQuery::new(term, IndexRecordOption::Basic)))
            }
            (ResolvedField::Set(field), Operator::InSet(value)) => {
                let term = Term::from_field_text(field, value);
                Ok(Box::new(TermQuery::new(term, IndexRecordOption::Basic)))
            }
            (_, operator) => Err(QueryError::UnsupportedPredicate {
                field: predicate.field.clone(),
                message: format!("operator `{}` has no index translation", operator.name()),
            }
            .into()),
        }
    }

    /// Builds a term or phrase query from analyzed tokens.
    fn term_sequence(&self, field: tantivy::schema::Field, tokens: &[String]) -> Box<dyn Query> {
        match tokens.len() {
            0 => Box::new(EmptyQuery),
            1 => Box::new(TermQuery::new(
                Term::from_field_text(field, &tokens[0]),
                IndexRecordOption::WithFreqs,
            )),
            _ => {
                let terms: Vec<Term> = tokens
                    .iter()
                    .map(|t| Term::from_field_text(field, t))
                    .collect();
                Box::new(PhraseQuery::new(terms))
            }
        }
    }
}

/// Wraps a query in a zero boost so it cannot contribute to scores.
pub(crate) fn unscored(query: Box<dyn Query>) -> Box<dyn Query> {
    Box::new(BoostQuery::new(query, 0.0))
}
