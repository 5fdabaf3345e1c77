//! Index schema for sift items.
//!
//! Two schema views exist side by side: the Tantivy [`IndexSchema`] with
//! concrete field handles, and the backend-independent
//! [`sift_query::SearchSchema`] registry the query builder validates
//! against. [`search_schema`] keeps the two in step.
//!
//! Text fields (`name`, `body`) are analyzed and carry a raw lowercase
//! companion (`name_exact`, `body_exact`) so whole-value equality can be
//! expressed as a single term lookup. Keyword fields (`id`, `path`,
//! `language`, `template`) are single raw tokens; `ancestors` is
//! multi-valued. `ordinal` records insertion order and breaks score ties so
//! pagination is deterministic.

use tantivy::schema::{
    FAST, Field, INDEXED, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing,
    TextOptions,
};

use crate::analyzer::SIFT_TOKENIZER;
use sift_query::{FieldKind, SearchSchema};

/// Handles to all fields in the index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Unique item identifier.
    pub id: Field,
    /// Item name, analyzed.
    pub name: Field,
    /// Whole item name, lowercased, as one raw token.
    pub name_exact: Field,
    /// Item path.
    pub path: Field,
    /// IDs of ancestor items, multi-valued.
    pub ancestors: Field,
    /// Item language.
    pub language: Field,
    /// Template name.
    pub template: Field,
    /// Item content, analyzed.
    pub body: Field,
    /// Whole item content, lowercased, as one raw token.
    pub body_exact: Field,
    /// Insertion order, used as a deterministic score tie-breaker.
    pub ordinal: Field,
}

/// A field handle resolved by name, carrying what a predicate needs.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ResolvedField {
    /// Analyzed text with a raw companion for whole-value equality.
    Text {
        /// Field holding analyzed terms.
        terms: Field,
        /// Field holding the whole lowercased value.
        exact: Field,
    },
    /// Single raw token.
    Keyword(Field),
    /// Multi-valued raw tokens.
    Set(Field),
}

impl IndexSchema {
    /// Creates the schema with all fields configured.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let analyzed = || {
            TextOptions::default()
                .set_indexing_options(
                    TextFieldIndexing::default()
                        .set_tokenizer(SIFT_TOKENIZER)
                        .set_index_option(IndexRecordOption::WithFreqsAndPositions),
                )
                .set_stored()
        };

        let id = builder.add_text_field("id", STRING | STORED);
        let name = builder.add_text_field("name", analyzed());
        let name_exact = builder.add_text_field("name_exact", STRING);
        let path = builder.add_text_field("path", STRING | STORED);
        let ancestors = builder.add_text_field("ancestors", STRING | STORED);
        let language = builder.add_text_field("language", STRING | STORED | FAST);
        let template = builder.add_text_field("template", STRING | STORED | FAST);
        let body = builder.add_text_field("body", analyzed());
        let body_exact = builder.add_text_field("body_exact", STRING);
        let ordinal = builder.add_u64_field("ordinal", STORED | INDEXED | FAST);

        let schema = builder.build();

        Self {
            schema,
            id,
            name,
            name_exact,
            path,
            ancestors,
            language,
            template,
            body,
            body_exact,
            ordinal,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resolves a query-facing field name to its index field handles.
    pub(crate) fn resolve(&self, name: &str) -> Option<ResolvedField> {
        match name {
            "name" => Some(ResolvedField::Text {
                terms: self.name,
                exact: self.name_exact,
            }),
            "body" => Some(ResolvedField::Text {
                terms: self.body,
                exact: self.body_exact,
            }),
            "id" => Some(ResolvedField::Keyword(self.id)),
            "path" => Some(ResolvedField::Keyword(self.path)),
            "language" => Some(ResolvedField::Keyword(self.language)),
            "template" => Some(ResolvedField::Keyword(self.template)),
            "ancestors" => Some(ResolvedField::Set(self.ancestors)),
            _ => None,
        }
    }

    /// Resolves a facetable field name to its keyword field handle.
    pub(crate) fn keyword(&self, name: &str) -> Option<Field> {
        match self.resolve(name)? {
            ResolvedField::Keyword(field) => Some(field),
            _ => None,
        }
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// The field registry matching [`IndexSchema`], for use with
/// [`sift_query::QueryBuilder`].
pub fn search_schema() -> SearchSchema {
    SearchSchema::new()
        .with_field("id", FieldKind::Keyword)
        .with_field("name", FieldKind::Text)
        .with_field("path", FieldKind::Keyword)
        .with_field("ancestors", FieldKind::Set)
        .with_field("language", FieldKind::Keyword)
        .with_field("template", FieldKind::Keyword)
        .with_field("body", FieldKind::Text)
}

#[cfg(test)]
mod tests {
    use tantivy::schema::FieldType;

    use super::*;

    #[test]
    fn schema_has_all_fields() {
        let schema = IndexSchema::new();
        for name in [
            "id",
            "name",
            "name_exact",
            "path",
            "ancestors",
            "language",
            "template",
            "body",
            "body_exact",
            "ordinal",
        ] {
            assert!(schema.schema().get_field(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn analyzed_fields_use_sift_tokenizer() {
        let schema = IndexSchema::new();

        for (name, field) in [("name", schema.name), ("body", schema.body)] {
            let entry = schema.schema().get_field_entry(field);
            assert!(entry.is_indexed(), "{name} should be indexed");
            assert!(entry.is_stored(), "{name} should be stored");

            if let FieldType::Str(opts) = entry.field_type() {
                let indexing = opts.get_indexing_options().unwrap();
                assert_eq!(indexing.tokenizer(), SIFT_TOKENIZER);
            } else {
                panic!("{name} field should be text type");
            }
        }
    }

    #[test]
    fn exact_companions_are_raw_and_unstored() {
        let schema = IndexSchema::new();

        for field in [schema.name_exact, schema.body_exact] {
            let entry = schema.schema().get_field_entry(field);
            assert!(entry.is_indexed());
            assert!(!entry.is_stored());

            if let FieldType::Str(opts) = entry.field_type() {
                assert_eq!(opts.get_indexing_options().unwrap().tokenizer(), "raw");
            } else {
                panic!("exact field should be text type");
            }
        }
    }

    #[test]
    fn registry_resolves_against_index_schema() {
        let schema = IndexSchema::new();
        for (name, _) in search_schema().fields() {
            assert!(
                schema.resolve(name).is_some(),
                "registry field {name} missing from index schema"
            );
        }
    }

    #[test]
    fn keyword_lookup_rejects_text_fields() {
        let schema = IndexSchema::new();
        assert!(schema.keyword("language").is_some());
        assert!(schema.keyword("name").is_none());
        assert!(schema.keyword("ancestors").is_none());
    }
}
