//! Field registry used to validate predicates at build time.
//!
//! Instead of reflecting over documents at runtime, callers register each
//! searchable field with its kind. The builder consults the registry to
//! reject predicates the backend could not push down, so an unsupported
//! query fails before any execution work happens.

use std::collections::BTreeMap;

use crate::predicate::Operator;

/// How a field is indexed, which determines the operators it supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Analyzed text: supports equals, contains, regex, and fuzzy matching.
    Text,
    /// Single raw token: supports exact equality and faceting.
    Keyword,
    /// Multi-valued raw tokens: supports membership tests.
    Set,
}

impl FieldKind {
    /// Whether this kind of field can evaluate the given operator.
    pub fn supports(self, operator: &Operator) -> bool {
        match self {
            Self::Text => !matches!(operator, Operator::InSet(_)),
            Self::Keyword => matches!(operator, Operator::Equals(_)),
            Self::Set => matches!(operator, Operator::InSet(_)),
        }
    }

    /// Whether result-set-wide value counts can be computed for this kind.
    pub fn facetable(self) -> bool {
        matches!(self, Self::Keyword)
    }
}

/// Registry mapping field names to their kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSchema {
    /// Registered fields, ordered by name for stable iteration.
    fields: BTreeMap<String, FieldKind>,
}

impl SearchSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field, returning the extended schema.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Looks up the kind of a field, if registered.
    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Iterates over registered `(name, kind)` pairs in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;

    #[test]
    fn text_fields_support_scoring_operators() {
        for predicate in [
            Predicate::equals("name", "folder"),
            Predicate::contains("name", "standard"),
            Predicate::matches("name", "med.*"),
            Predicate::fuzzy_like("name", "dragn", 0.5),
        ] {
            assert!(FieldKind::Text.supports(&predicate.operator));
        }
        assert!(!FieldKind::Text.supports(&Predicate::in_set("name", "x").operator));
    }

    #[test]
    fn keyword_fields_only_support_equality() {
        assert!(FieldKind::Keyword.supports(&Predicate::equals("language", "en").operator));
        assert!(!FieldKind::Keyword.supports(&Predicate::contains("language", "e").operator));
        assert!(!FieldKind::Keyword.supports(&Predicate::matches("language", "e.*").operator));
    }

    #[test]
    fn set_fields_only_support_membership() {
        assert!(FieldKind::Set.supports(&Predicate::in_set("ancestors", "root").operator));
        assert!(!FieldKind::Set.supports(&Predicate::equals("ancestors", "root").operator));
    }

    #[test]
    fn only_keyword_fields_are_facetable() {
        assert!(FieldKind::Keyword.facetable());
        assert!(!FieldKind::Text.facetable());
        assert!(!FieldKind::Set.facetable());
    }

    #[test]
    fn lookup_finds_registered_fields() {
        let schema = SearchSchema::new()
            .with_field("name", FieldKind::Text)
            .with_field("language", FieldKind::Keyword);

        assert_eq!(schema.kind("name"), Some(FieldKind::Text));
        assert_eq!(schema.kind("language"), Some(FieldKind::Keyword));
        assert_eq!(schema.kind("missing"), None);
    }
}
