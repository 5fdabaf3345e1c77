//! Predicates and boolean combinations of them.

use std::fmt;

/// A comparison operator together with its operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Exact match of the whole field value.
    Equals(String),
    /// Term containment as interpreted by the index analyzer.
    Contains(String),
    /// Regular-expression match against indexed terms. An empty pattern
    /// matches nothing.
    Matches(String),
    /// Edit-distance similarity match.
    FuzzyLike {
        /// The value to match approximately.
        value: String,
        /// Minimum similarity in `[0, 1]`; `1.0` means exact.
        threshold: f32,
    },
    /// Membership test against a set-valued field.
    InSet(String),
}

impl Operator {
    /// Short operator name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals(_) => "equals",
            Self::Contains(_) => "contains",
            Self::Matches(_) => "matches",
            Self::FuzzyLike { .. } => "fuzzy-like",
            Self::InSet(_) => "in-set",
        }
    }
}

/// A single immutable condition over a document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Name of the field the condition applies to.
    pub field: String,
    /// The comparison operator and operand.
    pub operator: Operator,
}

impl Predicate {
    /// Exact match: the field value equals `value`.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Equals(value.into()),
        }
    }

    /// Containment: the field contains the term `value` after analysis.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Contains(value.into()),
        }
    }

    /// Regular-expression match against the field's indexed terms.
    pub fn matches(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Matches(pattern.into()),
        }
    }

    /// Similarity match with a minimum similarity `threshold` in `[0, 1]`.
    pub fn fuzzy_like(
        field: impl Into<String>,
        value: impl Into<String>,
        threshold: f32,
    ) -> Self {
        Self {
            field: field.into(),
            operator: Operator::FuzzyLike {
                value: value.into(),
                threshold,
            },
        }
    }

    /// Membership: the set-valued field contains `value`.
    pub fn in_set(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::InSet(value.into()),
        }
    }

    /// Combines this predicate with another under AND.
    pub fn and(self, other: impl Into<PredicateGroup>) -> PredicateGroup {
        PredicateGroup::from(self).and(other)
    }

    /// Combines this predicate with another under OR.
    pub fn or(self, other: impl Into<PredicateGroup>) -> PredicateGroup {
        PredicateGroup::from(self).or(other)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operator {
            Operator::Equals(v) => write!(f, "{} == {v:?}", self.field),
            Operator::Contains(v) => write!(f, "{} contains {v:?}", self.field),
            Operator::Matches(p) => write!(f, "{} matches /{p}/", self.field),
            Operator::FuzzyLike { value, threshold } => {
                write!(f, "{} ~ {value:?} (>= {threshold})", self.field)
            }
            Operator::InSet(v) => write!(f, "{} has {v:?}", self.field),
        }
    }
}

/// A boolean combination of predicates.
///
/// Combining methods return a new group and never mutate the receiver, so a
/// partial chain can be reused as the base for several queries.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateGroup {
    /// A single predicate.
    Leaf(Predicate),
    /// Conjunction: every sub-group must match.
    All(Vec<PredicateGroup>),
    /// Disjunction: at least one sub-group must match.
    Any(Vec<PredicateGroup>),
}

impl PredicateGroup {
    /// Creates a conjunction, flattening nested `All` groups.
    pub fn all(groups: Vec<Self>) -> Self {
        let flattened: Vec<Self> = groups
            .into_iter()
            .flat_map(|g| match g {
                Self::All(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            1 => flattened.into_iter().next().expect("length checked"),
            _ => Self::All(flattened),
        }
    }

    /// Creates a disjunction, flattening nested `Any` groups.
    pub fn any(groups: Vec<Self>) -> Self {
        let flattened: Vec<Self> = groups
            .into_iter()
            .flat_map(|g| match g {
                Self::Any(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            1 => flattened.into_iter().next().expect("length checked"),
            _ => Self::Any(flattened),
        }
    }

    /// Returns a new group requiring both this group and `other` to match.
    #[must_use]
    pub fn and(&self, other: impl Into<Self>) -> Self {
        Self::all(vec![self.clone(), other.into()])
    }

    /// Returns a new group requiring this group or `other` to match.
    #[must_use]
    pub fn or(&self, other: impl Into<Self>) -> Self {
        Self::any(vec![self.clone(), other.into()])
    }

    /// Iterates over every predicate in the group, depth first.
    pub fn predicates(&self) -> Vec<&Predicate> {
        let mut out = Vec::new();
        self.collect_predicates(&mut out);
        out
    }

    /// Recursive helper for [`predicates`](Self::predicates).
    fn collect_predicates<'a>(&'a self, out: &mut Vec<&'a Predicate>) {
        match self {
            Self::Leaf(p) => out.push(p),
            Self::All(groups) | Self::Any(groups) => {
                for group in groups {
                    group.collect_predicates(out);
                }
            }
        }
    }
}

impl From<Predicate> for PredicateGroup {
    fn from(predicate: Predicate) -> Self {
        Self::Leaf(predicate)
    }
}
