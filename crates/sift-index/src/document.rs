//! The document type stored in the index.

use serde::{Deserialize, Serialize};

/// A content item ready for indexing.
///
/// Items are flat: the hierarchy they live in is captured by `ancestors`,
/// the IDs of every item above this one, so subtree queries become simple
/// membership tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier.
    pub id: String,
    /// Display name; the primary search field.
    pub name: String,
    /// Path of the item within the content tree.
    pub path: String,
    /// IDs of all ancestor items, root first.
    #[serde(default)]
    pub ancestors: Vec<String>,
    /// Language the item is authored in.
    pub language: String,
    /// Name of the template the item was created from.
    pub template: String,
    /// Item content.
    #[serde(default)]
    pub body: String,
}
