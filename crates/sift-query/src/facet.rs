//! Encoding and decoding of facet selections in URL query strings.
//!
//! Facet selections round-trip through flat key-value parameters: a key is
//! the literal prefix `facet` followed by the field name, and the value is
//! the selected facet value. `facetLanguage=en` selects `en` on the
//! `language` facet (field names keep whatever casing the caller used, minus
//! the prefix).

use crate::builder::FacetSelection;

/// Literal prefix marking a query-string parameter as a facet selection.
pub const FACET_PREFIX: &str = "facet";

/// Extracts facet selections from ordered query-string pairs.
///
/// Keys without the `facet` prefix, and the bare key `facet` itself, are
/// ignored. Order is preserved.
pub fn decode<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<FacetSelection>
where
    K: AsRef<str>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .filter_map(|(key, value)| {
            let field = key.as_ref().strip_prefix(FACET_PREFIX)?;
            if field.is_empty() {
                return None;
            }
            Some(FacetSelection {
                field: field.to_string(),
                value: value.into(),
            })
        })
        .collect()
}

/// Appends facet selections to `base_url` as `facet<Field>=<Value>` pairs.
///
/// Uses `?` for the first parameter when the base URL has no query string
/// yet, `&` otherwise. Field and value strings must not contain the
/// delimiters `?`, `&`, or `=`.
pub fn encode(base_url: &str, selections: &[FacetSelection]) -> String {
    let mut url = base_url.to_string();
    for selection in selections {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(FACET_PREFIX);
        url.push_str(&selection.field);
        url.push('=');
        url.push_str(&selection.value);
    }
    url
}
