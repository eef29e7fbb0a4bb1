//! Cache Key Builder Module
//!
//! Canonical, order-independent cache key construction from a resource
//! name and a parameter map.

use serde_json::Value;

// == Build Key ==
/// Builds a deterministic cache key from a prefix and parameter entries.
///
/// Entries are sorted lexicographically by field name, rendered as
/// `field:value`, and joined with `|` behind `prefix:`. Two logically
/// identical parameter maps built in different field orders therefore
/// yield the same key, while any differing value yields a different key.
///
/// String values render without quotes; everything else renders as its
/// JSON text.
pub fn build_key<I, K>(prefix: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let mut entries: Vec<(String, Value)> = params
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let rendered: Vec<String> = entries
        .iter()
        .map(|(name, value)| format!("{}:{}", name, render_value(value)))
        .collect();

    format!("{}:{}", prefix, rendered.join("|"))
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
