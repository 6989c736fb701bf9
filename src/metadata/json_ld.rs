//! JSON-LD Metadata Parsing
//!
//! Extracts headline, publication date and author from Schema.org JSON-LD
//! blocks. Article-like objects are ranked by nesting depth so a top-level
//! `BlogPosting` beats one nested inside a `WebPage`'s `@graph`.

use dom_query::{Document, Selection};
use serde_json::{Map, Value};

use crate::dom;
use crate::metadata::date::parse_date;
use crate::metadata::meta_tags::validate_metadata_name;
use crate::result::Metadata;

/// An article-typed JSON-LD object with its nesting depth.
#[derive(Debug, Clone)]
struct SchemaArticle {
    data: Map<String, Value>,
    depth: usize,
}

/// Extract metadata from JSON-LD scripts.
///
/// Fields already set on `original` are kept.
#[must_use]
pub fn extract_json_ld(doc: &Document, original: Metadata) -> Metadata {
    let mut result = original;
    let articles = decode_json_ld(doc);

    for article in &articles {
        if result.title.is_none() {
            result.title = get_single_string_value(&article.data, "headline")
                .or_else(|| get_single_string_value(&article.data, "name"))
                .map(|t| dom::collapse_whitespace(&t));
        }

        if result.date.is_none() {
            result.date = get_single_string_value(&article.data, "datePublished")
                .or_else(|| get_single_string_value(&article.data, "dateCreated"))
                .and_then(|d| parse_date(&d));
        }

        if result.author.is_none() {
            result.author = article.data.get("author").and_then(author_names);
        }
    }

    result
}

/// Parse every JSON-LD script and collect article objects, shallowest first.
fn decode_json_ld(doc: &Document) -> Vec<SchemaArticle> {
    let mut articles = Vec::new();

    for script in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let script_sel = Selection::from(*script);
        let json_text = dom::text_content(&script_sel).trim().to_string();
        if json_text.is_empty() {
            continue;
        }

        let data: Value = match serde_json::from_str(&json_text) {
            Ok(v) => v,
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed JSON-LD block");
                continue;
            }
        };

        collect_articles(&data, 0, &mut articles);
    }

    articles.sort_by_key(|a| a.depth);
    articles
}

fn collect_articles(value: &Value, depth: usize, articles: &mut Vec<SchemaArticle>) {
    match value {
        Value::Object(map) => {
            let types = get_schema_types(value);
            if is_article_type(&types) {
                articles.push(SchemaArticle {
                    data: map.clone(),
                    depth,
                });
            }
            for (key, val) in map {
                // Authors and publishers are read from their parent article.
                if key == "author" || key == "publisher" {
                    continue;
                }
                collect_articles(val, depth + 1, articles);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                collect_articles(item, depth, articles);
            }
        }
        _ => {}
    }
}

/// Lowercased `@type` values of a schema object.
fn get_schema_types(value: &Value) -> Vec<String> {
    match value.get("@type") {
        Some(Value::String(s)) => vec![s.to_lowercase()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_lowercase)
            .collect(),
        _ => Vec::new(),
    }
}

fn is_article_type(types: &[String]) -> bool {
    types.iter().any(|t| {
        matches!(
            t.as_str(),
            "article" | "newsarticle" | "blogposting" | "report" | "techarticle"
                | "scholarlyarticle" | "socialmediaposting"
        )
    })
}

/// Author value as a comma-separated name list.
fn author_names(value: &Value) -> Option<String> {
    let names: Vec<String> = match value {
        Value::Array(arr) => arr.iter().filter_map(person_name).collect(),
        other => person_name(other).into_iter().collect(),
    };
    let names: Vec<String> = names.into_iter().filter(|n| validate_metadata_name(n)).collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

fn person_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(dom::collapse_whitespace(s)).filter(|s| !s.is_empty()),
        Value::Object(map) => {
            if let Some(name) = get_single_string_value(map, "name") {
                return Some(dom::collapse_whitespace(&name));
            }
            let given = map.get("givenName").and_then(Value::as_str).unwrap_or("");
            let family = map.get("familyName").and_then(Value::as_str).unwrap_or("");
            let full = format!("{} {}", given.trim(), family.trim()).trim().to_string();
            (!full.is_empty()).then_some(full)
        }
        _ => None,
    }
}

/// Get a single string value from an object property.
fn get_single_string_value(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Value::Array(arr) => arr
            .first()
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}
