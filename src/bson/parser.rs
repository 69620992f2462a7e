//! Parsing of relaxed mongo-shell JSON into BSON.
//!
//! Input is read with `json5`, which accepts what people usually type into the
//! shell: unquoted keys, single-quoted strings and trailing commas. The
//! resulting JSON value is converted through Extended JSON, so `{"$oid": ..}`,
//! `{"$date": ..}` and friends keep their BSON types.

use mongodb::bson::{Bson, Document};
use serde_json::Value;

use crate::error::{Error, Result};

fn parse_value(input: &str) -> Result<Value> {
    json5::from_str::<Value>(input).map_err(|e| Error::Parse(e.to_string()))
}

fn value_to_document(value: Value, what: &str) -> Result<Document> {
    match Bson::try_from(value).map_err(|e| Error::Parse(e.to_string()))? {
        Bson::Document(doc) => Ok(doc),
        other => Err(Error::Parse(format!("{what} must be a document, got {}", kind(&other)))),
    }
}

fn kind(value: &Bson) -> &'static str {
    match value {
        Bson::Array(_) => "an array",
        Bson::String(_) => "a string",
        Bson::Boolean(_) => "a boolean",
        Bson::Null => "null",
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => "a number",
        _ => "a scalar",
    }
}

/// Parse a relaxed JSON string into a BSON document.
pub fn parse_document_from_json(input: &str) -> Result<Document> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::Parse("Document is empty".into()));
    }
    value_to_document(parse_value(trimmed)?, "Root JSON")
}

/// Parse an optional filter; a missing or blank filter matches every document.
pub fn parse_filter(input: Option<&str>) -> Result<Document> {
    match input.map(str::trim) {
        None | Some("") => Ok(Document::new()),
        Some(text) => parse_document_from_json(text),
    }
}

/// Parse JSON as either a single document or an array of documents.
pub fn parse_documents_from_json(input: &str) -> Result<Vec<Document>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::Parse("Input is empty".into()));
    }

    match parse_value(trimmed)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| value_to_document(item, &format!("Array item {i}")))
            .collect(),
        value @ Value::Object(_) => Ok(vec![value_to_document(value, "Root JSON")?]),
        _ => Err(Error::Parse("Root JSON must be a document or array of documents".into())),
    }
}

/// Parse an aggregation pipeline: an array of stage documents.
///
/// A single stage document is accepted as a one-stage pipeline.
pub fn parse_pipeline_from_json(input: &str) -> Result<Vec<Document>> {
    let stages = parse_documents_from_json(input)?;
    for (i, stage) in stages.iter().enumerate() {
        let Some(name) = stage.keys().next() else {
            return Err(Error::Parse(format!("Stage {i} is empty")));
        };
        if stage.len() != 1 || !name.starts_with('$') {
            return Err(Error::Parse(format!(
                "Stage {i} must have exactly one `$`-prefixed operator"
            )));
        }
    }
    Ok(stages)
}
