//! Rendering of result documents as Extended JSON.

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// Extended JSON output mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtendedJsonMode {
    #[default]
    Relaxed,
    Canonical,
}

/// Layout of printed results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// One pretty-printed document after another
    #[default]
    Pretty,
    /// One compact document per line
    Lines,
}

fn to_extjson(doc: &Document, mode: ExtendedJsonMode) -> serde_json::Value {
    let bson = Bson::Document(doc.clone());
    match mode {
        ExtendedJsonMode::Relaxed => bson.into_relaxed_extjson(),
        ExtendedJsonMode::Canonical => bson.into_canonical_extjson(),
    }
}

/// Format one document with the given mode and layout.
pub fn format_document(doc: &Document, mode: ExtendedJsonMode, layout: OutputLayout) -> String {
    let value = to_extjson(doc, mode);
    let rendered = match layout {
        OutputLayout::Pretty => serde_json::to_string_pretty(&value),
        OutputLayout::Lines => serde_json::to_string(&value),
    };
    rendered.unwrap_or_else(|_| format!("{doc:?}"))
}
