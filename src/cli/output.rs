use std::io::{self, Write};

use mongodb::bson::Document;
use serde::Serialize;

use crate::bson::{ExtendedJsonMode, OutputLayout, format_document};

/// Writes results to stdout in the selected Extended JSON flavour.
#[derive(Clone, Copy, Debug, Default)]
pub struct Printer {
    pub mode: ExtendedJsonMode,
    pub layout: OutputLayout,
}

impl Printer {
    pub fn new(mode: ExtendedJsonMode, layout: OutputLayout) -> Self {
        Self { mode, layout }
    }

    pub fn documents(&self, docs: &[Document]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        for doc in docs {
            writeln!(out, "{}", format_document(doc, self.mode, self.layout))?;
        }
        out.flush()
    }

    pub fn document(&self, doc: &Document) -> io::Result<()> {
        self.documents(std::slice::from_ref(doc))
    }

    /// Print a plain serializable value such as a write summary.
    pub fn value<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let rendered = match self.layout {
            OutputLayout::Pretty => serde_json::to_string_pretty(value),
            OutputLayout::Lines => serde_json::to_string(value),
        }
        .map_err(io::Error::other)?;
        let mut out = io::stdout().lock();
        writeln!(out, "{rendered}")?;
        out.flush()
    }
}
