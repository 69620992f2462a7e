//! Command-line surface: one subcommand per operation.

mod output;
mod runner;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use mongodb::bson::Document;

use crate::bson::{OutputLayout, parse_filter};
use crate::connection::ExplainVerbosity;
use crate::error::Result;
use crate::models::{BookFilter, merge_filters};
use crate::reports::Report;

pub use output::Printer;
pub use runner::run;

#[derive(Debug, Parser)]
#[command(
    name = "bookstore",
    version,
    about = "Query and maintain a bookstore inventory in MongoDB"
)]
pub struct Cli {
    /// MongoDB connection string
    #[arg(long, global = true, env = "BOOKSTORE_URI")]
    pub uri: Option<String>,

    /// Database holding the inventory
    #[arg(long, global = true, env = "BOOKSTORE_DATABASE")]
    pub database: Option<String>,

    /// Collection holding the books
    #[arg(long, global = true, env = "BOOKSTORE_COLLECTION")]
    pub collection: Option<String>,

    /// Settings file to use instead of the platform default
    #[arg(long, global = true, env = "BOOKSTORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seconds to wait for the server when connecting
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// How documents are printed
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputLayout>,

    /// Print canonical instead of relaxed Extended JSON
    #[arg(long, global = true)]
    pub canonical: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Predicate flags shared by the read and write commands.
///
/// The raw `--filter` and the typed flags are combined with `$and`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Filter document in shell syntax, e.g. '{ genre: "Fiction" }'
    #[arg(long)]
    pub filter: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    /// Only books published after this year
    #[arg(long)]
    pub published_after: Option<i32>,
    /// Only books published before this year
    #[arg(long)]
    pub published_before: Option<i32>,
    /// Only books in stock
    #[arg(long)]
    pub in_stock: bool,
    /// Only books out of stock
    #[arg(long, conflicts_with = "in_stock")]
    pub out_of_stock: bool,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
}

impl FilterArgs {
    pub fn book_filter(&self) -> BookFilter {
        let in_stock = match (self.in_stock, self.out_of_stock) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        BookFilter {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            published_after: self.published_after,
            published_before: self.published_before,
            in_stock,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }

    /// The combined filter document; empty when nothing was given.
    pub fn to_document(&self) -> Result<Document> {
        let raw = parse_filter(self.filter.as_deref())?;
        Ok(merge_filters(raw, self.book_filter().to_document()))
    }
}

/// Sort, projection and paging flags for reads.
#[derive(Debug, Clone, Default, Args)]
pub struct ReadArgs {
    /// Projection document, e.g. '{ title: 1, price: 1, _id: 0 }'
    #[arg(long, conflicts_with = "fields")]
    pub projection: Option<String>,
    /// Comma-separated fields to return (`_id` hidden unless listed)
    #[arg(long)]
    pub fields: Option<String>,
    /// Sort keys, e.g. `price:-1` or `author:1,published_year:desc`
    #[arg(long)]
    pub sort: Option<String>,
    /// 1-based page number
    #[arg(long)]
    pub page: Option<u64>,
    /// Documents per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<u64>,
    #[arg(long, conflicts_with = "page")]
    pub skip: Option<u64>,
    #[arg(long, conflicts_with = "page")]
    pub limit: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the server answers
    Ping,
    /// Read matching books
    Find {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        read: ReadArgs,
    },
    /// Count matching books
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Assign fields on the first (or every) matching book
    Update {
        #[command(flatten)]
        filter: FilterArgs,
        /// Assignments such as '{ price: 12.99 }', or an operator document
        #[arg(long)]
        set: String,
        /// Update every match instead of the first
        #[arg(long)]
        many: bool,
    },
    /// Remove the first (or every) matching book
    Delete {
        #[command(flatten)]
        filter: FilterArgs,
        /// Delete every match instead of the first
        #[arg(long)]
        many: bool,
    },
    /// Run an aggregation pipeline
    Aggregate {
        /// Pipeline as a JSON array of stages
        #[arg(long, required_unless_present = "pipeline_file")]
        pipeline: Option<String>,
        /// Read the pipeline from a file
        #[arg(long, conflicts_with = "pipeline")]
        pipeline_file: Option<PathBuf>,
    },
    /// Run a named inventory report
    Report {
        #[arg(value_enum)]
        report: Report,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List the named reports
    Reports,
    /// Create a (possibly compound) index
    CreateIndex {
        /// Keys in order, e.g. `title` or `author:1,published_year:-1`
        keys: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        unique: bool,
    },
    /// List the collection's indexes
    ListIndexes,
    /// Drop an index by name
    DropIndex { name: String },
    /// Show the execution plan of a find or a pipeline
    Explain {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        read: ReadArgs,
        /// Explain this pipeline instead of a find
        #[arg(
            long,
            conflicts_with_all = [
                "projection", "fields", "sort", "page", "page_size", "skip", "limit",
            ]
        )]
        pipeline: Option<String>,
        #[arg(long, value_enum, default_value_t = ExplainVerbosity::ExecutionStats)]
        verbosity: ExplainVerbosity,
    },
    /// Insert books from a JSON array file (or the bundled sample inventory)
    Seed {
        #[arg(long)]
        file: Option<PathBuf>,
        /// Drop the collection first
        #[arg(long)]
        drop: bool,
    },
    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,
    /// Print the settings file location
    Path,
    /// Write the effective settings to the settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
