use std::fs;

use anyhow::{Context, Result, bail};
use mongodb::Client;
use mongodb::IndexModel;
use mongodb::bson::{Document, doc};
use serde_json::json;

use super::{Cli, Command, ConfigCommand, FilterArgs, Printer, ReadArgs};
use crate::bson::{
    ExtendedJsonMode, normalize_update, parse_document_from_json, parse_field_list,
    parse_key_spec, parse_pipeline_from_json, projection_from_fields,
};
use crate::connection::{
    ConnectionManager, ExplainFindRequest, FindDocumentsOptions, IndexSpec, Page, WriteScope,
};
use crate::models::{ConnectionTarget, parse_books, sample_books};
use crate::reports::Report;
use crate::state::{AppSettings, ConfigManager};

/// Execute one parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigManager::with_file(path)?,
        None => ConfigManager::new()?,
    };
    let mut settings = config.load_settings()?;
    apply_overrides(&mut settings, &cli);

    let printer = Printer::new(settings.output.json_mode, settings.output.layout);

    match cli.command {
        Command::Config { action } => run_config(&config, &settings, action, &printer),
        Command::Reports => {
            for report in Report::ALL {
                println!("{:<20} {}", report.name(), report.description());
            }
            Ok(())
        }
        command => {
            let target = settings.connection.target();
            let manager = ConnectionManager::with_timeout(settings.connection.connect_timeout())?;
            let client = manager.connect(&target)?;
            let session = Session {
                manager: &manager,
                client: &client,
                target: &target,
                printer,
                page_size: settings.query.page_size,
            };
            session.execute(command)
        }
    }
}

/// CLI flags and env vars win over the settings file.
fn apply_overrides(settings: &mut AppSettings, cli: &Cli) {
    if let Some(uri) = &cli.uri {
        settings.connection.uri = uri.clone();
    }
    if let Some(database) = &cli.database {
        settings.connection.database = database.clone();
    }
    if let Some(collection) = &cli.collection {
        settings.connection.collection = collection.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        settings.connection.connect_timeout_secs = secs;
    }
    if let Some(layout) = cli.output {
        settings.output.layout = layout;
    }
    if cli.canonical {
        settings.output.json_mode = ExtendedJsonMode::Canonical;
    }
}

fn run_config(
    config: &ConfigManager,
    settings: &AppSettings,
    action: ConfigCommand,
    printer: &Printer,
) -> Result<()> {
    let path = config.settings_path();
    match action {
        ConfigCommand::Show => printer.value(settings)?,
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            config.save_settings(settings)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Build find options from the read flags.
///
/// Paging is used when either `--page` or `--page-size` is given; the other
/// falls back to page 1 or the configured page size.
fn find_options(
    read: &ReadArgs,
    filter: Document,
    default_page_size: u64,
) -> crate::error::Result<(FindDocumentsOptions, Option<Page>)> {
    let projection = match (&read.projection, &read.fields) {
        (Some(text), _) => Some(parse_document_from_json(text)?),
        (None, Some(fields)) => Some(projection_from_fields(&parse_field_list(fields))),
        (None, None) => None,
    };
    let sort = read.sort.as_deref().map(parse_key_spec).transpose()?;

    let mut opts = FindDocumentsOptions {
        filter: Some(filter),
        sort,
        projection,
        skip: read.skip,
        limit: read.limit,
    };

    let page = if read.page.is_some() || read.page_size.is_some() {
        let page =
            Page::new(read.page.unwrap_or(1), read.page_size.unwrap_or(default_page_size))?;
        opts = opts.page(page);
        Some(page)
    } else {
        None
    };
    Ok((opts, page))
}

fn filter_or_none(filter: &FilterArgs) -> crate::error::Result<Option<Document>> {
    let doc = filter.to_document()?;
    Ok(if doc.is_empty() { None } else { Some(doc) })
}

fn index_summary(index: &IndexModel) -> Document {
    let mut summary = doc! { "key": index.keys.clone() };
    if let Some(options) = &index.options {
        if let Some(name) = &options.name {
            summary.insert("name", name.as_str());
        }
        if let Some(unique) = options.unique {
            summary.insert("unique", unique);
        }
    }
    summary
}

struct Session<'a> {
    manager: &'a ConnectionManager,
    client: &'a Client,
    target: &'a ConnectionTarget,
    printer: Printer,
    page_size: u64,
}

impl Session<'_> {
    fn execute(&self, command: Command) -> Result<()> {
        let (manager, client) = (self.manager, self.client);
        let (db, coll) = (self.target.database.as_str(), self.target.collection.as_str());

        match command {
            Command::Ping => {
                let elapsed = manager.ping(client)?;
                self.printer.value(&json!({ "ok": 1, "round_trip_ms": elapsed.as_millis() }))?;
            }
            Command::Find { filter, read } => {
                let filter = filter.to_document()?;
                let (opts, page) = find_options(&read, filter.clone(), self.page_size)?;
                let docs = manager.find_documents(client, db, coll, opts)?;
                self.printer.documents(&docs)?;
                if let Some(page) = page {
                    let total = manager.count_documents(client, db, coll, filter)?;
                    eprintln!(
                        "page {} of {} ({} matching)",
                        page.number(),
                        Page::count(total, page.size()),
                        total
                    );
                }
            }
            Command::Count { filter } => {
                let count = manager.count_documents(client, db, coll, filter.to_document()?)?;
                self.printer.value(&json!({ "count": count }))?;
            }
            Command::Update { filter, set, many } => {
                let update = normalize_update(parse_document_from_json(&set)?)?;
                let scope = if many { WriteScope::Many } else { WriteScope::One };
                let summary = manager.update_documents(
                    client,
                    db,
                    coll,
                    filter.to_document()?,
                    update,
                    scope,
                )?;
                self.printer.value(&summary)?;
            }
            Command::Delete { filter, many } => {
                let scope = if many { WriteScope::Many } else { WriteScope::One };
                let deleted =
                    manager.delete_documents(client, db, coll, filter.to_document()?, scope)?;
                self.printer.value(&json!({ "deleted": deleted }))?;
            }
            Command::Aggregate { pipeline, pipeline_file } => {
                let text = match (pipeline, pipeline_file) {
                    (Some(text), _) => text,
                    (None, Some(path)) => fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                    (None, None) => bail!("A pipeline is required"),
                };
                let pipeline = parse_pipeline_from_json(&text)?;
                let docs = manager.aggregate_pipeline(client, db, coll, pipeline)?;
                self.printer.documents(&docs)?;
            }
            Command::Report { report, filter } => {
                let docs = manager.run_report(client, db, coll, report, filter_or_none(&filter)?)?;
                self.printer.documents(&docs)?;
            }
            Command::CreateIndex { keys, name, unique } => {
                let spec = IndexSpec { keys: parse_key_spec(&keys)?, name, unique };
                let name = manager.create_index(client, db, coll, &spec)?;
                self.printer.value(&json!({ "index": name }))?;
            }
            Command::ListIndexes => {
                let indexes = manager.list_indexes(client, db, coll)?;
                let summaries: Vec<Document> = indexes.iter().map(index_summary).collect();
                self.printer.documents(&summaries)?;
            }
            Command::DropIndex { name } => {
                manager.drop_index(client, db, coll, &name)?;
                self.printer.value(&json!({ "dropped": name }))?;
            }
            Command::Explain { filter, read, pipeline, verbosity } => {
                let plan = match pipeline {
                    Some(text) => {
                        let mut stages = Vec::new();
                        if let Some(filter) = filter_or_none(&filter)? {
                            stages.push(doc! { "$match": filter });
                        }
                        stages.extend(parse_pipeline_from_json(&text)?);
                        manager.explain_aggregation(client, db, coll, stages, verbosity)?
                    }
                    None => {
                        let (opts, _) =
                            find_options(&read, filter.to_document()?, self.page_size)?;
                        let request = ExplainFindRequest {
                            database: db.to_string(),
                            collection: coll.to_string(),
                            filter: opts.filter,
                            sort: opts.sort,
                            projection: opts.projection,
                            skip: opts.skip,
                            limit: opts.limit,
                            verbosity,
                        };
                        manager.explain_find(client, request)?
                    }
                };
                self.printer.document(&plan)?;
            }
            Command::Seed { file, drop } => {
                let books = match file {
                    Some(path) => parse_books(
                        &fs::read_to_string(&path)
                            .with_context(|| format!("Failed to read {}", path.display()))?,
                    )?,
                    None => sample_books()?,
                };
                let inserted = manager.seed_books(client, db, coll, &books, drop)?;
                self.printer.value(&json!({ "inserted": inserted }))?;
            }
            Command::Reports | Command::Config { .. } => {
                bail!("this command does not use a connection")
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn find_options_pages_with_configured_size() {
        let read = ReadArgs { page: Some(3), ..Default::default() };
        let (opts, page) = find_options(&read, Document::new(), 5).unwrap();
        assert_eq!(page, Some(Page::new(3, 5).unwrap()));
        assert_eq!((opts.skip, opts.limit), (Some(10), Some(5)));
    }

    #[test]
    fn find_options_without_paging_keeps_raw_bounds() {
        let read = ReadArgs { skip: Some(2), limit: Some(4), ..Default::default() };
        let (opts, page) = find_options(&read, Document::new(), 5).unwrap();
        assert!(page.is_none());
        assert_eq!((opts.skip, opts.limit), (Some(2), Some(4)));
    }

    #[test]
    fn find_options_builds_projection_and_sort() {
        let read = ReadArgs {
            fields: Some("title,author,price".into()),
            sort: Some("price:-1".into()),
            ..Default::default()
        };
        let (opts, _) = find_options(&read, doc! { "in_stock": true }, 5).unwrap();
        assert_eq!(
            opts.projection,
            Some(doc! { "title": 1, "author": 1, "price": 1, "_id": 0 })
        );
        assert_eq!(opts.sort, Some(doc! { "price": -1 }));
        assert_eq!(opts.filter, Some(doc! { "in_stock": true }));
    }

    #[test]
    fn find_options_rejects_page_zero() {
        let read = ReadArgs { page: Some(0), ..Default::default() };
        assert!(find_options(&read, Document::new(), 5).is_err());
    }

    #[test]
    fn overrides_take_precedence_over_settings() {
        let cli = Cli::parse_from([
            "bookstore",
            "--database",
            "shop",
            "--timeout-secs",
            "3",
            "--canonical",
            "--output",
            "lines",
            "ping",
        ]);
        let mut settings = AppSettings::default();
        apply_overrides(&mut settings, &cli);
        assert_eq!(settings.connection.database, "shop");
        assert_eq!(settings.connection.collection, "books");
        assert_eq!(settings.connection.connect_timeout_secs, 3);
        assert_eq!(settings.output.json_mode, ExtendedJsonMode::Canonical);
        assert_eq!(settings.output.layout, crate::bson::OutputLayout::Lines);
    }
}
