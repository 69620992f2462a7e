// Book entity and typed filters

use mongodb::bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

use crate::bson::{get_f64, get_i64};
use crate::error::{Error, Result};

/// Sample inventory inserted by `seed` when no file is given.
pub const SAMPLE_BOOKS_JSON: &str = include_str!("../../data/books.json");

/// A book in the inventory collection.
///
/// The store enforces no schema; this type is only used at the ingestion
/// boundary and when callers want typed results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: f64,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        published_year: i32,
        price: f64,
        in_stock: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            published_year,
            price,
            in_stock,
            pages: None,
            publisher: None,
        }
    }

    /// Check the record before it is written.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in
            [("title", &self.title), ("author", &self.author), ("genre", &self.genre)]
        {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("`{field}` must not be empty")));
            }
        }
        if !(0..=9999).contains(&self.published_year) {
            return Err(Error::Validation(format!(
                "`published_year` {} is out of range",
                self.published_year
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::Validation(format!("`price` {} is not a valid price", self.price)));
        }
        if let Some(pages) = self.pages
            && pages <= 0
        {
            return Err(Error::Validation(format!("`pages` {pages} must be positive")));
        }
        Ok(())
    }

    /// Convert to the document shape stored in the collection.
    pub fn to_document(&self) -> Document {
        let mut doc = doc! {
            "title": self.title.as_str(),
            "author": self.author.as_str(),
            "genre": self.genre.as_str(),
            "published_year": self.published_year,
            "price": self.price,
            "in_stock": self.in_stock,
        };
        if let Some(pages) = self.pages {
            doc.insert("pages", pages);
        }
        if let Some(publisher) = &self.publisher {
            doc.insert("publisher", publisher.as_str());
        }
        doc
    }
}

impl TryFrom<&Document> for Book {
    type Error = Error;

    fn try_from(doc: &Document) -> Result<Self> {
        let text = |key: &str| {
            doc.get_str(key)
                .map(str::to_string)
                .map_err(|_| Error::Validation(format!("`{key}` must be a string")))
        };
        let published_year = get_i64(doc, "published_year")
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| Error::Validation("`published_year` must be an integer".into()))?;
        let price = get_f64(doc, "price")
            .ok_or_else(|| Error::Validation("`price` must be a number".into()))?;
        let in_stock = doc
            .get_bool("in_stock")
            .map_err(|_| Error::Validation("`in_stock` must be a boolean".into()))?;

        Ok(Self {
            title: text("title")?,
            author: text("author")?,
            genre: text("genre")?,
            published_year,
            price,
            in_stock,
            pages: get_i64(doc, "pages").and_then(|p| i32::try_from(p).ok()),
            publisher: doc.get_str("publisher").ok().map(str::to_string),
        })
    }
}

/// Parse and validate a JSON array of books.
pub fn parse_books(json: &str) -> Result<Vec<Book>> {
    let books: Vec<Book> = serde_json::from_str(json)?;
    for (i, book) in books.iter().enumerate() {
        book.validate().map_err(|e| match e {
            Error::Validation(msg) => Error::Validation(format!("record {i}: {msg}")),
            other => other,
        })?;
    }
    Ok(books)
}

/// The bundled sample inventory.
pub fn sample_books() -> Result<Vec<Book>> {
    parse_books(SAMPLE_BOOKS_JSON)
}

/// Typed predicate over the book fields.
///
/// Empty fields are ignored; set fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    /// Strictly after this year
    pub published_after: Option<i32>,
    /// Strictly before this year
    pub published_before: Option<i32>,
    pub in_stock: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl BookFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(title) = &self.title {
            filter.insert("title", title.as_str());
        }
        if let Some(author) = &self.author {
            filter.insert("author", author.as_str());
        }
        if let Some(genre) = &self.genre {
            filter.insert("genre", genre.as_str());
        }
        if let Some(in_stock) = self.in_stock {
            filter.insert("in_stock", in_stock);
        }

        let mut year = Document::new();
        if let Some(after) = self.published_after {
            year.insert("$gt", after);
        }
        if let Some(before) = self.published_before {
            year.insert("$lt", before);
        }
        if !year.is_empty() {
            filter.insert("published_year", year);
        }

        let mut price = Document::new();
        if let Some(min) = self.min_price {
            price.insert("$gte", min);
        }
        if let Some(max) = self.max_price {
            price.insert("$lte", max);
        }
        if !price.is_empty() {
            filter.insert("price", price);
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Combine two filters with `$and`, skipping empty ones.
pub fn merge_filters(left: Document, right: Document) -> Document {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right,
        (_, true) => left,
        _ => doc! { "$and": [Bson::Document(left), Bson::Document(right)] },
    }
}
