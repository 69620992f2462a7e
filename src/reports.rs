//! Named aggregation reports over the inventory.
//!
//! Each report is a fixed pipeline; the server does all of the work.

use mongodb::bson::{Document, doc};

/// The inventory reports available by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Report {
    /// Average price per genre, cheapest genre first
    AvgPriceByGenre,
    /// Author(s) with the most books; every author tied for first is returned
    TopAuthors,
    /// Book count per publication decade
    BooksByDecade,
}

impl Report {
    pub const ALL: [Report; 3] =
        [Report::AvgPriceByGenre, Report::TopAuthors, Report::BooksByDecade];

    pub fn name(self) -> &'static str {
        match self {
            Report::AvgPriceByGenre => "avg-price-by-genre",
            Report::TopAuthors => "top-authors",
            Report::BooksByDecade => "books-by-decade",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Report::AvgPriceByGenre => "Average price per genre, ascending",
            Report::TopAuthors => "Author(s) with the most books, ties included",
            Report::BooksByDecade => "Number of books per publication decade",
        }
    }

    pub fn pipeline(self) -> Vec<Document> {
        match self {
            Report::AvgPriceByGenre => avg_price_by_genre(),
            Report::TopAuthors => top_authors(),
            Report::BooksByDecade => books_by_decade(),
        }
    }

    /// The report pipeline, preceded by `$match` when `filter` is non-empty.
    pub fn pipeline_with_filter(self, filter: Option<Document>) -> Vec<Document> {
        let mut pipeline = Vec::new();
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            pipeline.push(doc! { "$match": filter });
        }
        pipeline.extend(self.pipeline());
        pipeline
    }
}

/// `{genre, average_price, book_count}` per genre, sorted by `average_price`.
pub fn avg_price_by_genre() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$genre",
                "average_price": { "$avg": "$price" },
                "book_count": { "$sum": 1 },
            }
        },
        doc! { "$project": { "_id": 0, "genre": "$_id", "average_price": 1, "book_count": 1 } },
        doc! { "$sort": { "average_price": 1, "genre": 1 } },
    ]
}

/// `{author, book_count}` for every author sharing the highest book count.
///
/// Authors are first grouped by their count, so the top count bucket holds all
/// tied authors; `$limit: 1` then keeps that whole bucket rather than a single
/// author.
pub fn top_authors() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$author", "book_count": { "$sum": 1 } } },
        doc! { "$group": { "_id": "$book_count", "authors": { "$push": "$_id" } } },
        doc! { "$sort": { "_id": -1 } },
        doc! { "$limit": 1 },
        doc! { "$unwind": "$authors" },
        doc! { "$project": { "_id": 0, "author": "$authors", "book_count": "$_id" } },
        doc! { "$sort": { "author": 1 } },
    ]
}

/// `{bucket, decade, count}` where `bucket = floor(published_year / 10)` and
/// `decade = bucket * 10`.
///
/// Records without a numeric `published_year` are left out.
pub fn books_by_decade() -> Vec<Document> {
    vec![
        doc! { "$match": { "published_year": { "$type": "number" } } },
        doc! {
            "$group": {
                "_id": { "$toInt": { "$floor": { "$divide": ["$published_year", 10] } } },
                "count": { "$sum": 1 },
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "bucket": "$_id",
                "decade": { "$multiply": ["$_id", 10] },
                "count": 1,
            }
        },
        doc! { "$sort": { "decade": 1 } },
    ]
}
