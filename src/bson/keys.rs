//! Compact `field:direction` specs used for sorts and index keys.

use mongodb::bson::{Document, doc};

use crate::error::{Error, Result};

/// Parse a direction token. Accepts `1`, `-1`, `asc` and `desc`.
pub fn parse_direction(token: &str) -> Result<i32> {
    match token.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "asc" | "ascending" => Ok(1),
        "-1" | "desc" | "descending" => Ok(-1),
        other => Err(Error::Parse(format!("Unknown direction `{other}`"))),
    }
}

/// Parse `field[:dir][,field[:dir]...]` into an ordered key document.
///
/// Order is preserved, which matters for compound indexes and multi-key sorts.
/// A field without a direction is ascending.
pub fn parse_key_spec(input: &str) -> Result<Document> {
    let mut keys = Document::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (field, direction) = match part.rsplit_once(':') {
            Some((field, dir)) => (field.trim(), parse_direction(dir)?),
            None => (part, 1),
        };
        if field.is_empty() {
            return Err(Error::Parse(format!("Missing field name in `{part}`")));
        }
        if keys.contains_key(field) {
            return Err(Error::Parse(format!("Field `{field}` listed twice")));
        }
        keys.insert(field, direction);
    }

    if keys.is_empty() {
        return Err(Error::InvalidArgument("At least one field is required".into()));
    }
    Ok(keys)
}

/// Split a comma-separated field list, dropping blanks.
pub fn parse_field_list(input: &str) -> Vec<String> {
    input.split(',').map(str::trim).filter(|f| !f.is_empty()).map(str::to_string).collect()
}

/// Build an inclusion projection for the given fields.
///
/// `_id` is suppressed unless it is listed explicitly.
pub fn projection_from_fields<S: AsRef<str>>(fields: &[S]) -> Document {
    let mut projection = Document::new();
    for field in fields {
        projection.insert(field.as_ref(), 1);
    }
    if !projection.contains_key("_id") {
        projection.insert("_id", 0);
    }
    projection
}

/// Default index name as the server derives it: `field_dir` pairs joined by `_`.
pub fn default_index_name(keys: &Document) -> String {
    keys.iter()
        .map(|(field, dir)| format!("{field}_{dir}"))
        .collect::<Vec<_>>()
        .join("_")
}

/// Wrap plain field assignments in `$set`; operator documents pass through untouched.
pub fn normalize_update(update: Document) -> Result<Document> {
    if update.is_empty() {
        return Err(Error::InvalidArgument("Update has no assignments".into()));
    }
    let operators = update.keys().filter(|k| k.starts_with('$')).count();
    match operators {
        0 => Ok(doc! { "$set": update }),
        n if n == update.len() => Ok(update),
        _ => Err(Error::Parse("Update mixes operators and plain fields".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_spec_keeps_declared_order() {
        let keys = parse_key_spec("author:1, published_year:-1").unwrap();
        let fields: Vec<_> = keys.keys().cloned().collect();
        assert_eq!(fields, vec!["author", "published_year"]);
        assert_eq!(keys.get_i32("published_year").unwrap(), -1);
    }

    #[test]
    fn key_spec_defaults_to_ascending() {
        let keys = parse_key_spec("title").unwrap();
        assert_eq!(keys, doc! { "title": 1 });
        assert_eq!(parse_key_spec("price:desc").unwrap(), doc! { "price": -1 });
    }

    #[test]
    fn key_spec_rejects_bad_input() {
        assert!(matches!(parse_key_spec(" , "), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_key_spec("price:up"), Err(Error::Parse(_))));
        assert!(matches!(parse_key_spec("title,title:-1"), Err(Error::Parse(_))));
        assert!(matches!(parse_key_spec(":1"), Err(Error::Parse(_))));
    }

    #[test]
    fn projection_hides_id_unless_requested() {
        assert_eq!(
            projection_from_fields(&["title", "author"]),
            doc! { "title": 1, "author": 1, "_id": 0 }
        );
        assert_eq!(projection_from_fields(&["_id", "title"]), doc! { "_id": 1, "title": 1 });
    }

    #[test]
    fn index_name_matches_server_convention() {
        let keys = doc! { "author": 1, "published_year": -1 };
        assert_eq!(default_index_name(&keys), "author_1_published_year_-1");
    }

    #[test]
    fn plain_assignments_are_wrapped_in_set() {
        let update = normalize_update(doc! { "price": 12.99 }).unwrap();
        assert_eq!(update, doc! { "$set": { "price": 12.99 } });

        let ops = doc! { "$inc": { "price": 1 } };
        assert_eq!(normalize_update(ops.clone()).unwrap(), ops);

        assert!(normalize_update(doc! { "$set": { "a": 1 }, "b": 2 }).is_err());
        assert!(normalize_update(Document::new()).is_err());
    }
}
