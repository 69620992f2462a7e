//! Index management and explain against a real server.

mod common;

use bookstore::bson::{parse_key_spec, parse_pipeline_from_json};
use bookstore::connection::{ExplainFindRequest, ExplainVerbosity, IndexSpec};
use common::{BookstoreTestDb, fixtures, run_blocking};
use mongodb::IndexModel;
use mongodb::bson::{Document, doc};

fn index_named<'a>(indexes: &'a [IndexModel], name: &str) -> Option<&'a IndexModel> {
    indexes
        .iter()
        .find(|index| index.options.as_ref().and_then(|o| o.name.as_deref()) == Some(name))
}

fn ordered_keys(index: &IndexModel) -> Vec<(String, i64)> {
    index
        .keys
        .iter()
        .map(|(key, value)| (key.clone(), bookstore::bson::number_as_i64(value).unwrap()))
        .collect()
}

#[tokio::test]
async fn test_create_single_field_index() {
    run_blocking(|| {
        let db = BookstoreTestDb::with_books(&fixtures::inventory());
        let spec = IndexSpec::new(parse_key_spec("title").unwrap());
        let name = db.manager.create_index(&db.client, db.db(), db.coll(), &spec).unwrap();
        assert_eq!(name, "title_1");

        let indexes = db.manager.list_indexes(&db.client, db.db(), db.coll()).unwrap();
        assert!(index_named(&indexes, "_id_").is_some());
        let title = index_named(&indexes, "title_1").expect("title index");
        assert_eq!(ordered_keys(title), vec![("title".to_string(), 1)]);
    })
    .await;
}

#[tokio::test]
async fn test_compound_index_keeps_key_order() {
    run_blocking(|| {
        let db = BookstoreTestDb::with_books(&fixtures::inventory());
        let spec = IndexSpec::new(parse_key_spec("author:1,published_year:-1").unwrap());
        let name = db.manager.create_index(&db.client, db.db(), db.coll(), &spec).unwrap();
        assert_eq!(name, "author_1_published_year_-1");

        let indexes = db.manager.list_indexes(&db.client, db.db(), db.coll()).unwrap();
        let compound = index_named(&indexes, &name).expect("compound index");
        assert_eq!(
            ordered_keys(compound),
            vec![("author".to_string(), 1), ("published_year".to_string(), -1)]
        );
    })
    .await;
}

#[tokio::test]
async fn test_create_index_twice_is_idempotent() {
    run_blocking(|| {
        let db = BookstoreTestDb::with_books(&fixtures::inventory());
        let spec = IndexSpec::new(doc! { "genre": 1 });
        db.manager.create_index(&db.client, db.db(), db.coll(), &spec).unwrap();
        db.manager.create_index(&db.client, db.db(), db.coll(), &spec).unwrap();

        let indexes = db.manager.list_indexes(&db.client, db.db(), db.coll()).unwrap();
        assert_eq!(indexes.len(), 2);
    })
    .await;
}

#[tokio::test]
async fn test_unique_index_rejects_duplicates() {
    run_blocking(|| {
        let db = BookstoreTestDb::with_books(&fixtures::inventory());
        let spec = IndexSpec {
            keys: doc! { "title": 1 },
            name: Some("unique_title".into()),
            unique: true,
        };
        let name = db.manager.create_index(&db.client, db.db(), db.coll(), &spec).unwrap();
        assert_eq!(name, "unique_title");

        let duplicate = vec![doc! { "title": "1984", "author": "Someone Else" }];
        let result = db.manager.insert_documents(&db.client, db.db(), db.coll(), duplicate);
        assert!(result.is_err());
        assert_eq!(db.count(doc! { "title": "1984" }), 1);
    })
    .await;
}

#[tokio::test]
async fn test_drop_index_removes_it() {
    run_blocking(|| {
        let db = BookstoreTestDb::with_books(&fixtures::inventory());
        let spec = IndexSpec::new(doc! { "price": -1 });
        let name = db.manager.create_index(&db.client, db.db(), db.coll(), &spec).unwrap();
        db.manager.drop_index(&db.client, db.db(), db.coll(), &name).unwrap();

        let indexes = db.manager.list_indexes(&db.client, db.db(), db.coll()).unwrap();
        assert!(index_named(&indexes, &name).is_none());
        assert!(db.manager.drop_index(&db.client, db.db(), db.coll(), "missing_1").is_err());
    })
    .await;
}

#[tokio::test]
async fn test_explain_find_uses_index_and_changes_nothing() {
    run_blocking(|| {
        let db = BookstoreTestDb::with_books(&fixtures::inventory());
        let spec = IndexSpec::new(doc! { "title": 1 });
        db.manager.create_index(&db.client, db.db(), db.coll(), &spec).unwrap();
        let before = db.find(Document::new());

        let request = ExplainFindRequest {
            database: db.db().to_string(),
            collection: db.coll().to_string(),
            filter: Some(doc! { "title": "The Hobbit" }),
            verbosity: ExplainVerbosity::ExecutionStats,
            ..Default::default()
        };
        let plan = db.manager.explain_find(&db.client, request).unwrap();
        assert!(plan.contains_key("queryPlanner"));
        let stats = plan.get_document("executionStats").expect("execution stats");
        assert_eq!(bookstore::bson::get_i64(stats, "nReturned"), Some(1));
        assert!(plan.to_string().contains("IXSCAN"), "expected an index scan: {plan}");

        assert_eq!(db.find(Document::new()), before);
    })
    .await;
}

#[tokio::test]
async fn test_explain_aggregation_changes_nothing() {
    run_blocking(|| {
        let db = BookstoreTestDb::with_books(&fixtures::inventory());
        let pipeline = parse_pipeline_from_json(
            r#"[{ $match: { genre: "Fiction" } }, { $set: { price: 0 } }]"#,
        )
        .unwrap();
        let plan = db
            .manager
            .explain_aggregation(
                &db.client,
                db.db(),
                db.coll(),
                pipeline,
                ExplainVerbosity::QueryPlanner,
            )
            .unwrap();
        assert!(!plan.is_empty());

        assert_eq!(db.count(Document::new()), 12);
        assert_eq!(db.count(doc! { "price": 0 }), 0);
    })
    .await;
}
