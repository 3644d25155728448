use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use quill_core::domain::PostFilter;
use quill_core::page::PageRequest;
use quill_core::ports::PostStore;

use super::entity::post::Tags;
use super::entity::{category, comment, post, user};
use super::sea_store::SeaPostStore;

fn post_model(id: Uuid, author_id: Uuid, category_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        category_id,
        title: "Test Post".to_owned(),
        slug: "test-post".to_owned(),
        content: "Content".to_owned(),
        excerpt: None,
        tags: Tags(vec!["rust".to_owned()]),
        featured_image: None,
        is_published: true,
        view_count: 3,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn find_by_id_resolves_author_and_category() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, author_id, category_id)]])
        .append_query_results([Vec::<comment::Model>::new()])
        .append_query_results([vec![user::Model {
            id: author_id,
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            avatar: None,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .append_query_results([vec![category::Model {
            id: category_id,
            name: "General".to_owned(),
            slug: "general".to_owned(),
        }]])
        .into_connection();

    let store = SeaPostStore::new(db);
    let post = store.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.slug, "test-post");
    assert_eq!(post.author.name, "Ada");
    assert_eq!(post.category.slug, "general");
    assert_eq!(post.tags, vec!["rust"]);
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let store = SeaPostStore::new(db);
    assert!(store.delete(Uuid::new_v4()).await.unwrap());
    assert!(!store.delete(Uuid::new_v4()).await.unwrap());
}

/// Mock connection that answers a count query with zero and a page query
/// with no rows, so `list` completes and leaves its SQL in the log.
fn empty_listing_db() -> sea_orm::DatabaseConnection {
    let count: BTreeMap<&str, Value> = [("num_items", Value::from(0i64))].into_iter().collect();
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count]])
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection()
}

#[tokio::test]
async fn listing_breaks_created_at_ties_by_id() {
    let store = SeaPostStore::new(empty_listing_db());
    store
        .list(&PostFilter::Published, PageRequest::default())
        .await
        .unwrap();

    let log = format!("{:?}", store.into_transaction_log()).replace("\\\"", "\"");
    assert!(log.contains(r#"ORDER BY "posts"."created_at" DESC, "posts"."id" DESC"#));
}

#[tokio::test]
async fn search_matches_tags_per_element() {
    let store = SeaPostStore::new(empty_listing_db());
    store
        .list(
            &PostFilter::Search("rust".to_string()),
            PageRequest::default(),
        )
        .await
        .unwrap();

    let log = format!("{:?}", store.into_transaction_log());
    // Tags are unpacked and compared one element at a time, not as the
    // serialized array text.
    assert!(log.contains("json_array_elements_text"));
    assert!(!log.contains("CAST(tags AS TEXT)"));
}

#[tokio::test]
async fn increment_views_returns_the_new_count() {
    let row: BTreeMap<&str, Value> = [("view_count", Value::from(6i64))].into_iter().collect();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();

    let store = SeaPostStore::new(db);
    let count = store.increment_views(Uuid::new_v4()).await.unwrap();
    assert_eq!(count, 6);
}
