//! SeaORM-backed implementations of the post and category stores.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbBackend, DbConn, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use uuid::Uuid;

use quill_core::domain::{Author, Category, Comment, Post, PostDraft, PostFilter, PostPatch};
use quill_core::error::StoreError;
use quill_core::page::{Page, PageRequest};
use quill_core::ports::{CategoryStore, PostStore};
use quill_core::slug::slugify;

use super::entity::post::Tags;
use super::entity::{category, comment, post, user};

/// Post store backed by Postgres via SeaORM.
pub struct SeaPostStore {
    db: DbConn,
}

impl SeaPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Resolve author, category, and comment references for a batch of post
    /// rows, preserving row order.
    async fn resolve_all(&self, models: Vec<post::Model>) -> Result<Vec<Post>, StoreError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let comment_rows = comment::Entity::find()
            .filter(comment::Column::PostId.is_in(post_ids))
            .order_by_asc(comment::Column::Seq)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let mut author_ids: Vec<Uuid> = models
            .iter()
            .map(|m| m.author_id)
            .chain(comment_rows.iter().map(|c| c.author_id))
            .collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Uuid, Author> = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|u| (u.id, u.into()))
            .collect();

        let mut category_ids: Vec<Uuid> = models.iter().map(|m| m.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let categories: HashMap<Uuid, Category> = category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|c| (c.id, c.into()))
            .collect();

        let resolve_author =
            |id: Uuid| authors.get(&id).cloned().unwrap_or_else(|| Author::unresolved(id));

        let mut comments_by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in comment_rows {
            comments_by_post.entry(row.post_id).or_default().push(Comment {
                id: row.id,
                author: resolve_author(row.author_id),
                content: row.content,
                created_at: row.created_at.into(),
            });
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let category = categories.get(&m.category_id).cloned().unwrap_or(Category {
                    id: m.category_id,
                    name: String::new(),
                    slug: String::new(),
                });
                Post {
                    id: m.id,
                    title: m.title,
                    slug: m.slug,
                    content: m.content,
                    excerpt: m.excerpt,
                    category,
                    tags: m.tags.0,
                    author: resolve_author(m.author_id),
                    featured_image: m.featured_image,
                    is_published: m.is_published,
                    view_count: m.view_count,
                    comments: comments_by_post.remove(&m.id).unwrap_or_default(),
                    created_at: m.created_at.into(),
                    updated_at: m.updated_at.into(),
                }
            })
            .collect())
    }

    async fn resolve_one(&self, model: post::Model) -> Result<Post, StoreError> {
        let mut posts = self.resolve_all(vec![model]).await?;
        posts
            .pop()
            .ok_or_else(|| StoreError::Query("post resolution produced no rows".to_string()))
    }
}

#[async_trait]
impl PostStore for SeaPostStore {
    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<Post>, StoreError> {
        let condition = filter_condition(filter);

        let total = post::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(query_err)?;

        let models = post::Entity::find()
            .filter(condition)
            .order_by_desc(post::Column::CreatedAt)
            // id tiebreak keeps pages stable when timestamps collide
            .order_by_desc(post::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let posts = self.resolve_all(models).await?;
        Ok(Page::new(posts, page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        match post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        {
            Some(model) => Ok(Some(self.resolve_one(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        match post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?
        {
            Some(model) => Ok(Some(self.resolve_one(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, StoreError> {
        let now = Utc::now();
        let model = post::ActiveModel {
            id: Set(Uuid::new_v4()),
            author_id: Set(author_id),
            category_id: Set(draft.category_id),
            slug: Set(slugify(&draft.title)),
            title: Set(draft.title),
            content: Set(draft.content),
            excerpt: Set(draft.excerpt),
            tags: Set(Tags(draft.tags)),
            featured_image: Set(draft.featured_image),
            is_published: Set(draft.is_published),
            view_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        // The unique index on slug makes the existence check and the insert
        // one indivisible step.
        let inserted = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict("A post with this slug already exists".to_string())
            } else {
                query_err(e)
            }
        })?;

        self.resolve_one(inserted).await
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        let Some(model) = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };

        let mut active: post::ActiveModel = model.into();
        // The slug keeps its creation-time value even when the title changes.
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = patch.excerpt {
            active.excerpt = Set(Some(excerpt));
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(Tags(tags));
        }
        if let Some(is_published) = patch.is_published {
            active.is_published = Set(is_published);
        }
        if let Some(url) = patch.featured_image {
            active.featured_image = Set(Some(url));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(query_err)?;
        Ok(Some(self.resolve_one(updated).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        // Comments go with the post via ON DELETE CASCADE.
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_views(&self, id: Uuid) -> Result<i64, StoreError> {
        // Single in-place UPDATE so concurrent readers never lose counts.
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"UPDATE "posts" SET "view_count" = "view_count" + 1 WHERE "id" = $1 RETURNING "view_count""#,
            [id.into()],
        );

        let row = self
            .db
            .query_one(stmt)
            .await
            .map_err(query_err)?
            .ok_or_else(|| StoreError::Query(format!("post {id} not found for view increment")))?;

        row.try_get::<i64>("", "view_count")
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Option<Post>, StoreError> {
        let Some(model) = post::Entity::find_by_id(post_id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };

        let row = comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            post_id: Set(post_id),
            author_id: Set(author_id),
            content: Set(content.to_string()),
            created_at: Set(Utc::now().into()),
            // seq comes from the bigserial default, fixing append order
            ..Default::default()
        };
        row.insert(&self.db).await.map_err(query_err)?;

        Ok(Some(self.resolve_one(model).await?))
    }
}

/// Category store backed by Postgres via SeaORM. Read-only; category
/// management belongs to an external collaborator.
pub struct SeaCategoryStore {
    db: DbConn,
}

impl SeaCategoryStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryStore for SeaCategoryStore {
    async fn all(&self) -> Result<Vec<Category>, StoreError> {
        let rows = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let row = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let row = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(row.map(Into::into))
    }
}

fn filter_condition(filter: &PostFilter) -> Condition {
    match filter {
        PostFilter::Published => Condition::all().add(post::Column::IsPublished.eq(true)),
        PostFilter::PublishedInCategory(category_id) => Condition::all()
            .add(post::Column::IsPublished.eq(true))
            .add(post::Column::CategoryId.eq(*category_id)),
        PostFilter::Search(query) => {
            let pattern = search_pattern(query);
            Condition::all().add(post::Column::IsPublished.eq(true)).add(
                Condition::any()
                    .add(Expr::col(post::Column::Title).ilike(pattern.clone()))
                    .add(Expr::col(post::Column::Content).ilike(pattern.clone()))
                    // Per-element match; casting the whole array to text
                    // would also match across tag boundaries and JSON
                    // delimiters.
                    .add(Expr::cust_with_values(
                        "EXISTS (SELECT 1 FROM json_array_elements_text(tags) AS tag WHERE tag ILIKE ?)",
                        [pattern],
                    )),
            )
        }
    }
}

/// Build a `%...%` pattern with LIKE metacharacters in the user query
/// escaped, so the search stays literal substring matching.
fn search_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn query_err(e: DbErr) -> StoreError {
    match e {
        DbErr::Conn(err) => StoreError::Connection(err.to_string()),
        DbErr::ConnectionAcquire(err) => StoreError::Connection(err.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("duplicate") || msg.contains("unique")
}

#[cfg(test)]
impl SeaPostStore {
    pub(super) fn into_transaction_log(self) -> Vec<sea_orm::Transaction> {
        self.db.into_transaction_log()
    }
}
