use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostDraft, PostFilter, PostPatch};
use crate::error::StoreError;
use crate::page::{Page, PageRequest};

/// The persistence abstraction for Post documents.
///
/// Read operations return fully resolved posts (author, category, and
/// comment authors populated). Listings are ordered by `created_at`
/// descending.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Posts matching `filter`, sliced to the requested page, together with
    /// the full matching count.
    async fn list(&self, filter: &PostFilter, page: PageRequest)
    -> Result<Page<Post>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;

    /// Create a post for `author_id`: assigns an id, derives the slug from
    /// the title, sets timestamps, and starts the view count at zero.
    ///
    /// The slug-uniqueness check and the insert are a single indivisible
    /// step; a duplicate derived slug yields `StoreError::Conflict`.
    async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, StoreError>;

    /// Apply only the fields present in `patch`; absent fields are left
    /// untouched. The slug is never recomputed. `None` when the post does
    /// not exist.
    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, StoreError>;

    /// Delete a post and its embedded comments. `false` when the post does
    /// not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Atomically increment the view counter in place and return the new
    /// count. Concurrent increments must all be reflected.
    async fn increment_views(&self, id: Uuid) -> Result<i64, StoreError>;

    /// Append a comment and return the updated post. Comments keep append
    /// order; there is no edit or delete.
    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Option<Post>, StoreError>;
}
