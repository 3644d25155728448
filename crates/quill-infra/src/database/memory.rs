//! In-memory store - used as fallback when no database is configured, and as
//! the behavioural test double.
//!
//! All mutations run under a single write lock, so create-with-slug-check
//! and increment-on-read are indivisible, matching what the unique index and
//! the in-place UPDATE give the SQL adapter.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Author, Category, Comment, Post, PostDraft, PostFilter, PostPatch};
use quill_core::error::StoreError;
use quill_core::page::{Page, PageRequest};
use quill_core::ports::{CategoryStore, PostStore};
use quill_core::slug::slugify;

struct CommentRecord {
    id: Uuid,
    author_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

struct PostRecord {
    id: Uuid,
    author_id: Uuid,
    category_id: Uuid,
    title: String,
    slug: String,
    content: String,
    excerpt: Option<String>,
    tags: Vec<String>,
    featured_image: Option<String>,
    is_published: bool,
    view_count: i64,
    comments: Vec<CommentRecord>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Insertion order, used as tiebreak when timestamps collide.
    seq: u64,
}

#[derive(Default)]
struct State {
    posts: HashMap<Uuid, PostRecord>,
    authors: HashMap<Uuid, Author>,
    categories: HashMap<Uuid, Category>,
    next_seq: u64,
}

impl State {
    fn resolve_author(&self, id: Uuid) -> Author {
        self.authors
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Author::unresolved(id))
    }

    fn resolve(&self, record: &PostRecord) -> Post {
        let category = self.categories.get(&record.category_id).cloned().unwrap_or(Category {
            id: record.category_id,
            name: String::new(),
            slug: String::new(),
        });
        Post {
            id: record.id,
            title: record.title.clone(),
            slug: record.slug.clone(),
            content: record.content.clone(),
            excerpt: record.excerpt.clone(),
            category,
            tags: record.tags.clone(),
            author: self.resolve_author(record.author_id),
            featured_image: record.featured_image.clone(),
            is_published: record.is_published,
            view_count: record.view_count,
            comments: record
                .comments
                .iter()
                .map(|c| Comment {
                    id: c.id,
                    author: self.resolve_author(c.author_id),
                    content: c.content.clone(),
                    created_at: c.created_at,
                })
                .collect(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// In-memory post store over a single shared `RwLock`. Cloning yields a
/// handle to the same data.
#[derive(Default, Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

/// Category lookup over the same shared state.
#[derive(Clone)]
pub struct MemoryCategoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A category store sharing this store's data.
    pub fn categories(&self) -> MemoryCategoryStore {
        MemoryCategoryStore {
            state: Arc::clone(&self.state),
        }
    }

    /// Register the display identity for an author id, so posts and
    /// comments resolve to it.
    pub async fn seed_author(&self, author: Author) {
        let mut state = self.state.write().await;
        state.authors.insert(author.id, author);
    }

    /// Add a category, deriving its slug from the name.
    pub async fn seed_category(&self, name: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
        };
        let mut state = self.state.write().await;
        state.categories.insert(category.id, category.clone());
        category
    }
}

fn matches(record: &PostRecord, filter: &PostFilter) -> bool {
    if !record.is_published {
        return false;
    }
    match filter {
        PostFilter::Published => true,
        PostFilter::PublishedInCategory(category_id) => record.category_id == *category_id,
        PostFilter::Search(query) => {
            let needle = query.to_lowercase();
            record.title.to_lowercase().contains(&needle)
                || record.content.to_lowercase().contains(&needle)
                || record.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<Post>, StoreError> {
        let state = self.state.read().await;

        let mut records: Vec<&PostRecord> =
            state.posts.values().filter(|r| matches(r, filter)).collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        let total = records.len() as u64;
        let items = records
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|r| state.resolve(r))
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).map(|r| state.resolve(r)))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .values()
            .find(|r| r.slug == slug)
            .map(|r| state.resolve(r)))
    }

    async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, StoreError> {
        let mut state = self.state.write().await;

        // Uniqueness check and insert happen under the same write lock.
        let slug = slugify(&draft.title);
        if state.posts.values().any(|r| r.slug == slug) {
            return Err(StoreError::Conflict(
                "A post with this slug already exists".to_string(),
            ));
        }

        let now = Utc::now();
        state.next_seq += 1;
        let record = PostRecord {
            id: Uuid::new_v4(),
            author_id,
            category_id: draft.category_id,
            slug,
            title: draft.title,
            content: draft.content,
            excerpt: draft.excerpt,
            tags: draft.tags,
            featured_image: draft.featured_image,
            is_published: draft.is_published,
            view_count: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
            seq: state.next_seq,
        };
        let post = state.resolve(&record);
        state.posts.insert(record.id, record);
        Ok(post)
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        let mut state = self.state.write().await;
        let Some(record) = state.posts.get_mut(&id) else {
            return Ok(None);
        };

        // Absent fields stay untouched; the slug is never recomputed.
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(content) = patch.content {
            record.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            record.excerpt = Some(excerpt);
        }
        if let Some(category_id) = patch.category_id {
            record.category_id = category_id;
        }
        if let Some(tags) = patch.tags {
            record.tags = tags;
        }
        if let Some(is_published) = patch.is_published {
            record.is_published = is_published;
        }
        if let Some(url) = patch.featured_image {
            record.featured_image = Some(url);
        }
        record.updated_at = Utc::now();

        let post = state.resolve(&state.posts[&id]);
        Ok(Some(post))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        // Embedded comments are discarded with the post.
        Ok(state.posts.remove(&id).is_some())
    }

    async fn increment_views(&self, id: Uuid) -> Result<i64, StoreError> {
        let mut state = self.state.write().await;
        let record = state
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::Query(format!("post {id} not found for view increment")))?;
        record.view_count += 1;
        Ok(record.view_count)
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Option<Post>, StoreError> {
        let mut state = self.state.write().await;
        let Some(record) = state.posts.get_mut(&post_id) else {
            return Ok(None);
        };

        record.comments.push(CommentRecord {
            id: Uuid::new_v4(),
            author_id,
            content: content.to_string(),
            created_at: Utc::now(),
        });

        let post = state.resolve(&state.posts[&post_id]);
        Ok(Some(post))
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn all(&self) -> Result<Vec<Category>, StoreError> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let state = self.state.read().await;
        Ok(state.categories.values().find(|c| c.slug == slug).cloned())
    }
}
