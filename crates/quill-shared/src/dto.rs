//! Data Transfer Objects - the JSON documents returned by the API.
//!
//! Field names follow the HTTP contract (camelCase). The excerpt fallback is
//! applied here, at render time; the derived summary is never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::{Author, Category, Comment, Post};

/// Number of content characters used for the derived excerpt.
pub const EXCERPT_PREVIEW_CHARS: usize = 150;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub category: CategoryDto,
    pub tags: Vec<String>,
    pub author: AuthorDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub view_count: i64,
    pub comments: Vec<CommentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: Uuid,
    pub author: AuthorDto,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        let excerpt = post
            .excerpt
            .unwrap_or_else(|| derive_excerpt(&post.content));
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt,
            category: post.category.into(),
            tags: post.tags,
            author: post.author.into(),
            featured_image: post.featured_image,
            is_published: post.is_published,
            view_count: post.view_count,
            comments: post.comments.into_iter().map(Into::into).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            email: author.email,
            avatar: author.avatar,
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
        }
    }
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author.into(),
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

fn derive_excerpt(content: &str) -> String {
    let preview: String = content.chars().take(EXCERPT_PREVIEW_CHARS).collect();
    format!("{preview}...")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn post(excerpt: Option<String>, content: &str) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            slug: "t".to_string(),
            content: content.to_string(),
            excerpt,
            category: Category {
                id: Uuid::new_v4(),
                name: "General".to_string(),
                slug: "general".to_string(),
            },
            tags: vec![],
            author: Author::unresolved(Uuid::new_v4()),
            featured_image: None,
            is_published: true,
            view_count: 0,
            comments: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn explicit_excerpt_is_kept_verbatim() {
        let dto = PostDto::from(post(Some("hand-written".to_string()), "long content"));
        assert_eq!(dto.excerpt, "hand-written");
    }

    #[test]
    fn missing_excerpt_is_derived_from_content() {
        let content = "c".repeat(400);
        let dto = PostDto::from(post(None, &content));
        assert_eq!(dto.excerpt, format!("{}...", "c".repeat(150)));
    }

    #[test]
    fn serializes_contract_field_names() {
        let json = serde_json::to_value(PostDto::from(post(None, "body"))).unwrap();
        assert!(json.get("isPublished").is_some());
        assert!(json.get("viewCount").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
