use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

use super::{Author, Category};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_EXCERPT_LEN: usize = 200;

/// Post entity - the fully resolved read model of a blog post.
///
/// `author` and `category` are populated by the store from the referenced
/// records; `comments` are embedded in the post's lifetime and ordered
/// oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// Derived from the title at creation and never regenerated.
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub author: Author,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub view_count: i64,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment entity - owned exclusively by its post, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author: Author,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a post. The store assigns id, slug, timestamps and the
/// initial view count.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: Uuid,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub featured_image: Option<String>,
}

impl PostDraft {
    /// Boundary validation for create input. Length limits are enforced
    /// here, not by the store.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "Title cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::Validation("Content is required".to_string()));
        }
        if let Some(excerpt) = &self.excerpt {
            if excerpt.chars().count() > MAX_EXCERPT_LEN {
                return Err(DomainError::Validation(format!(
                    "Excerpt cannot exceed {MAX_EXCERPT_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

/// Partial update. Absent fields are left untouched by the store; the slug
/// is never recomputed.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
    pub featured_image: Option<String>,
}

impl PostPatch {
    /// Same boundary limits as create, applied to whichever fields are
    /// present.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            if title.chars().count() > MAX_TITLE_LEN {
                return Err(DomainError::Validation(format!(
                    "Title cannot exceed {MAX_TITLE_LEN} characters"
                )));
            }
        }
        if let Some(excerpt) = &self.excerpt {
            if excerpt.chars().count() > MAX_EXCERPT_LEN {
                return Err(DomainError::Validation(format!(
                    "Excerpt cannot exceed {MAX_EXCERPT_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

/// Tagged query filter composed explicitly by the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Published posts only.
    Published,
    /// Published posts in the given category.
    PublishedInCategory(Uuid),
    /// Published posts whose title, content, or any tag contains the query,
    /// case-insensitively. Substring matching, no ranking.
    Search(String),
}

/// Validate comment content: non-empty after trimming. The content is stored
/// as submitted.
pub fn validate_comment_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation(
            "Comment content is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "A title".to_string(),
            content: "Some content".to_string(),
            excerpt: None,
            category_id: Uuid::new_v4(),
            tags: vec![],
            is_published: false,
            featured_image: None,
        }
    }

    #[test]
    fn draft_requires_title_and_content() {
        let mut d = draft();
        d.title = "   ".to_string();
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));

        let mut d = draft();
        d.content = String::new();
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn draft_enforces_length_limits() {
        let mut d = draft();
        d.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(d.validate().is_err());

        let mut d = draft();
        d.excerpt = Some("x".repeat(MAX_EXCERPT_LEN + 1));
        assert!(d.validate().is_err());

        let mut d = draft();
        d.excerpt = Some("x".repeat(MAX_EXCERPT_LEN));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn patch_checks_limits_only_for_present_fields() {
        assert!(PostPatch::default().validate().is_ok());

        let patch = PostPatch {
            title: Some("x".repeat(MAX_TITLE_LEN + 1)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn comment_content_must_be_non_blank() {
        assert!(validate_comment_content("  ").is_err());
        assert!(validate_comment_content("nice post").is_ok());
    }
}
