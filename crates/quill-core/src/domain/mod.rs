//! Domain entities - the core business objects.

mod category;
mod post;
mod user;

pub use category::Category;
pub use post::{Comment, Post, PostDraft, PostFilter, PostPatch, validate_comment_content};
pub use user::Author;
