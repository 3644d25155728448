//! The authorization gate for post mutations.

use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;

pub const ADMIN_ROLE: &str = "admin";

/// Acting identity, as resolved by the external auth collaborator.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub role: String,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// May `actor` update or delete `post`? Owner or admin only.
pub fn can_mutate(actor: &Actor, post: &Post) -> bool {
    actor.id == post.author.id || actor.is_admin()
}

/// Gate applied before every update/delete. A rejection never touches the
/// store and maps to HTTP 403, distinct from 404 and 400.
pub fn ensure_can_mutate(actor: &Actor, post: &Post) -> Result<(), DomainError> {
    if can_mutate(actor, post) {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
