use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display identity of a post or comment author.
///
/// Authentication lives outside this system; the store resolves author ids
/// against its user records when shaping read models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl Author {
    /// Placeholder used when an author id cannot be resolved to a user
    /// record (the identity provider is an external collaborator).
    pub fn unresolved(id: Uuid) -> Self {
        Self {
            id,
            name: "unknown".to_string(),
            email: None,
            avatar: None,
        }
    }
}
