use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category reference data. Managed by an external collaborator; posts hold
/// a non-owning reference and resolve it on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}
