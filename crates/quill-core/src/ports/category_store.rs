use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Category;
use crate::error::StoreError;

/// Read-only lookup of category reference data. Category management belongs
/// to an external collaborator.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, ordered by name.
    async fn all(&self) -> Result<Vec<Category>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError>;
}
