use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::priceable::{PriceableModel, PriceableRef};

#[async_trait]
#[automock]
pub trait CourseRepository {
    /// Resolve a priceable reference to its concrete catalog row.
    async fn find_priceable(&self, entity: PriceableRef) -> Result<Option<PriceableModel>>;
}
