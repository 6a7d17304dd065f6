use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::price_policies::PricePolicyEntity;
use crate::domain::value_objects::priceable::PriceableRef;

#[async_trait]
#[automock]
pub trait PricePolicyRepository {
    /// Policies attached to `entity`, in storage order (no sort contract).
    async fn list_for_entity(&self, entity: PriceableRef) -> Result<Vec<PricePolicyEntity>>;
}
