use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::domain::repositories::price_policies::PricePolicyRepository;
use crate::domain::value_objects::priceable::PriceableRef;
use crate::domain::value_objects::pricing::PricePolicyModel;

#[derive(Debug, Error)]
pub enum PriceResolverError {
    #[error("price policy not found")]
    PriceNotFound,
    #[error(transparent)]
    Transient(#[from] anyhow::Error),
}

/// Looks up and validates price policies for a priceable entity.
pub struct PriceResolverUseCase<P>
where
    P: PricePolicyRepository + Send + Sync + 'static,
{
    price_policy_repo: Arc<P>,
}

impl<P> PriceResolverUseCase<P>
where
    P: PricePolicyRepository + Send + Sync + 'static,
{
    pub fn new(price_policy_repo: Arc<P>) -> Self {
        Self { price_policy_repo }
    }

    /// All policies attached to `entity`, in storage order.
    pub async fn list(
        &self,
        entity: PriceableRef,
    ) -> Result<Vec<PricePolicyModel>, PriceResolverError> {
        let rows = self
            .price_policy_repo
            .list_for_entity(entity)
            .await
            .map_err(|err| {
                error!(
                    kind = entity.kind(),
                    entity_id = entity.entity_id(),
                    db_error = ?err,
                    "price_resolver: failed to list policies"
                );
                PriceResolverError::Transient(err)
            })?;

        let policies = rows
            .iter()
            .map(PricePolicyModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        debug!(
            kind = entity.kind(),
            entity_id = entity.entity_id(),
            count = policies.len(),
            "price_resolver: policies loaded"
        );
        Ok(policies)
    }

    /// The policy with `policy_id` among `entity`'s policies, or
    /// [`PriceResolverError::PriceNotFound`].
    pub async fn validate(
        &self,
        entity: PriceableRef,
        policy_id: i64,
    ) -> Result<PricePolicyModel, PriceResolverError> {
        self.list(entity)
            .await?
            .into_iter()
            .find(|policy| policy.id == policy_id)
            .ok_or(PriceResolverError::PriceNotFound)
    }
}
