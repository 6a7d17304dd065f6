use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::price_policies::PricePolicyEntity;
use crate::domain::repositories::price_policies::PricePolicyRepository;
use crate::domain::value_objects::priceable::PriceableRef;
use crate::infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::price_policies};

pub struct PricePolicyPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PricePolicyPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PricePolicyRepository for PricePolicyPostgres {
    async fn list_for_entity(&self, entity: PriceableRef) -> Result<Vec<PricePolicyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = price_policies::table
            .filter(price_policies::entity_kind.eq(entity.kind()))
            .filter(price_policies::entity_id.eq(entity.entity_id()))
            .select(PricePolicyEntity::as_select())
            .load::<PricePolicyEntity>(&mut conn)?;

        Ok(rows)
    }
}
