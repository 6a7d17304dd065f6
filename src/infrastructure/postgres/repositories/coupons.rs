use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::coupons::{CouponEntity, CouponRecordEntity};
use crate::domain::repositories::coupons::CouponRepository;
use crate::domain::value_objects::priceable::PriceableRef;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{coupon_records, coupons},
};

pub struct CouponPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CouponPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CouponRepository for CouponPostgres {
    async fn list_records_for_user(
        &self,
        account_id: i64,
        entity: Option<PriceableRef>,
    ) -> Result<Vec<(CouponRecordEntity, CouponEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = coupon_records::table
            .inner_join(coupons::table)
            .filter(coupon_records::account_id.eq(account_id))
            .select((CouponRecordEntity::as_select(), CouponEntity::as_select()))
            .into_boxed();

        query = match entity {
            Some(entity) => query
                .filter(coupons::entity_kind.eq(entity.kind()))
                .filter(coupons::entity_id.eq(entity.entity_id())),
            None => query.filter(coupons::entity_kind.is_null()),
        };

        let rows = query.load::<(CouponRecordEntity, CouponEntity)>(&mut conn)?;
        Ok(rows)
    }
}
