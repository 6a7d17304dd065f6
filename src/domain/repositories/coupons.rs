use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::coupons::{CouponEntity, CouponRecordEntity};
use crate::domain::value_objects::priceable::PriceableRef;

#[async_trait]
#[automock]
pub trait CouponRepository {
    /// Records held by `account_id`, joined with their coupon definitions.
    /// `Some(entity)` restricts to coupons bound to that entity, `None` to
    /// general (unbound) coupons. Validity windows are not filtered here.
    async fn list_records_for_user(
        &self,
        account_id: i64,
        entity: Option<PriceableRef>,
    ) -> Result<Vec<(CouponRecordEntity, CouponEntity)>>;
}
