use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::repositories::coupons::CouponRepository;
use crate::domain::value_objects::coupons::CouponRecordModel;
use crate::domain::value_objects::priceable::PriceableRef;

#[derive(Debug, Error)]
pub enum CouponMatchError {
    #[error(transparent)]
    Transient(#[from] anyhow::Error),
}

/// Resolves the coupon records an account can bring to settlement.
pub struct CouponMatcherUseCase<R>
where
    R: CouponRepository + Send + Sync + 'static,
{
    coupon_repo: Arc<R>,
}

impl<R> CouponMatcherUseCase<R>
where
    R: CouponRepository + Send + Sync + 'static,
{
    pub fn new(coupon_repo: Arc<R>) -> Self {
        Self { coupon_repo }
    }

    /// Records bound to `entity` whose validity window contains `as_of`.
    ///
    /// Matches on ownership, binding and window only. Record `status` is
    /// deliberately not filtered: used and expired records inside their
    /// window are returned, and callers that need redeemable coupons must
    /// check [`CouponRecordStatus::Unused`](crate::domain::value_objects::enums::coupon_record_statuses::CouponRecordStatus)
    /// themselves.
    pub async fn resolve_for_entity(
        &self,
        account_id: i64,
        entity: PriceableRef,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<CouponRecordModel>, CouponMatchError> {
        self.resolve(account_id, Some(entity), as_of).await
    }

    /// Same window filter for coupons bound to no entity.
    pub async fn resolve_general(
        &self,
        account_id: i64,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<CouponRecordModel>, CouponMatchError> {
        self.resolve(account_id, None, as_of).await
    }

    async fn resolve(
        &self,
        account_id: i64,
        entity: Option<PriceableRef>,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<CouponRecordModel>, CouponMatchError> {
        let rows = self
            .coupon_repo
            .list_records_for_user(account_id, entity)
            .await
            .map_err(|err| {
                error!(account_id, db_error = ?err, "coupon_matcher: failed to list records");
                CouponMatchError::Transient(err)
            })?;

        let as_of_date = as_of.date_naive();
        let records = rows
            .into_iter()
            // Null window bounds never match.
            .filter(|(_, coupon)| {
                coupon.valid_begin_date.is_some_and(|begin| begin <= as_of_date)
                    && coupon.valid_end_date.is_some_and(|end| end >= as_of_date)
            })
            .map(|(record, coupon)| CouponRecordModel::from_rows(record, coupon))
            .collect::<anyhow::Result<Vec<_>>>()?;

        debug!(
            account_id,
            general = entity.is_none(),
            matched = records.len(),
            "coupon_matcher: records resolved"
        );
        Ok(records)
    }
}
