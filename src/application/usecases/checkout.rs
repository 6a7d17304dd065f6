use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::usecases::coupon_matcher::{CouponMatchError, CouponMatcherUseCase};
use crate::domain::repositories::coupons::CouponRepository;
use crate::domain::repositories::kv_store::KeyValueStore;
use crate::domain::value_objects::cache_keys::CacheKey;
use crate::domain::value_objects::cart::CartEntry;
use crate::domain::value_objects::checkout::{CheckoutSnapshot, CheckoutView};
use crate::domain::value_objects::coupons::CouponInfo;
use crate::domain::value_objects::priceable::PriceableRef;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart item not found")]
    CartItemNotFound,
    #[error(transparent)]
    Transient(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn business_code(&self) -> u16 {
        match self {
            CheckoutError::CartItemNotFound => 1044,
            CheckoutError::Transient(_) => 1500,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::CartItemNotFound => StatusCode::NOT_FOUND,
            CheckoutError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<CouponMatchError> for CheckoutError {
    fn from(err: CouponMatchError) -> Self {
        match err {
            CouponMatchError::Transient(err) => CheckoutError::Transient(err),
        }
    }
}

/// Combines cart entries with applicable coupons into settlement snapshots.
pub struct CheckoutUseCase<R, K>
where
    R: CouponRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    coupon_matcher: Arc<CouponMatcherUseCase<R>>,
    kv: Arc<K>,
}

impl<R, K> CheckoutUseCase<R, K>
where
    R: CouponRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    pub fn new(coupon_matcher: Arc<CouponMatcherUseCase<R>>, kv: Arc<K>) -> Self {
        Self { coupon_matcher, kv }
    }

    /// Snapshot each course in `course_ids`, in order, then rewrite the
    /// account's general-coupon snapshot.
    ///
    /// There is no multi-key transaction underneath: a missing cart entry
    /// aborts the batch at that index, and snapshots already written for
    /// earlier indices stay written. The general snapshot is only touched
    /// after the whole loop succeeds.
    pub async fn begin(&self, account_id: i64, course_ids: &[i64]) -> Result<(), CheckoutError> {
        let now = Utc::now();

        for &course_id in course_ids {
            let cart_key = CacheKey::cart(account_id, course_id);
            let Some(fields) = self.kv.hash_get_all(cart_key.as_str()).await? else {
                warn!(
                    account_id,
                    course_id, "checkout: course not in cart, aborting batch"
                );
                return Err(CheckoutError::CartItemNotFound);
            };
            let entry = CartEntry::from_hash(&fields)?;

            let records = self
                .coupon_matcher
                .resolve_for_entity(account_id, PriceableRef::Course(course_id), now)
                .await?;
            let snapshot = CheckoutSnapshot {
                course_info: entry,
                course_coupon_info: records
                    .iter()
                    .map(|record| (record.record_id, record.info.clone()))
                    .collect(),
            };

            self.kv
                .hash_set(
                    CacheKey::checkout(account_id, course_id).as_str(),
                    snapshot.to_hash_fields()?,
                )
                .await?;

            info!(
                account_id,
                course_id,
                coupons = snapshot.course_coupon_info.len(),
                "checkout: snapshot written"
            );
        }

        let general = self.coupon_matcher.resolve_general(account_id, now).await?;
        let general_key = CacheKey::checkout_general(account_id);
        // Overwrite, not merge: fields from a previous run must not survive.
        self.kv.delete(general_key.as_str()).await?;
        if !general.is_empty() {
            let fields = general
                .iter()
                .map(|record| {
                    Ok((
                        record.record_id.to_string(),
                        serde_json::to_string(&record.info)?,
                    ))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            self.kv.hash_set(general_key.as_str(), fields).await?;
        }

        info!(
            account_id,
            courses = course_ids.len(),
            general_coupons = general.len(),
            "checkout: batch completed"
        );
        Ok(())
    }

    /// Everything checkout initiation has written for the account. Courses
    /// without a snapshot are absent from the mapping; an absent general
    /// snapshot is an empty map, not an error.
    pub async fn get(&self, account_id: i64) -> Result<CheckoutView, CheckoutError> {
        let keys = self
            .kv
            .scan_keys(CacheKey::checkout_pattern(account_id).as_str())
            .await?;

        let mut per_course = HashMap::with_capacity(keys.len());
        for key in keys {
            let Some(fields) = self.kv.hash_get_all(&key).await? else {
                continue;
            };
            let snapshot = CheckoutSnapshot::from_hash(&fields)?;
            per_course.insert(snapshot.course_info.course_id, snapshot);
        }

        let general = match self
            .kv
            .hash_get_all(CacheKey::checkout_general(account_id).as_str())
            .await?
        {
            Some(fields) => fields
                .into_iter()
                .map(|(record_id, json)| {
                    let record_id: i64 = record_id.parse()?;
                    let info: CouponInfo = serde_json::from_str(&json)?;
                    Ok((record_id, info))
                })
                .collect::<anyhow::Result<HashMap<_, _>>>()?,
            None => HashMap::new(),
        };

        debug!(
            account_id,
            courses = per_course.len(),
            general_coupons = general.len(),
            "checkout: aggregate read"
        );
        Ok(CheckoutView {
            per_course,
            general,
        })
    }
}
