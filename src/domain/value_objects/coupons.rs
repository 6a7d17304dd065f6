use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::coupons::{CouponEntity, CouponRecordEntity};
use crate::domain::value_objects::enums::{
    coupon_record_statuses::CouponRecordStatus, coupon_types::CouponType,
};

/// What checkout snapshots carry for one coupon record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponInfo {
    pub name: String,
    pub coupon_type: String,
    pub money_equivalent_value: Option<i32>,
    pub off_percent: Option<i16>,
    pub minimum_consume: i32,
    pub valid_end_date: Option<NaiveDate>,
}

/// A coupon record joined with its definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRecordModel {
    pub record_id: i64,
    pub coupon_id: i64,
    pub status: CouponRecordStatus,
    pub get_time: DateTime<Utc>,
    pub used_time: Option<DateTime<Utc>>,
    pub info: CouponInfo,
}

impl CouponRecordModel {
    pub fn from_rows(record: CouponRecordEntity, coupon: CouponEntity) -> Result<Self> {
        let coupon_type = CouponType::from_code(coupon.coupon_type)
            .ok_or_else(|| anyhow!("coupon {}: unknown type code {}", coupon.id, coupon.coupon_type))?;
        let status = CouponRecordStatus::from_code(record.status).ok_or_else(|| {
            anyhow!(
                "coupon record {}: unknown status code {}",
                record.id,
                record.status
            )
        })?;

        Ok(Self {
            record_id: record.id,
            coupon_id: coupon.id,
            status,
            get_time: record.get_time,
            used_time: record.used_time,
            info: CouponInfo {
                name: coupon.name,
                coupon_type: coupon_type.as_str().to_string(),
                money_equivalent_value: coupon.money_equivalent_value,
                off_percent: coupon.off_percent,
                minimum_consume: coupon.minimum_consume,
                valid_end_date: coupon.valid_end_date,
            },
        })
    }
}
