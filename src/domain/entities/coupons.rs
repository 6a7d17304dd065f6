use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::{coupon_records, coupons};

/// Coupon issuance rule. An unbound entity reference (both columns null)
/// makes the coupon general.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = coupons)]
pub struct CouponEntity {
    pub id: i64,
    pub name: String,
    pub brief: Option<String>,
    pub coupon_type: i16,
    pub money_equivalent_value: Option<i32>,
    pub off_percent: Option<i16>,
    pub minimum_consume: i32,
    pub entity_kind: Option<String>,
    pub entity_id: Option<i64>,
    pub quantity: i32,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub valid_begin_date: Option<NaiveDate>,
    pub valid_end_date: Option<NaiveDate>,
    pub coupon_valid_days: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// One coupon handed to one account.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = coupon_records)]
pub struct CouponRecordEntity {
    pub id: i64,
    pub coupon_id: i64,
    pub account_id: i64,
    pub status: i16,
    pub get_time: DateTime<Utc>,
    pub used_time: Option<DateTime<Utc>>,
}
