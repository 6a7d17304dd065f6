use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::cart::CartEntry;
use crate::domain::value_objects::coupons::CouponInfo;

pub const FIELD_COURSE_INFO: &str = "course_info";
pub const FIELD_COURSE_COUPON_INFO: &str = "course_coupon_info";

/// Per-course settlement snapshot, stored as a hash at
/// `checkout:{account}:{course}`. Captured at checkout initiation; a later
/// cart change does not touch an existing snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutSnapshot {
    pub course_info: CartEntry,
    pub course_coupon_info: HashMap<i64, CouponInfo>,
}

impl CheckoutSnapshot {
    pub fn to_hash_fields(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            (
                FIELD_COURSE_INFO.to_string(),
                serde_json::to_string(&self.course_info)?,
            ),
            (
                FIELD_COURSE_COUPON_INFO.to_string(),
                serde_json::to_string(&self.course_coupon_info)?,
            ),
        ])
    }

    pub fn from_hash(fields: &HashMap<String, String>) -> Result<Self> {
        let course_info = fields
            .get(FIELD_COURSE_INFO)
            .ok_or_else(|| anyhow!("checkout snapshot: missing field {FIELD_COURSE_INFO}"))?;
        let course_coupon_info = fields
            .get(FIELD_COURSE_COUPON_INFO)
            .ok_or_else(|| anyhow!("checkout snapshot: missing field {FIELD_COURSE_COUPON_INFO}"))?;

        Ok(Self {
            course_info: serde_json::from_str(course_info)
                .context("checkout snapshot: course_info is not valid JSON")?,
            course_coupon_info: serde_json::from_str(course_coupon_info)
                .context("checkout snapshot: course_coupon_info is not valid JSON")?,
        })
    }
}

/// Aggregate returned by checkout retrieval. Courses without a snapshot are
/// simply absent; an account without a general snapshot gets an empty map.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutView {
    pub per_course: HashMap<i64, CheckoutSnapshot>,
    pub general: HashMap<i64, CouponInfo>,
}
