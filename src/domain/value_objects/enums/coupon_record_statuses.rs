use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Lifecycle of one issued coupon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CouponRecordStatus {
    Unused,
    Used,
    Expired,
}

impl CouponRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponRecordStatus::Unused => "unused",
            CouponRecordStatus::Used => "used",
            CouponRecordStatus::Expired => "expired",
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            CouponRecordStatus::Unused => 0,
            CouponRecordStatus::Used => 1,
            CouponRecordStatus::Expired => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(CouponRecordStatus::Unused),
            1 => Some(CouponRecordStatus::Used),
            2 => Some(CouponRecordStatus::Expired),
            _ => None,
        }
    }
}

impl Display for CouponRecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
