use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Discount mechanics of a coupon definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CouponType {
    /// Fixed amount off, no minimum.
    FlatAmount,
    /// Fixed amount off once the order reaches `minimum_consume`.
    ThresholdAmount,
    /// Percentage off the order total.
    PercentOff,
}

impl CouponType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponType::FlatAmount => "flat_amount",
            CouponType::ThresholdAmount => "threshold_amount",
            CouponType::PercentOff => "percent_off",
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            CouponType::FlatAmount => 0,
            CouponType::ThresholdAmount => 1,
            CouponType::PercentOff => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(CouponType::FlatAmount),
            1 => Some(CouponType::ThresholdAmount),
            2 => Some(CouponType::PercentOff),
            _ => None,
        }
    }
}

impl Display for CouponType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
