pub mod coupon_record_statuses;
pub mod coupon_types;
pub mod valid_periods;
