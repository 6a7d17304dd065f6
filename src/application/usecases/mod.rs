pub mod cart;
pub mod checkout;
pub mod coupon_matcher;
pub mod login;
pub mod price_resolver;
pub mod token_auth;
