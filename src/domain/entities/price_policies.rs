use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::infrastructure::postgres::schema::price_policies;

/// One (valid period, price) offer attached to a priceable entity.
/// Unique per (entity kind, entity id, valid period).
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = price_policies)]
pub struct PricePolicyEntity {
    pub id: i64,
    pub entity_kind: String,
    pub entity_id: i64,
    pub valid_period: i16,
    pub price: Decimal,
}
