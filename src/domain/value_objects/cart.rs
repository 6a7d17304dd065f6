use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::valid_periods::ValidPeriod;
use crate::domain::value_objects::pricing::PricePolicyModel;

pub const FIELD_COURSE_ID: &str = "course_id";
pub const FIELD_COURSE_TITLE: &str = "course_title";
pub const FIELD_DEFAULT_PRICE_POLICY_ID: &str = "default_price_policy_id";
pub const FIELD_PRICE_DICT: &str = "price_dict";

/// One policy as frozen into a cart entry at add time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePolicySnapshot {
    pub price: Decimal,
    pub valid_period: ValidPeriod,
    pub valid_period_label: String,
}

impl From<&PricePolicyModel> for PricePolicySnapshot {
    fn from(model: &PricePolicyModel) -> Self {
        Self {
            price: model.price,
            valid_period: model.valid_period,
            valid_period_label: model.label().to_string(),
        }
    }
}

/// Ephemeral cart entry, stored as a hash at `cart:{account}:{course}`.
/// The title and `price_dict` are snapshots captured at add time and are
/// never re-synced against the catalog. `default_price_policy_id` must be a
/// key of `price_dict`; writers enforce it, readers may assume it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    pub course_id: i64,
    pub course_title: String,
    pub price_dict: HashMap<i64, PricePolicySnapshot>,
    pub default_price_policy_id: i64,
}

impl CartEntry {
    pub fn to_hash_fields(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            (FIELD_COURSE_ID.to_string(), self.course_id.to_string()),
            (FIELD_COURSE_TITLE.to_string(), self.course_title.clone()),
            (
                FIELD_DEFAULT_PRICE_POLICY_ID.to_string(),
                self.default_price_policy_id.to_string(),
            ),
            (
                FIELD_PRICE_DICT.to_string(),
                serde_json::to_string(&self.price_dict)?,
            ),
        ])
    }

    pub fn from_hash(fields: &HashMap<String, String>) -> Result<Self> {
        let course_id = required(fields, FIELD_COURSE_ID)?
            .parse()
            .context("cart entry: course_id is not an id")?;
        let course_title = required(fields, FIELD_COURSE_TITLE)?.to_string();
        let default_price_policy_id = required(fields, FIELD_DEFAULT_PRICE_POLICY_ID)?
            .parse()
            .context("cart entry: default_price_policy_id is not an id")?;
        let price_dict = serde_json::from_str(required(fields, FIELD_PRICE_DICT)?)
            .context("cart entry: price_dict is not valid JSON")?;

        Ok(Self {
            course_id,
            course_title,
            price_dict,
            default_price_policy_id,
        })
    }
}

fn required<'a>(fields: &'a HashMap<String, String>, field: &str) -> Result<&'a String> {
    fields
        .get(field)
        .ok_or_else(|| anyhow!("cart entry: missing field {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> CartEntry {
        CartEntry {
            course_id: 7,
            course_title: "Intro to Systems".to_string(),
            price_dict: HashMap::from([(
                3,
                PricePolicySnapshot {
                    price: Decimal::new(19900, 2),
                    valid_period: ValidPeriod::OneMonth,
                    valid_period_label: "1 month".to_string(),
                },
            )]),
            default_price_policy_id: 3,
        }
    }

    #[test]
    fn hash_fields_round_trip() {
        let entry = sample_entry();
        let fields: HashMap<String, String> =
            entry.to_hash_fields().unwrap().into_iter().collect();

        assert_eq!(CartEntry::from_hash(&fields).unwrap(), entry);
    }

    #[test]
    fn missing_field_is_an_error() {
        let entry = sample_entry();
        let mut fields: HashMap<String, String> =
            entry.to_hash_fields().unwrap().into_iter().collect();
        fields.remove(FIELD_PRICE_DICT);

        assert!(CartEntry::from_hash(&fields).is_err());
    }
}
