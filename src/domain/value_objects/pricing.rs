use anyhow::anyhow;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::entities::price_policies::PricePolicyEntity;
use crate::domain::value_objects::enums::valid_periods::ValidPeriod;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricePolicyModel {
    pub id: i64,
    pub price: Decimal,
    pub valid_period: ValidPeriod,
}

impl PricePolicyModel {
    pub fn label(&self) -> &'static str {
        self.valid_period.label()
    }
}

impl TryFrom<&PricePolicyEntity> for PricePolicyModel {
    type Error = anyhow::Error;

    fn try_from(entity: &PricePolicyEntity) -> Result<Self, Self::Error> {
        let valid_period = ValidPeriod::try_from(entity.valid_period)
            .map_err(|err| anyhow!("price policy {}: {err}", entity.id))?;

        Ok(Self {
            id: entity.id,
            price: entity.price,
            valid_period,
        })
    }
}
