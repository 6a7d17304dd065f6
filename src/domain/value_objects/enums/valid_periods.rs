use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Access duration a price policy sells. Closed set; persisted as days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "i16", try_from = "i16")]
pub enum ValidPeriod {
    OneDay,
    ThreeDays,
    OneWeek,
    TwoWeeks,
    OneMonth,
    TwoMonths,
    ThreeMonths,
    SixMonths,
    TwelveMonths,
    TwentyFourMonths,
}

impl ValidPeriod {
    pub fn days(&self) -> i16 {
        match self {
            ValidPeriod::OneDay => 1,
            ValidPeriod::ThreeDays => 3,
            ValidPeriod::OneWeek => 7,
            ValidPeriod::TwoWeeks => 14,
            ValidPeriod::OneMonth => 30,
            ValidPeriod::TwoMonths => 60,
            ValidPeriod::ThreeMonths => 90,
            ValidPeriod::SixMonths => 180,
            ValidPeriod::TwelveMonths => 360,
            ValidPeriod::TwentyFourMonths => 720,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValidPeriod::OneDay => "1 day",
            ValidPeriod::ThreeDays => "3 days",
            ValidPeriod::OneWeek => "1 week",
            ValidPeriod::TwoWeeks => "2 weeks",
            ValidPeriod::OneMonth => "1 month",
            ValidPeriod::TwoMonths => "2 months",
            ValidPeriod::ThreeMonths => "3 months",
            ValidPeriod::SixMonths => "6 months",
            ValidPeriod::TwelveMonths => "12 months",
            ValidPeriod::TwentyFourMonths => "24 months",
        }
    }
}

impl From<ValidPeriod> for i16 {
    fn from(value: ValidPeriod) -> Self {
        value.days()
    }
}

impl TryFrom<i16> for ValidPeriod {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ValidPeriod::OneDay),
            3 => Ok(ValidPeriod::ThreeDays),
            7 => Ok(ValidPeriod::OneWeek),
            14 => Ok(ValidPeriod::TwoWeeks),
            30 => Ok(ValidPeriod::OneMonth),
            60 => Ok(ValidPeriod::TwoMonths),
            90 => Ok(ValidPeriod::ThreeMonths),
            180 => Ok(ValidPeriod::SixMonths),
            360 => Ok(ValidPeriod::TwelveMonths),
            720 => Ok(ValidPeriod::TwentyFourMonths),
            other => Err(format!("unknown valid period: {other} days")),
        }
    }
}

impl Display for ValidPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
