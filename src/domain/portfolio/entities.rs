use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::market_data::Symbol;

/// Coarse risk label attached to a holding. Declaration order is severity order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum RiskBucket {
    Low,
    Medium,
    High,
    #[strum(to_string = "Very High", serialize = "VeryHigh")]
    #[serde(rename = "Very High", alias = "VeryHigh")]
    VeryHigh,
}

impl RiskBucket {
    /// Fixed severity rank used when sorting by risk
    pub fn rank(&self) -> u8 {
        match self {
            RiskBucket::Low => 1,
            RiskBucket::Medium => 2,
            RiskBucket::High => 3,
            RiskBucket::VeryHigh => 4,
        }
    }
}

/// Window over which the dashboard reports change and P&L
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Timeframe {
    #[default]
    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    Day,
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    Week,
    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    Month,
}

/// One token position in a portfolio view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub token: String,
    pub symbol: Symbol,
    pub balance: f64,
    /// Current position value in USD
    pub value: f64,
    pub buy_price: f64,
    pub current_price: f64,
    /// 24h change in percent
    pub change: f64,
    #[serde(default, rename = "change7d")]
    pub change_7d: f64,
    #[serde(default, rename = "change30d")]
    pub change_30d: f64,
    /// Informational share of the portfolio in percent, not enforced to sum to 100
    #[serde(default)]
    pub allocation: f64,
    pub risk: RiskBucket,
    #[serde(default)]
    pub market_cap: f64,
    #[serde(default, rename = "volume24h")]
    pub volume_24h: f64,
}

impl Holding {
    pub fn change_for(&self, timeframe: Timeframe) -> f64 {
        match timeframe {
            Timeframe::Day => self.change,
            Timeframe::Week => self.change_7d,
            Timeframe::Month => self.change_30d,
        }
    }

    /// value * change / 100 for the given window
    pub fn pnl_for(&self, timeframe: Timeframe) -> f64 {
        self.value * self.change_for(timeframe) / 100.0
    }

    pub fn pnl(&self) -> f64 {
        self.pnl_for(Timeframe::Day)
    }
}
