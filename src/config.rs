use serde::{Deserialize, Serialize};

use crate::domain::errors::AppResult;
use crate::domain::market_data::SimulatorSettings;

/// Runtime tunables. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Base URL of the search endpoint used by the news feed
    pub news_base_url: String,
    pub market_refresh_ms: u32,
    pub candle_count: usize,
    pub tick_count: usize,
    pub simulator: SimulatorSettings,
    pub portfolio_delay_ms: u32,
    pub token_delay_ms: u32,
    pub analysis_delay_ms: u32,
    pub market_order_delay_ms: u32,
    pub notification_capacity: usize,
    pub notification_ttl_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            news_base_url: "https://ide-api.infinityg.ai".to_string(),
            market_refresh_ms: 5_000,
            candle_count: 100,
            tick_count: 50,
            simulator: SimulatorSettings::default(),
            portfolio_delay_ms: 1_500,
            token_delay_ms: 1_000,
            analysis_delay_ms: 3_000,
            market_order_delay_ms: 1_000,
            notification_capacity: 20,
            notification_ttl_ms: 5_000,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"marketRefreshMs": 1000, "candleCount": 30}"#).unwrap();
        assert_eq!(config.market_refresh_ms, 1_000);
        assert_eq!(config.candle_count, 30);
        assert_eq!(config.tick_count, 50);
        assert_eq!(config.simulator, SimulatorSettings::default());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(AppConfig::from_json("[1,2]").is_err());
    }
}
