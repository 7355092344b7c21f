use std::cell::RefCell;
use std::rc::Rc;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::Serialize;

use super::simulate_latency;
use crate::domain::{
    errors::AppResult,
    logging::{LogComponent, get_logger, get_time_provider},
    market_data::Symbol,
    portfolio::{
        Holding, PortfolioHistoryPoint, PortfolioStats, RiskBucket, SortKey, Timeframe,
        aggregate_over, generate_history, sort_holdings_over,
    },
};

const HISTORY_BASE_VALUE: f64 = 3420.0;
const HISTORY_DAYS: usize = 30;

/// Everything the portfolio dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub holdings: Vec<Holding>,
    pub stats: PortfolioStats,
    pub history: Vec<PortfolioHistoryPoint>,
    pub timeframe: Timeframe,
    pub sort_key: SortKey,
}

impl PortfolioSnapshot {
    pub fn build<R: Rng + ?Sized>(
        holdings: Vec<Holding>,
        timeframe: Timeframe,
        sort_key: SortKey,
        now_ms: u64,
        rng: &mut R,
    ) -> Self {
        let stats = aggregate_over(&holdings, timeframe);
        Self {
            holdings: sort_holdings_over(&holdings, sort_key, timeframe),
            stats,
            history: generate_history(HISTORY_BASE_VALUE, HISTORY_DAYS, now_ms, rng),
            timeframe,
            sort_key,
        }
    }

    /// Re-sorts in place; totals do not depend on order.
    pub fn resort(&mut self, sort_key: SortKey) {
        self.holdings = sort_holdings_over(&self.holdings, sort_key, self.timeframe);
        self.sort_key = sort_key;
    }
}

#[allow(clippy::too_many_arguments)]
fn holding(
    token: &str,
    symbol: &str,
    balance: f64,
    value: f64,
    buy_price: f64,
    current_price: f64,
    changes: (f64, f64, f64),
    allocation: f64,
    risk: RiskBucket,
    market_cap: f64,
    volume_24h: f64,
) -> Holding {
    Holding {
        token: token.to_string(),
        symbol: Symbol::from(symbol),
        balance,
        value,
        buy_price,
        current_price,
        change: changes.0,
        change_7d: changes.1,
        change_30d: changes.2,
        allocation,
        risk,
        market_cap,
        volume_24h,
    }
}

/// Demo positions shown for a connected wallet
pub fn mock_holdings() -> Vec<Holding> {
    vec![
        holding("Moon Dog", "MDOG", 15_420.50, 1200.34, 0.00234, 0.00341, (45.7, 123.4, 234.5), 35.2, RiskBucket::High, 2_340_000.0, 890_000.0),
        holding("Rocket Cat", "RCAT", 8_930.25, 560.78, 0.00156, 0.00137, (-12.3, -8.9, 67.8), 16.4, RiskBucket::Medium, 1_560_000.0, 450_000.0),
        holding("Diamond Hands", "DHAND", 25_600.00, 890.45, 0.00445, 0.00548, (23.1, 45.6, 89.7), 26.0, RiskBucket::Low, 4_450_000.0, 670_000.0),
        holding("Galaxy Frog", "GFROG", 7_650.33, 234.67, 0.00098, 0.00251, (156.8, 189.3, 445.7), 6.9, RiskBucket::VeryHigh, 980_000.0, 340_000.0),
        holding("Crypto King", "CKING", 3_200.12, 534.89, 0.01234, 0.01671, (35.4, 28.7, 156.9), 15.6, RiskBucket::Medium, 12_340_000.0, 890_000.0),
    ]
}

/// Loads the simulated portfolio of the connected wallet
#[derive(Clone)]
pub struct PortfolioService {
    delay_ms: u32,
    rng: Rc<RefCell<SmallRng>>,
}

impl PortfolioService {
    pub fn new(delay_ms: u32, seed: u64) -> Self {
        Self { delay_ms, rng: Rc::new(RefCell::new(SmallRng::seed_from_u64(seed))) }
    }

    pub async fn load(&self, timeframe: Timeframe, sort_key: SortKey) -> AppResult<PortfolioSnapshot> {
        get_logger().debug(
            LogComponent::Application("Portfolio"),
            &format!("Loading portfolio for {timeframe}"),
        );
        simulate_latency(self.delay_ms).await;

        let now_ms = get_time_provider().current_timestamp();
        let snapshot = PortfolioSnapshot::build(
            mock_holdings(),
            timeframe,
            sort_key,
            now_ms,
            &mut *self.rng.borrow_mut(),
        );

        get_logger().info(
            LogComponent::Application("Portfolio"),
            &format!(
                "{} holdings, total ${:.2}",
                snapshot.stats.holdings_count, snapshot.stats.total_value
            ),
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_portfolio_totals() {
        let mut rng = SmallRng::seed_from_u64(1);
        let snapshot =
            PortfolioSnapshot::build(mock_holdings(), Timeframe::Day, SortKey::Value, 0, &mut rng);

        assert_eq!(snapshot.stats.holdings_count, 5);
        assert!((snapshot.stats.total_value - 3421.13).abs() < 1e-9);
        assert_eq!(snapshot.holdings[0].symbol.value(), "MDOG");
        assert_eq!(snapshot.history.len(), 30);
        assert_eq!(
            snapshot.stats.best_performer.as_ref().map(|h| h.symbol.value()),
            Some("GFROG")
        );
        assert_eq!(
            snapshot.stats.worst_performer.as_ref().map(|h| h.symbol.value()),
            Some("RCAT")
        );
    }

    #[test]
    fn resort_keeps_totals() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut snapshot =
            PortfolioSnapshot::build(mock_holdings(), Timeframe::Week, SortKey::Value, 0, &mut rng);
        let stats = snapshot.stats.clone();

        snapshot.resort(SortKey::Risk);
        assert_eq!(snapshot.holdings[0].risk, RiskBucket::Low);
        assert_eq!(snapshot.holdings[4].risk, RiskBucket::VeryHigh);
        assert_eq!(snapshot.stats, stats);
    }

    #[test]
    fn weekly_change_sort_is_descending() {
        let mut rng = SmallRng::seed_from_u64(1);
        let snapshot =
            PortfolioSnapshot::build(mock_holdings(), Timeframe::Week, SortKey::Change, 0, &mut rng);
        let changes: Vec<f64> =
            snapshot.holdings.iter().map(|h| h.change_for(Timeframe::Week)).collect();

        assert_eq!(changes, [189.3, 123.4, 45.6, 28.7, -8.9]);
    }
}
