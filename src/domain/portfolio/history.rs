use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::market_data::{TimeInterval, Timestamp};

const VALUE_SWING: f64 = 1000.0;
const CHANGE_SWING: f64 = 20.0;
const MIN_BAR_PERCENT: f64 = 10.0;

/// One daily point of the portfolio value chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHistoryPoint {
    pub timestamp: Timestamp,
    pub value: f64,
    /// Day-over-day change in percent
    pub change: f64,
}

/// `days` points, oldest first, one day apart, the last one at `now_ms`.
/// Values swing up to ±500 around `base_value`, changes up to ±10%.
pub fn generate_history<R: Rng + ?Sized>(
    base_value: f64,
    days: usize,
    now_ms: u64,
    rng: &mut R,
) -> Vec<PortfolioHistoryPoint> {
    let day_ms = TimeInterval::OneDay.duration_ms();
    (0..days)
        .map(|i| {
            let back = (days - 1 - i) as u64 * day_ms;
            PortfolioHistoryPoint {
                timestamp: Timestamp::from_millis(now_ms.saturating_sub(back)),
                value: base_value + (rng.gen_range(0.0..1.0) - 0.5) * VALUE_SWING,
                change: (rng.gen_range(0.0..1.0) - 0.5) * CHANGE_SWING,
            }
        })
        .collect()
}

/// Bar heights in percent of the tallest point, never below 10%.
pub fn bar_heights(history: &[PortfolioHistoryPoint]) -> Vec<f64> {
    let max = history.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    history
        .iter()
        .map(|p| {
            if max > 0.0 {
                (p.value / max * 100.0).max(MIN_BAR_PERCENT)
            } else {
                MIN_BAR_PERCENT
            }
        })
        .collect()
}
