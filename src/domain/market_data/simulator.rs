//! Synthetic market data standing in for a live price feed.
//!
//! The simulator is pure apart from the injected random source and the
//! caller-supplied "now", so the same seed and clock always yield the same
//! series.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Candle, OHLCV, Price, PriceTick, TimeInterval, Timestamp, Volume};
use crate::domain::errors::{AppError, AppResult};

const OPEN_JITTER: f64 = 0.02;
const WICK_SPREAD: f64 = 0.05;
const MAX_VOLUME: f64 = 1_000_000.0;

/// Tunables for candle and tick generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatorSettings {
    /// Total relative swing of the close around the base price
    pub volatility: f64,
    /// Total relative swing of a tick around the base price
    pub tick_spread: f64,
    pub interval: TimeInterval,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self { volatility: 0.1, tick_spread: 0.4273, interval: TimeInterval::OneMinute }
    }
}

/// Domain service producing candle and tick series around a base price
#[derive(Debug, Clone, Default)]
pub struct MarketDataSimulator {
    settings: SimulatorSettings,
}

impl MarketDataSimulator {
    pub fn new(settings: SimulatorSettings) -> AppResult<Self> {
        if !(settings.volatility.is_finite() && (0.0..2.0).contains(&settings.volatility)) {
            return Err(AppError::ValidationError(format!(
                "volatility must be in [0, 2), got {}",
                settings.volatility
            )));
        }
        if !(settings.tick_spread.is_finite() && (0.0..2.0).contains(&settings.tick_spread)) {
            return Err(AppError::ValidationError(format!(
                "tick spread must be in [0, 2), got {}",
                settings.tick_spread
            )));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    /// `count` candles, oldest first, one interval apart, the last one at `now_ms`.
    ///
    /// Each close is the base price perturbed by up to `volatility / 2` in
    /// either direction. Open, high and low are perturbed from the close and
    /// then widened so that `low <= open, close <= high` always holds.
    pub fn produce<R: Rng + ?Sized>(
        &self,
        base_price: f64,
        count: usize,
        now_ms: u64,
        rng: &mut R,
    ) -> AppResult<Vec<Candle>> {
        validate_request(base_price, count)?;
        let volatility = self.settings.volatility;

        let candles = self
            .timestamps(count, now_ms)
            .map(|timestamp| {
                let close = base_price * (1.0 + (rng.gen_range(0.0..1.0) - 0.5) * volatility);
                let open = close * (1.0 + (rng.gen_range(0.0..1.0) - 0.5) * OPEN_JITTER);
                let high = close * (1.0 + rng.gen_range(0.0..1.0) * WICK_SPREAD);
                let low = close * (1.0 - rng.gen_range(0.0..1.0) * WICK_SPREAD);
                let volume = rng.gen_range(0.0..MAX_VOLUME);

                Candle::new(
                    timestamp,
                    OHLCV::new(
                        Price::new(open),
                        Price::new(high.max(open).max(close)),
                        Price::new(low.min(open).min(close)),
                        Price::new(close),
                        Volume::new(volume),
                    ),
                )
            })
            .collect();

        Ok(candles)
    }

    /// Single-price series for the compact trading panel.
    pub fn produce_ticks<R: Rng + ?Sized>(
        &self,
        base_price: f64,
        count: usize,
        now_ms: u64,
        rng: &mut R,
    ) -> AppResult<Vec<PriceTick>> {
        validate_request(base_price, count)?;
        let spread = base_price * self.settings.tick_spread;

        let ticks = self
            .timestamps(count, now_ms)
            .map(|timestamp| PriceTick {
                timestamp,
                price: Price::new(base_price + (rng.gen_range(0.0..1.0) - 0.5) * spread),
                volume: Volume::new(rng.gen_range(0.0..MAX_VOLUME)),
            })
            .collect();

        Ok(ticks)
    }

    fn timestamps(&self, count: usize, now_ms: u64) -> impl Iterator<Item = Timestamp> {
        let step = self.settings.interval.duration_ms();
        let span = step * (count as u64 - 1);
        // keep the first candle at or after the epoch
        let end = now_ms.max(span);
        (0..count as u64).map(move |i| Timestamp::from_millis(end - span + i * step))
    }
}

fn validate_request(base_price: f64, count: usize) -> AppResult<()> {
    if !(base_price.is_finite() && base_price > 0.0) {
        return Err(AppError::ValidationError(format!(
            "base price must be positive, got {base_price}"
        )));
    }
    if count == 0 {
        return Err(AppError::ValidationError("count must be greater than zero".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn produces_requested_count_ending_now() {
        let sim = MarketDataSimulator::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let candles = sim.produce(1.0, 10, NOW, &mut rng).unwrap();

        assert_eq!(candles.len(), 10);
        assert_eq!(candles.last().unwrap().timestamp.value(), NOW);
        assert!(candles.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn close_stays_within_volatility_band() {
        let sim = MarketDataSimulator::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let candles = sim.produce(0.00234, 100, NOW, &mut rng).unwrap();

        for candle in &candles {
            let ratio = candle.ohlcv.close.value() / 0.00234;
            assert!((0.95..=1.05).contains(&ratio), "close ratio {ratio}");
            assert!(candle.ohlcv.is_valid());
        }
    }

    #[test]
    fn early_clock_does_not_underflow() {
        let sim = MarketDataSimulator::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let candles = sim.produce(5.0, 3, 0, &mut rng).unwrap();

        assert_eq!(candles[0].timestamp.value(), 0);
        assert_eq!(candles[2].timestamp.value(), 120_000);
    }

    #[test]
    fn rejects_bad_requests() {
        let sim = MarketDataSimulator::default();
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(matches!(sim.produce(0.0, 5, NOW, &mut rng), Err(AppError::ValidationError(_))));
        assert!(matches!(
            sim.produce(f64::NAN, 5, NOW, &mut rng),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(sim.produce_ticks(1.0, 0, NOW, &mut rng), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn rejects_out_of_range_settings() {
        let settings = SimulatorSettings { volatility: 3.0, ..SimulatorSettings::default() };
        assert!(MarketDataSimulator::new(settings).is_err());
    }

    #[test]
    fn ticks_stay_positive_and_near_base() {
        let sim = MarketDataSimulator::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let ticks = sim.produce_ticks(0.00234, 50, NOW, &mut rng).unwrap();

        assert_eq!(ticks.len(), 50);
        for tick in &ticks {
            assert!(tick.price.value() > 0.00234 - 0.0005 - 1e-9);
            assert!(tick.price.value() < 0.00234 + 0.0005 + 1e-9);
        }
    }

    #[test]
    fn same_seed_same_series() {
        let sim = MarketDataSimulator::default();
        let a = sim.produce(2.0, 20, NOW, &mut SmallRng::seed_from_u64(9)).unwrap();
        let b = sim.produce(2.0, 20, NOW, &mut SmallRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
