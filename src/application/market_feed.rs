use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use rand::{SeedableRng, rngs::SmallRng};
use serde::Serialize;

use crate::domain::{
    errors::AppResult,
    logging::{LogComponent, get_logger, get_time_provider},
    market_data::{Candle, CandleSeries, MarketDataSimulator, Price, PriceTick, Timestamp},
};

/// What a market view renders after each refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub candles: Vec<Candle>,
    pub ticks: Vec<PriceTick>,
    pub last_price: Option<Price>,
    pub price_range: Option<(Price, Price)>,
    pub generated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedOptions {
    pub base_price: f64,
    pub candle_count: usize,
    pub tick_count: usize,
    pub refresh_ms: u32,
}

type Listener = Box<dyn FnMut(&MarketSnapshot)>;

struct FeedState {
    simulator: MarketDataSimulator,
    rng: SmallRng,
    series: CandleSeries,
    ticks: Vec<PriceTick>,
    options: FeedOptions,
    listener: Option<Listener>,
    refreshes: u64,
}

impl FeedState {
    fn refresh(&mut self, now_ms: u64) -> AppResult<MarketSnapshot> {
        let FeedOptions { base_price, candle_count, tick_count, .. } = self.options;

        let candles = self.simulator.produce(base_price, candle_count, now_ms, &mut self.rng)?;
        self.ticks = self.simulator.produce_ticks(base_price, tick_count, now_ms, &mut self.rng)?;
        self.series.replace_all(candles);
        self.refreshes += 1;

        Ok(MarketSnapshot {
            candles: self.series.get_candles().iter().cloned().collect(),
            ticks: self.ticks.clone(),
            last_price: self.series.latest_price(),
            price_range: self.series.price_range(),
            generated_at: Timestamp::from_millis(now_ms),
        })
    }
}

/// Regenerates simulated market data on a fixed period.
///
/// The timer is owned by the feed: `stop()` or dropping the feed cancels it,
/// so a closed view never receives another update.
pub struct LiveMarketFeed {
    state: Rc<RefCell<FeedState>>,
    timer: Option<Interval>,
}

impl LiveMarketFeed {
    pub fn new(simulator: MarketDataSimulator, options: FeedOptions, seed: u64) -> Self {
        Self {
            state: Rc::new(RefCell::new(FeedState {
                simulator,
                rng: SmallRng::seed_from_u64(seed),
                series: CandleSeries::new(options.candle_count.max(1)),
                ticks: Vec::new(),
                options,
                listener: None,
                refreshes: 0,
            })),
            timer: None,
        }
    }

    pub fn on_update(&self, listener: impl FnMut(&MarketSnapshot) + 'static) {
        self.state.borrow_mut().listener = Some(Box::new(listener));
    }

    /// One immediate regeneration at `now_ms`, delivered to the listener.
    pub fn refresh_at(&self, now_ms: u64) -> AppResult<MarketSnapshot> {
        refresh_and_notify(&self.state, now_ms)
    }

    pub fn refresh(&self) -> AppResult<MarketSnapshot> {
        self.refresh_at(get_time_provider().current_timestamp())
    }

    /// Emits a first snapshot right away, then one per period.
    pub fn start(&mut self) -> AppResult<()> {
        if self.timer.is_some() {
            return Ok(());
        }
        self.refresh()?;

        let period = self.state.borrow().options.refresh_ms;
        let state = Rc::downgrade(&self.state);
        self.timer = Some(Interval::new(period, move || {
            let Some(state) = state.upgrade() else {
                return;
            };
            let now_ms = get_time_provider().current_timestamp();
            if let Err(e) = refresh_and_notify(&state, now_ms) {
                get_logger().error(
                    LogComponent::Application("MarketFeed"),
                    &format!("Refresh failed: {e}"),
                );
            }
        }));

        get_logger().info(
            LogComponent::Application("MarketFeed"),
            &format!("Started, refreshing every {period} ms"),
        );
        Ok(())
    }

    pub fn stop(&mut self) {
        // dropping the Interval clears it
        if self.timer.take().is_some() {
            get_logger().info(LogComponent::Application("MarketFeed"), "Stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn refresh_count(&self) -> u64 {
        self.state.borrow().refreshes
    }

    pub fn latest_price(&self) -> Option<Price> {
        self.state.borrow().series.latest_price()
    }
}

impl Drop for LiveMarketFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

fn refresh_and_notify(state: &Rc<RefCell<FeedState>>, now_ms: u64) -> AppResult<MarketSnapshot> {
    let snapshot = state.borrow_mut().refresh(now_ms)?;

    // The listener may call back into the feed, so it runs outside the borrow.
    let listener = state.borrow_mut().listener.take();
    if let Some(mut listener) = listener {
        listener(&snapshot);
        let mut state = state.borrow_mut();
        if state.listener.is_none() {
            state.listener = Some(listener);
        }
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> FeedOptions {
        FeedOptions { base_price: 0.00234, candle_count: 20, tick_count: 10, refresh_ms: 5_000 }
    }

    #[test]
    fn refresh_notifies_listener_with_fresh_series() {
        let feed = LiveMarketFeed::new(MarketDataSimulator::default(), options(), 5);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        feed.on_update(move |snapshot| sink.borrow_mut().push(snapshot.candles.len()));

        let snapshot = feed.refresh_at(1_700_000_000_000).unwrap();
        feed.refresh_at(1_700_000_005_000).unwrap();

        assert_eq!(*seen.borrow(), vec![20, 20]);
        assert_eq!(snapshot.ticks.len(), 10);
        assert_eq!(snapshot.generated_at.value(), 1_700_000_000_000);
        assert_eq!(feed.refresh_count(), 2);
        assert!(!feed.is_running());
    }

    #[test]
    fn bad_base_price_surfaces_validation_error() {
        let feed = LiveMarketFeed::new(
            MarketDataSimulator::default(),
            FeedOptions { base_price: -1.0, ..options() },
            5,
        );
        assert!(feed.refresh_at(0).is_err());
        assert_eq!(feed.refresh_count(), 0);
        assert!(feed.latest_price().is_none());
    }
}
