pub use super::value_objects::{OHLCV, Price, Timestamp, Volume};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Domain entity - Candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: Timestamp,
    pub ohlcv: OHLCV,
}

impl Candle {
    pub fn new(timestamp: Timestamp, ohlcv: OHLCV) -> Self {
        Self { timestamp, ohlcv }
    }

    pub fn is_bullish(&self) -> bool {
        self.ohlcv.close > self.ohlcv.open
    }
}

/// Domain entity - one point of the simple price line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub timestamp: Timestamp,
    pub price: Price,
    pub volume: Volume,
}

/// Domain entity - bounded, time-ordered candle series held by a view
#[derive(Debug, Clone)]
pub struct CandleSeries {
    candles: VecDeque<Candle>,
    max_size: usize,
}

impl CandleSeries {
    pub fn new(max_size: usize) -> Self {
        Self { candles: VecDeque::new(), max_size }
    }

    /// Drop the current content and take a freshly generated series,
    /// keeping the newest `max_size` candles.
    pub fn replace_all(&mut self, candles: impl IntoIterator<Item = Candle>) {
        self.candles.clear();
        self.candles.extend(candles);
        self.candles.make_contiguous().sort_by_key(|c| c.timestamp.value());
        while self.candles.len() > self.max_size {
            self.candles.pop_front();
        }
    }

    pub fn get_candles(&self) -> &VecDeque<Candle> {
        &self.candles
    }

    pub fn latest_price(&self) -> Option<Price> {
        self.candles.back().map(|candle| candle.ohlcv.close)
    }

    /// (lowest low, highest high) across the series
    pub fn price_range(&self) -> Option<(Price, Price)> {
        let first = self.candles.front()?;
        let mut min_price = first.ohlcv.low;
        let mut max_price = first.ohlcv.high;

        for candle in &self.candles {
            if candle.ohlcv.low < min_price {
                min_price = candle.ohlcv.low;
            }
            if candle.ohlcv.high > max_price {
                max_price = candle.ohlcv.high;
            }
        }

        Some((min_price, max_price))
    }
}
