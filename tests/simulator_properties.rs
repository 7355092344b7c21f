use memecoin_dashboard_wasm::domain::market_data::{
    MarketDataSimulator, SimulatorSettings, TimeInterval,
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use rand::{SeedableRng, rngs::SmallRng};

const NOW: u64 = 1_700_000_000_000;

fn price_from(raw: u32) -> f64 {
    // 0.00001 .. ~42_949
    f64::from(raw % 4_294_967) / 100.0 + 0.00001
}

#[quickcheck]
fn candle_bodies_sit_inside_wicks(seed: u64, raw_price: u32, count: u8) -> TestResult {
    if count == 0 {
        return TestResult::discard();
    }
    let simulator = MarketDataSimulator::default();
    let mut rng = SmallRng::seed_from_u64(seed);
    let Ok(candles) = simulator.produce(price_from(raw_price), count as usize, NOW, &mut rng) else {
        return TestResult::failed();
    };

    TestResult::from_bool(candles.iter().all(|c| {
        let o = &c.ohlcv;
        o.low <= o.open && o.low <= o.close && o.open <= o.high && o.close <= o.high
    }))
}

#[quickcheck]
fn count_and_spacing_follow_interval(seed: u64, count: u8, hourly: bool) -> TestResult {
    if count == 0 {
        return TestResult::discard();
    }
    let interval = if hourly { TimeInterval::OneHour } else { TimeInterval::OneMinute };
    let simulator =
        match MarketDataSimulator::new(SimulatorSettings { interval, ..SimulatorSettings::default() }) {
            Ok(simulator) => simulator,
            Err(_) => return TestResult::failed(),
        };
    let mut rng = SmallRng::seed_from_u64(seed);
    let Ok(candles) = simulator.produce(1.0, count as usize, NOW, &mut rng) else {
        return TestResult::failed();
    };

    let step = interval.duration_ms();
    TestResult::from_bool(
        candles.len() == count as usize
            && candles.last().map(|c| c.timestamp.value()) == Some(NOW)
            && candles
                .windows(2)
                .all(|w| w[1].timestamp.value() - w[0].timestamp.value() == step),
    )
}

#[quickcheck]
fn ticks_never_go_negative(seed: u64, raw_price: u32) -> bool {
    let simulator = MarketDataSimulator::default();
    let mut rng = SmallRng::seed_from_u64(seed);
    simulator
        .produce_ticks(price_from(raw_price), 50, NOW, &mut rng)
        .map(|ticks| ticks.iter().all(|t| t.price.value() > 0.0))
        .unwrap_or(false)
}

#[test]
fn ten_candles_strictly_increasing() {
    let simulator = MarketDataSimulator::default();
    let candles = simulator.produce(1.0, 10, NOW, &mut SmallRng::seed_from_u64(0)).unwrap();
    assert_eq!(candles.len(), 10);
    assert!(candles.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}
