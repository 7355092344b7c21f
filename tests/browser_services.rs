#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use memecoin_dashboard_wasm::application::{FeedOptions, LiveMarketFeed};
use memecoin_dashboard_wasm::domain::errors::AppError;
use memecoin_dashboard_wasm::domain::market_data::MarketDataSimulator;
use memecoin_dashboard_wasm::infrastructure::wallet::{
    SimulatedWallet, TransactionRequest, WalletConnector,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn fast_feed() -> LiveMarketFeed {
    let options = FeedOptions { base_price: 0.00234, candle_count: 30, tick_count: 10, refresh_ms: 40 };
    LiveMarketFeed::new(MarketDataSimulator::default(), options, 99)
}

#[wasm_bindgen_test]
async fn feed_refreshes_on_its_timer() {
    let mut feed = fast_feed();
    let updates = Rc::new(Cell::new(0u32));
    let counter = updates.clone();
    feed.on_update(move |snapshot| {
        assert_eq!(snapshot.candles.len(), 30);
        counter.set(counter.get() + 1);
    });

    feed.start().unwrap();
    assert!(feed.is_running());
    assert_eq!(updates.get(), 1);

    TimeoutFuture::new(200).await;
    assert!(updates.get() >= 3, "only {} updates", updates.get());
}

#[wasm_bindgen_test]
async fn dropped_feed_stops_updating() {
    let mut feed = fast_feed();
    let updates = Rc::new(Cell::new(0u32));
    let counter = updates.clone();
    feed.on_update(move |_| counter.set(counter.get() + 1));
    feed.start().unwrap();

    TimeoutFuture::new(100).await;
    drop(feed);
    let at_drop = updates.get();

    TimeoutFuture::new(150).await;
    assert_eq!(updates.get(), at_drop);
}

#[wasm_bindgen_test]
async fn stopped_feed_can_restart() {
    let mut feed = fast_feed();
    feed.start().unwrap();
    feed.stop();
    assert!(!feed.is_running());

    let before = feed.refresh_count();
    TimeoutFuture::new(100).await;
    assert_eq!(feed.refresh_count(), before);

    feed.start().unwrap();
    assert_eq!(feed.refresh_count(), before + 1);
}

#[wasm_bindgen_test]
async fn wallet_round_trip() {
    let wallet = SimulatedWallet::new(7, 10);
    let request = TransactionRequest { to: "0xdead".to_string(), value: 1.5, memo: None };

    let rejected = wallet.submit_transaction(request.clone()).await;
    assert!(matches!(rejected, Err(AppError::WalletError(_))));

    let address = wallet.connect().await.unwrap();
    assert_eq!(address.short().len(), 15);
    assert_eq!(wallet.connect().await.unwrap(), address);

    let hash = wallet.submit_transaction(request).await.unwrap();
    let receipt = wallet.wait_for_confirmation(&hash).await.unwrap();
    assert!(receipt.confirmed);
    assert_eq!(receipt.tx_hash, hash);

    wallet.disconnect().await.unwrap();
    assert!(wallet.address().is_none());
}
