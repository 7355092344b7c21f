pub mod market_feed;
pub mod portfolio_service;
pub mod use_cases;

pub use market_feed::*;
pub use portfolio_service::*;
pub use use_cases::*;

use gloo_timers::future::TimeoutFuture;

/// Stand-in for backend latency in the simulated services
pub(crate) async fn simulate_latency(delay_ms: u32) {
    if delay_ms > 0 {
        TimeoutFuture::new(delay_ms).await;
    }
}
