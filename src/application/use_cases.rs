use std::cell::RefCell;
use std::rc::Rc;

use rand::{SeedableRng, rngs::SmallRng};

use super::simulate_latency;
use crate::domain::{
    analysis::AiAnalysis,
    errors::{AppError, AppResult},
    logging::{LogComponent, get_logger, get_time_provider},
    news::{NewsArticle, NewsCategory},
    tokens::{self, TokenDetails},
    trading::{NotificationKind, NotificationQueue, Order, OrderBook, OrderKind, OrderTicket},
};
use crate::infrastructure::http::NewsHttpClient;

/// Use Case: token details page
#[derive(Debug, Clone)]
pub struct LoadTokenDetailsUseCase {
    delay_ms: u32,
}

impl LoadTokenDetailsUseCase {
    pub fn new(delay_ms: u32) -> Self {
        Self { delay_ms }
    }

    pub async fn execute(&self, token_id: &str) -> AppResult<TokenDetails> {
        simulate_latency(self.delay_ms).await;
        tokens::lookup(token_id).inspect_err(|e| {
            get_logger().warn(LogComponent::Application("TokenDetails"), &e.to_string());
        })
    }
}

/// Use Case: simulated AI analysis of a listed token
#[derive(Clone)]
pub struct AnalyzeTokenUseCase {
    delay_ms: u32,
    rng: Rc<RefCell<SmallRng>>,
}

impl AnalyzeTokenUseCase {
    pub fn new(delay_ms: u32, seed: u64) -> Self {
        Self { delay_ms, rng: Rc::new(RefCell::new(SmallRng::seed_from_u64(seed))) }
    }

    pub async fn execute(&self, token_id: &str) -> AppResult<AiAnalysis> {
        if !tokens::catalog().iter().any(|t| t.id == token_id) {
            return Err(AppError::NotFound(format!("Token not found: {token_id}")));
        }
        simulate_latency(self.delay_ms).await;

        let analysis = AiAnalysis::generate(&mut *self.rng.borrow_mut());
        get_logger().info(
            LogComponent::Application("Analysis"),
            &format!("{token_id}: {} / {} risk", analysis.sentiment, analysis.risk_level),
        );
        Ok(analysis)
    }
}

/// Use Case: order panel submission, with toast notifications for the outcome
#[derive(Clone)]
pub struct PlaceOrderUseCase {
    book: Rc<RefCell<OrderBook>>,
    notifications: Rc<RefCell<NotificationQueue>>,
    market_delay_ms: u32,
}

impl PlaceOrderUseCase {
    pub fn new(notifications: Rc<RefCell<NotificationQueue>>, market_delay_ms: u32) -> Self {
        Self { book: Rc::new(RefCell::new(OrderBook::new())), notifications, market_delay_ms }
    }

    pub async fn execute(&self, ticket: OrderTicket, symbol: &str, current_price: f64) -> AppResult<Order> {
        if ticket.kind == OrderKind::Market {
            simulate_latency(self.market_delay_ms).await;
        }

        let now_ms = get_time_provider().current_timestamp();
        let placed = self.book.borrow_mut().place(&ticket, current_price, now_ms);

        let mut notifications = self.notifications.borrow_mut();
        match &placed {
            Ok(order) => {
                let message = format!(
                    "{} {} {:.0} {} @ ${:.6}",
                    order.kind,
                    order.side,
                    order.amount,
                    symbol,
                    order.price.value()
                );
                get_logger().info(LogComponent::Application("Trading"), &message);
                notifications.push(NotificationKind::Trade, message, now_ms);
            }
            Err(e) => {
                get_logger().warn(LogComponent::Application("Trading"), &e.to_string());
                notifications.push(NotificationKind::Error, e.to_string(), now_ms);
            }
        }
        placed
    }

    pub fn cancel(&self, order_id: u64) -> AppResult<Order> {
        let order = self.book.borrow_mut().cancel(order_id)?;
        self.notifications.borrow_mut().push(
            NotificationKind::Info,
            format!("Order #{order_id} cancelled"),
            get_time_provider().current_timestamp(),
        );
        Ok(order)
    }

    pub fn pending(&self) -> Vec<Order> {
        self.book.borrow().pending().to_vec()
    }
}

/// Use Case: one tab of the news feed
#[derive(Debug, Clone)]
pub struct LoadNewsUseCase {
    client: NewsHttpClient,
}

impl LoadNewsUseCase {
    pub fn new(client: NewsHttpClient) -> Self {
        Self { client }
    }

    pub async fn execute(&self, category: NewsCategory) -> AppResult<Vec<NewsArticle>> {
        self.client.load_feed(category).await.inspect_err(|e| {
            get_logger().error(
                LogComponent::Application("News"),
                &format!("Failed to load {} news: {e}", category.label()),
            );
        })
    }
}
