//! Simulated order ticket. Orders never leave the client: market orders are
//! reported filled, the rest sit in a local pending list until cancelled.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::errors::{AppError, AppResult};
use crate::domain::market_data::{Price, Timestamp};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OrderKind {
    #[default]
    Market,
    Limit,
    StopLoss,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Filled,
    Pending,
    Cancelled,
}

/// Form state of the order panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTicket {
    pub kind: OrderKind,
    pub side: Side,
    pub amount: f64,
    pub limit_price: Option<f64>,
    pub stop_price: Option<f64>,
    /// Slippage tolerance in percent
    pub slippage: f64,
}

impl Default for OrderTicket {
    fn default() -> Self {
        Self {
            kind: OrderKind::Market,
            side: Side::Buy,
            amount: 0.0,
            limit_price: None,
            stop_price: None,
            slippage: 1.0,
        }
    }
}

impl OrderTicket {
    /// Price the order would execute at: the market price for market orders,
    /// otherwise the limit price when one is set.
    pub fn execution_price(&self, current_price: f64) -> f64 {
        match self.kind {
            OrderKind::Market => current_price,
            _ => self.limit_price.filter(|p| *p > 0.0).unwrap_or(current_price),
        }
    }

    pub fn estimated_value(&self, current_price: f64) -> f64 {
        if self.amount > 0.0 { self.amount * self.execution_price(current_price) } else { 0.0 }
    }

    /// Worst acceptable fill once slippage is applied
    pub fn worst_price(&self, current_price: f64) -> f64 {
        let price = self.execution_price(current_price);
        match self.side {
            Side::Buy => price * (1.0 + self.slippage / 100.0),
            Side::Sell => price * (1.0 - self.slippage / 100.0),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(AppError::ValidationError("Amount must be greater than zero".to_string()));
        }
        if self.kind != OrderKind::Market && !self.limit_price.is_some_and(|p| p > 0.0) {
            return Err(AppError::ValidationError(format!(
                "{} orders need a positive price",
                self.kind
            )));
        }
        if self.kind == OrderKind::StopLoss && !self.stop_price.is_some_and(|p| p > 0.0) {
            return Err(AppError::ValidationError(
                "stop-loss orders need a positive stop price".to_string(),
            ));
        }
        if !(0.0..=50.0).contains(&self.slippage) {
            return Err(AppError::ValidationError(format!(
                "slippage must be between 0 and 50%, got {}",
                self.slippage
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    pub kind: OrderKind,
    pub side: Side,
    pub amount: f64,
    pub price: Price,
    pub stop_price: Option<Price>,
    pub status: OrderStatus,
    pub timestamp: Timestamp,
}

/// Locally held open orders of one trading panel
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    pending: Vec<Order>,
    next_id: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Market orders come back filled and are not kept; the rest are kept as pending.
    pub fn place(&mut self, ticket: &OrderTicket, current_price: f64, now_ms: u64) -> AppResult<Order> {
        ticket.validate()?;
        self.next_id += 1;

        let status = match ticket.kind {
            OrderKind::Market => OrderStatus::Filled,
            _ => OrderStatus::Pending,
        };
        let order = Order {
            id: self.next_id,
            kind: ticket.kind,
            side: ticket.side,
            amount: ticket.amount,
            price: Price::new(ticket.execution_price(current_price)),
            stop_price: ticket.stop_price.map(Price::new),
            status,
            timestamp: Timestamp::from_millis(now_ms),
        };

        if status == OrderStatus::Pending {
            self.pending.push(order.clone());
        }
        Ok(order)
    }

    pub fn cancel(&mut self, id: u64) -> AppResult<Order> {
        let index = self
            .pending
            .iter()
            .position(|order| order.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Order #{id} is not open")))?;
        let mut order = self.pending.remove(index);
        order.status = OrderStatus::Cancelled;
        Ok(order)
    }

    pub fn pending(&self) -> &[Order] {
        &self.pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
    PriceAlert,
    Trade,
    Social,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: Timestamp,
}

/// Newest-first toast list capped at a fixed capacity
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    capacity: usize,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> Self {
        Self { items: VecDeque::new(), capacity: capacity.max(1), next_id: 0 }
    }

    /// Returns the id the view uses to dismiss the toast later.
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>, now_ms: u64) -> u64 {
        self.next_id += 1;
        self.items.push_front(Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            timestamp: Timestamp::from_millis(now_ms),
        });
        self.items.truncate(self.capacity);
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drops toasts older than `ttl_ms`; returns how many went away.
    pub fn expire(&mut self, now_ms: u64, ttl_ms: u64) -> usize {
        let before = self.items.len();
        self.items.retain(|n| now_ms.saturating_sub(n.timestamp.value()) < ttl_ms);
        before - self.items.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
