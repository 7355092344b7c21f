//! Wallet connection boundary. The dashboard only needs an address and a
//! way to submit and confirm a transaction; the simulated connector fakes
//! both with timer delays.

use std::cell::RefCell;
use std::rc::Rc;

use derive_more::Display;
use gloo_timers::future::TimeoutFuture;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::{AppError, AppResult},
    logging::{LogComponent, get_logger},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// `0x1234ab...cdef`: the first 8 and last 4 characters
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return self.0.clone();
        }
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct TxHash(String);

impl TxHash {
    pub fn value(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub to: String,
    pub value: f64,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub confirmed: bool,
}

/// Operations the views need from a wallet
#[allow(async_fn_in_trait)]
pub trait WalletConnector {
    async fn connect(&self) -> AppResult<Address>;
    async fn disconnect(&self) -> AppResult<()>;
    fn address(&self) -> Option<Address>;
    async fn submit_transaction(&self, request: TransactionRequest) -> AppResult<TxHash>;
    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> AppResult<Receipt>;
}

#[derive(Debug)]
struct WalletState {
    address: Option<Address>,
    rng: SmallRng,
    block: u64,
}

/// In-browser stand-in for an injected wallet
#[derive(Debug, Clone)]
pub struct SimulatedWallet {
    state: Rc<RefCell<WalletState>>,
    delay_ms: u32,
}

impl SimulatedWallet {
    pub fn new(seed: u64, delay_ms: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(WalletState {
                address: None,
                rng: SmallRng::seed_from_u64(seed),
                block: 19_000_000,
            })),
            delay_ms,
        }
    }

    fn random_hex(&self, len: usize) -> String {
        let mut state = self.state.borrow_mut();
        let digits: String = (0..len)
            .map(|_| char::from_digit(state.rng.gen_range(0..16), 16).unwrap_or('0'))
            .collect();
        format!("0x{digits}")
    }

    async fn pause(&self) {
        if self.delay_ms > 0 {
            TimeoutFuture::new(self.delay_ms).await;
        }
    }
}

impl WalletConnector for SimulatedWallet {
    async fn connect(&self) -> AppResult<Address> {
        if let Some(address) = self.address() {
            return Ok(address);
        }
        self.pause().await;

        let address = Address::new(self.random_hex(40));
        self.state.borrow_mut().address = Some(address.clone());
        get_logger().info(
            LogComponent::Infrastructure("Wallet"),
            &format!("Connected {}", address.short()),
        );
        Ok(address)
    }

    async fn disconnect(&self) -> AppResult<()> {
        self.state.borrow_mut().address = None;
        get_logger().info(LogComponent::Infrastructure("Wallet"), "Disconnected");
        Ok(())
    }

    fn address(&self) -> Option<Address> {
        self.state.borrow().address.clone()
    }

    async fn submit_transaction(&self, request: TransactionRequest) -> AppResult<TxHash> {
        if self.address().is_none() {
            return Err(AppError::WalletError("Wallet not connected".to_string()));
        }
        if !(request.value.is_finite() && request.value >= 0.0) {
            return Err(AppError::WalletError(format!(
                "Invalid transaction value: {}",
                request.value
            )));
        }
        self.pause().await;

        let hash = TxHash(self.random_hex(64));
        get_logger().debug(
            LogComponent::Infrastructure("Wallet"),
            &format!("Submitted {} to {}", hash, request.to),
        );
        Ok(hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> AppResult<Receipt> {
        self.pause().await;

        let block_number = {
            let mut state = self.state.borrow_mut();
            state.block += 1;
            state.block
        };
        Ok(Receipt { tx_hash: tx_hash.clone(), block_number, confirmed: true })
    }
}
