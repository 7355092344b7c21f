pub mod http;
pub mod services;
pub mod wallet;

pub use http::NewsHttpClient;
pub use services::{BrowserTimeProvider, ConsoleLogger};
pub use wallet::{SimulatedWallet, WalletConnector};
