//! Portfolio aggregate: holdings, derived stats and the value history.

pub mod entities;
pub mod history;
pub mod services;

pub use entities::*;
pub use history::{PortfolioHistoryPoint, bar_heights, generate_history};
pub use services::*;
