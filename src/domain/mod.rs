//! Pure domain layer: no browser calls, testable natively.

pub mod analysis;
pub mod errors;
pub mod logging;
pub mod market_data;
pub mod news;
pub mod portfolio;
pub mod tokens;
pub mod trading;
