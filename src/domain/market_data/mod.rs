//! Market data aggregate: value objects, entities and the simulator.

pub mod entities;
pub mod simulator;
pub mod value_objects;

pub use entities::*;
pub use simulator::{MarketDataSimulator, SimulatorSettings};
pub use value_objects::*;
