//! SMS transport implementations.

pub mod simulated;

pub use simulated::SimulatedSmsSender;
