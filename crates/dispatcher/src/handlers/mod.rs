//! Handler implementations
//!
//! Contains SimulatedHandlers.

mod simulated;

pub use self::simulated::SimulatedHandlers;
