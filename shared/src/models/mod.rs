//! Domain models for the Flood Risk Assessment Platform

mod history;
mod indicator;
mod risk;
mod trend;

pub use history::*;
pub use indicator::*;
pub use risk::*;
pub use trend::*;
