//! HTTP request handlers

pub mod analysis;
pub mod health;

pub use analysis::analyze_location;
pub use health::health_check;
