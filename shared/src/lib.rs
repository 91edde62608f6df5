//! Shared types and models for the Flood Risk Assessment Platform
//!
//! This crate contains the indicator models and the pure scoring and trend
//! logic shared between the backend, the map front-end (via WASM), and other
//! components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
