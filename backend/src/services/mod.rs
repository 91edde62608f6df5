//! Assessment pipeline services for the Flood Risk Assessment Platform

pub mod assessment;
pub mod history;
pub mod indicator_source;

#[cfg(test)]
pub(crate) mod testing;

pub use assessment::{AssessmentQuery, FloodAssessment, RiskAssessmentService};
pub use indicator_source::IndicatorSource;
