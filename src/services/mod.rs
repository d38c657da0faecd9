pub mod aggregator;
pub mod alerts;
pub mod dashboard;
pub mod stats;
