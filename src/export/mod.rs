pub mod error;
pub mod exporter;
