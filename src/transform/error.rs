use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("Invalid temperature bounds: min {min} must not exceed max {max}")]
    InvertedBounds { min: f64, max: f64 },
}
