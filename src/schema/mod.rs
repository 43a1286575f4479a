pub mod decoder;
pub mod error;
