pub mod aggregate;
pub mod config;
pub mod container;
pub mod error;
pub mod gradation;
pub mod hull;
pub mod math;
pub mod packing;

pub use error::{GranulisError, Result};
