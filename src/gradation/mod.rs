//! Sieve analysis: the forward gradation curve and the inverse count
//! derivation.

mod counts;
mod curve;

pub use counts::{CountBasis, DeriveCounts};
pub use curve::{sieve_index, CurveFor};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Sieve sizes of the gradation curve, finest first.
///
/// Charting and stored curves depend on this exact series.
pub const SIEVE_SIZES: [f64; 12] = [
    0.0, 0.063, 0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 31.5, 63.0,
];

/// One point of a gradation curve: sieve size against percent passing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Sieve size.
    pub x: f64,
    /// Percent of material passing the sieve, in `[0, 100]`.
    pub y: f64,
}

/// Renders a curve as a JSON array of `{"x": .., "y": ..}` objects.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn curve_to_json(curve: &[CurvePoint]) -> Result<String> {
    serde_json::to_string(curve).map_err(|e| ConfigError::Parse(e).into())
}
