use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

use super::Container;

/// Horizontal axis a notch runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotchDirection {
    X,
    Z,
}

/// A rectangular bar cut out of the container floor.
///
/// The notch geometry itself belongs to the physics world; the scheduler only
/// needs its height to keep particles from spawning inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Notch {
    /// Height of the notch above the floor.
    pub height: f64,
    /// Width of the notch across its running direction.
    pub width: f64,
    /// Axis the notch runs along.
    pub direction: NotchDirection,
}

impl Notch {
    /// Creates a new notch.
    ///
    /// # Errors
    ///
    /// Returns an error if the height or width is not positive and finite.
    pub fn new(height: f64, width: f64, direction: NotchDirection) -> Result<Self> {
        let notch = Self {
            height,
            width,
            direction,
        };
        notch.validate()?;
        Ok(notch)
    }

    /// Checks the notch dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the height or width is not positive and finite.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("height", self.height), ("width", self.width)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InputError::InvalidNotch(format!(
                    "{name} must be positive and finite, got {value}"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Box extents `(x, y, z)` of the notch inside a container: its own width
    /// across the running direction, the full container footprint along it.
    #[must_use]
    pub fn extents(&self, container: &dyn Container) -> (f64, f64, f64) {
        let (width, depth) = container.footprint();
        match self.direction {
            NotchDirection::X => (width, self.height, self.width),
            NotchDirection::Z => (self.width, self.height, depth),
        }
    }

    /// Lowest spawn height above the notch for particles of size `cell`.
    #[must_use]
    pub fn spawn_floor(&self, cell: f64) -> f64 {
        self.height + cell / 2.0
    }
}
