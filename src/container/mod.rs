//! Container shapes the aggregate is packed into.

mod cuboid;
mod cylinder;
mod notch;

pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use notch::{Notch, NotchDirection};

use std::fmt::Debug;

use crate::error::{InputError, Result};
use crate::math::Point3;

/// Capabilities the packing scheduler needs from a container.
///
/// The container occupies `y >= 0`. The placement grid covers a rectangle of
/// [`Self::grid_span`] centered on the vertical axis.
pub trait Container: Debug {
    /// Interior volume.
    fn volume(&self) -> f64;

    /// Interior height.
    fn height(&self) -> f64;

    /// Width and depth of the horizontal bounding rectangle.
    fn footprint(&self) -> (f64, f64);

    /// Width and depth of the rectangle the placement grid may fill.
    fn grid_span(&self) -> (f64, f64);

    /// Number of grid cells of size `cell` that fit along x and z.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn grid_footprint_extents(&self, cell: f64) -> (usize, usize) {
        let (x, z) = self.grid_span();
        ((x / cell).floor() as usize, (z / cell).floor() as usize)
    }

    /// World-space corner of the grid, with `y` at the container floor.
    fn start_offset(&self) -> Point3 {
        let (x, z) = self.grid_span();
        Point3::new(-x / 2.0, 0.0, -z / 2.0)
    }
}

/// Rejects a non-positive or non-finite container dimension.
fn positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(InputError::InvalidContainer(format!(
            "{name} must be positive and finite, got {value}"
        ))
        .into())
    }
}
