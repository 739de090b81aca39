use std::f64::consts::{PI, SQRT_2};

use crate::error::Result;

use super::{positive, Container};

/// An upright cylindrical container.
///
/// The placement grid fills the square inscribed in the circular floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    radius: f64,
    height: f64,
}

impl Cylinder {
    /// Creates a new cylinder container.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or height is not positive and finite.
    pub fn new(radius: f64, height: f64) -> Result<Self> {
        Ok(Self {
            radius: positive("radius", radius)?,
            height: positive("height", height)?,
        })
    }

    /// Floor radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Side of the square inscribed in the floor circle.
    #[must_use]
    pub fn inscribed_edge(&self) -> f64 {
        self.radius * SQRT_2
    }
}

impl Container for Cylinder {
    fn volume(&self) -> f64 {
        PI * self.radius * self.radius * self.height
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn footprint(&self) -> (f64, f64) {
        let diameter = 2.0 * self.radius;
        (diameter, diameter)
    }

    fn grid_span(&self) -> (f64, f64) {
        let edge = self.inscribed_edge();
        (edge, edge)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn cylinder_volume() {
        let c = Cylinder::new(2.0, 5.0).unwrap();
        assert_relative_eq!(c.volume(), 20.0 * PI);
    }

    #[test]
    fn grid_fits_inscribed_square() {
        // edge = 10 * sqrt(2) = 14.14
        let c = Cylinder::new(10.0, 5.0).unwrap();
        assert_eq!(c.grid_footprint_extents(2.0), (7, 7));
        let s = c.start_offset();
        assert_relative_eq!(s.x, -10.0 * SQRT_2 / 2.0);
        assert_relative_eq!(s.z, s.x);
    }

    #[test]
    fn grid_corners_stay_inside_the_floor() {
        let c = Cylinder::new(3.0, 1.0).unwrap();
        let s = c.start_offset();
        assert!((s.x * s.x + s.z * s.z).sqrt() <= c.radius() + 1e-12);
    }

    #[test]
    fn footprint_is_diameter() {
        let c = Cylinder::new(1.5, 1.0).unwrap();
        assert_eq!(c.footprint(), (3.0, 3.0));
    }

    #[test]
    fn zero_radius_fails() {
        assert!(Cylinder::new(0.0, 1.0).is_err());
    }
}
