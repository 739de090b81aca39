use crate::error::Result;

use super::{positive, Container};

/// A box-shaped container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    width: f64,
    height: f64,
    depth: f64,
}

impl Cuboid {
    /// Creates a new cuboid container.
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is not positive and finite.
    pub fn new(width: f64, height: f64, depth: f64) -> Result<Self> {
        Ok(Self {
            width: positive("width", width)?,
            height: positive("height", height)?,
            depth: positive("depth", depth)?,
        })
    }

    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Extent along z.
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.depth
    }
}

impl Container for Cuboid {
    fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn footprint(&self) -> (f64, f64) {
        (self.width, self.depth)
    }

    fn grid_span(&self) -> (f64, f64) {
        (self.width, self.depth)
    }
}
