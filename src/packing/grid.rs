use serde::Serialize;

use crate::math::Point3;

/// Number of cells along each grid axis. `y` is vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridExtents {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl GridExtents {
    /// Cells in one horizontal layer, saturating at `usize::MAX`.
    #[must_use]
    pub fn per_layer(&self) -> usize {
        self.x.saturating_mul(self.z)
    }

    /// Cells in the whole grid, saturating at `usize::MAX`.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.per_layer().saturating_mul(self.y)
    }
}

/// 1-based position of the next free cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCursor {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

/// Deterministic placement grid walked in row-major order.
///
/// The cursor advances x fastest, then z, then y. x and z wrap back to 1 at
/// their extents; y is capped at its extent, and once the last cell has been
/// handed out the grid is exhausted.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    extents: GridExtents,
    cell: f64,
    start: Point3,
    cursor: GridCursor,
    consumed: usize,
}

impl PlacementGrid {
    /// Creates a grid of `extents` cells of size `cell`, anchored at `start`.
    #[must_use]
    pub fn new(extents: GridExtents, cell: f64, start: Point3) -> Self {
        Self {
            extents,
            cell,
            start,
            cursor: GridCursor { x: 1, y: 1, z: 1 },
            consumed: 0,
        }
    }

    #[must_use]
    pub fn extents(&self) -> GridExtents {
        self.extents
    }

    /// Edge length of one cell.
    #[must_use]
    pub fn cell(&self) -> f64 {
        self.cell
    }

    #[must_use]
    pub fn start(&self) -> Point3 {
        self.start
    }

    #[must_use]
    pub fn cursor(&self) -> GridCursor {
        self.cursor
    }

    /// Cells handed out so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns `true` once every cell has been handed out.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.consumed >= self.extents.capacity()
    }

    /// Returns `true` once the cursor sits on the top layer.
    #[must_use]
    pub fn reached_top(&self) -> bool {
        self.cursor.y >= self.extents.y
    }

    /// World position of the cursor cell, without advancing.
    ///
    /// Horizontal coordinates are cell centers; the vertical coordinate is
    /// the top of the cell so particles drop from above their slot.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self) -> Point3 {
        let cell = self.cell;
        Point3::new(
            self.start.x + self.cursor.x as f64 * cell - 0.5 * cell,
            self.start.y + self.cursor.y as f64 * cell,
            self.start.z + self.cursor.z as f64 * cell - 0.5 * cell,
        )
    }

    /// Hands out the next cell's position and advances the cursor, or
    /// returns `None` once the grid is exhausted.
    pub fn next_position(&mut self) -> Option<Point3> {
        if self.is_exhausted() {
            return None;
        }
        let position = self.position();
        self.advance();
        self.consumed += 1;
        Some(position)
    }

    fn advance(&mut self) {
        let GridExtents { x: gx, y: gy, z: gz } = self.extents;
        let c = &mut self.cursor;
        if c.x >= gx && c.z >= gz {
            c.x = 1;
            c.z = 1;
            c.y = (c.y + 1).min(gy);
        } else if c.x >= gx {
            c.x = 1;
            c.z += 1;
        } else {
            c.x += 1;
        }
    }
}
