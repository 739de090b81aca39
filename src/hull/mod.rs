//! Procedural particle shapes: ellipsoid sampling, convex hulls and volumes.

mod convex_hull;
mod generate;
mod sampling;
mod volume;

pub use convex_hull::{ConvexHull, HullMesh};
pub use generate::GenerateHull;
pub use sampling::point_on_ellipsoid;
pub use volume::HullVolume;

use crate::math::{Orientation, Point3};

/// A generated particle: a convex polyhedron with its volume and orientation.
///
/// Vertices are stored in body space around the origin. The orientation is
/// applied at placement time so the canonical hull stays reusable. The
/// `spec_id` records which aggregate class produced the hull and is only
/// used for bookkeeping.
#[derive(Debug, Clone)]
pub struct ParticleHull {
    spec_id: String,
    vertices: Vec<Point3>,
    faces: Vec<[u32; 3]>,
    volume: f64,
    orientation: Orientation,
}

impl ParticleHull {
    /// Identifier of the originating aggregate class.
    #[must_use]
    pub fn spec_id(&self) -> &str {
        &self.spec_id
    }

    /// Unique hull vertices in body space.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Outward-wound triangles indexing [`Self::vertices`].
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Empirical hull volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Random orientation drawn at generation time.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Vertices rotated by the hull orientation, scaled, and moved to
    /// `position`.
    #[must_use]
    pub fn world_vertices(&self, position: &Point3, scale: f64) -> Vec<Point3> {
        let rotation = self.orientation.to_quaternion();
        self.vertices
            .iter()
            .map(|v| position + (rotation * v.coords) * scale)
            .collect()
    }
}
