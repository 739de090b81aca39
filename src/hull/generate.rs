use rand::Rng;

use crate::aggregate::AggregateSpec;
use crate::error::Result;
use crate::math::{Orientation, Point3};

use super::{point_on_ellipsoid, ConvexHull, HullVolume, ParticleHull};

/// Generates a convex particle approximating an aggregate's ellipsoid.
///
/// Samples `sample_count` points on the ellipsoid surface, takes their convex
/// hull, measures its volume and attaches a random orientation.
pub struct GenerateHull<'a> {
    spec: &'a AggregateSpec,
}

impl<'a> GenerateHull<'a> {
    /// Creates a new `GenerateHull` operation.
    #[must_use]
    pub fn new(spec: &'a AggregateSpec) -> Self {
        Self { spec }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the sampled points do not span a solid, which can
    /// only happen by extreme chance with very few samples.
    pub fn execute<R: Rng>(&self, rng: &mut R) -> Result<ParticleHull> {
        let (a, b, c) = self.spec.semi_axes();
        let points: Vec<Point3> = (0..self.spec.sample_count())
            .map(|_| point_on_ellipsoid(&mut *rng, a, b, c))
            .collect();

        let mesh = ConvexHull::new(&points).execute()?;
        let volume = HullVolume::new(&mesh.vertices, &mesh.faces).execute()?;
        let orientation = Orientation::random(rng);

        Ok(ParticleHull {
            spec_id: self.spec.id().to_owned(),
            vertices: mesh.vertices,
            faces: mesh.faces,
            volume,
            orientation,
        })
    }
}
