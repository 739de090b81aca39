use crate::error::{GeometryError, Result};
use crate::math::Point3;

/// Computes the enclosed volume of a closed triangulated polyhedron.
///
/// Uses the signed tetrahedron method anchored at the first vertex: for each
/// triangle `(p1, p2, p3)` it accumulates `(p1 - p0) . ((p2 - p0) x (p3 - p0)) / 6`
/// and returns the absolute value of the sum. Exact for closed, consistently
/// wound meshes that are star-shaped from `p0`, which every convex hull is.
pub struct HullVolume<'a> {
    vertices: &'a [Point3],
    faces: &'a [[u32; 3]],
}

impl<'a> HullVolume<'a> {
    /// Creates a new `HullVolume` query.
    #[must_use]
    pub fn new(vertices: &'a [Point3], faces: &'a [[u32; 3]]) -> Self {
        Self { vertices, faces }
    }

    /// Executes the query, returning the volume (absolute value).
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh has fewer than 4 vertices, no faces, or
    /// a face index that points past the vertex list.
    pub fn execute(&self) -> Result<f64> {
        if self.vertices.len() < 4 {
            return Err(GeometryError::Degenerate(format!(
                "hull has {} vertices, need at least 4",
                self.vertices.len()
            ))
            .into());
        }
        if self.faces.is_empty() {
            return Err(GeometryError::Degenerate("hull has no faces".into()).into());
        }

        let p0 = self.vertices[0];
        let mut signed_volume = 0.0;
        for tri in self.faces {
            let [p1, p2, p3] = self.corners(tri)?;
            let a = p1 - p0;
            let b = p2 - p0;
            let c = p3 - p0;
            signed_volume += a.dot(&b.cross(&c));
        }

        Ok(signed_volume.abs() / 6.0)
    }

    fn corners(&self, tri: &[u32; 3]) -> Result<[Point3; 3]> {
        let mut out = [Point3::origin(); 3];
        for (slot, &index) in out.iter_mut().zip(tri) {
            *slot = *self.vertices.get(index as usize).ok_or_else(|| {
                GeometryError::Degenerate(format!("face index {index} out of range"))
            })?;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn tetrahedron() -> (Vec<Point3>, Vec<[u32; 3]>) {
        let vertices = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        (vertices, faces)
    }

    #[test]
    fn tetrahedron_volume() {
        let (vertices, faces) = tetrahedron();
        let volume = HullVolume::new(&vertices, &faces).execute().unwrap();
        assert!((volume - 1.0 / 6.0).abs() < 1e-12, "got {volume}");
    }

    #[test]
    fn inverted_winding_gives_same_volume() {
        let (vertices, faces) = tetrahedron();
        let flipped: Vec<[u32; 3]> = faces.iter().map(|&[a, b, c]| [a, c, b]).collect();
        let volume = HullVolume::new(&vertices, &flipped).execute().unwrap();
        assert!((volume - 1.0 / 6.0).abs() < 1e-12, "got {volume}");
    }

    #[test]
    fn translated_tetrahedron_volume() {
        let (vertices, faces) = tetrahedron();
        let shifted: Vec<Point3> = vertices
            .iter()
            .map(|v| p(v.x + 10.0, v.y - 4.0, v.z + 2.5))
            .collect();
        let volume = HullVolume::new(&shifted, &faces).execute().unwrap();
        assert!((volume - 1.0 / 6.0).abs() < 1e-9, "got {volume}");
    }

    #[test]
    fn too_few_vertices_fails() {
        let vertices = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let faces = vec![[0, 1, 2]];
        assert!(HullVolume::new(&vertices, &faces).execute().is_err());
    }

    #[test]
    fn no_faces_fails() {
        let (vertices, _) = tetrahedron();
        assert!(HullVolume::new(&vertices, &[]).execute().is_err());
    }

    #[test]
    fn out_of_range_index_fails() {
        let (vertices, _) = tetrahedron();
        let faces = vec![[0, 1, 9]];
        assert!(HullVolume::new(&vertices, &faces).execute().is_err());
    }
}
