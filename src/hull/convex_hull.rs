use std::collections::HashSet;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A closed triangulated polyhedron.
#[derive(Debug, Clone, Default)]
pub struct HullMesh {
    /// Unique hull vertices, in order of first use by `faces`.
    pub vertices: Vec<Point3>,
    /// Triangle indices into `vertices`, wound counter-clockwise when viewed
    /// from outside.
    pub faces: Vec<[u32; 3]>,
}

/// Computes the convex hull of a 3D point set.
///
/// Incremental construction: an initial tetrahedron is seeded from extreme
/// points, then each remaining point that lies outside the current hull
/// replaces the faces it can see with a fan to the horizon.
pub struct ConvexHull<'a> {
    points: &'a [Point3],
}

/// Oriented triangle of the hull under construction.
#[derive(Debug, Clone, Copy)]
struct Facet {
    v: [usize; 3],
    normal: Vector3,
    offset: f64,
}

impl Facet {
    /// Builds a facet over `points[a], points[b], points[c]`, flipping the
    /// winding so that `interior` lies behind it.
    fn new(points: &[Point3], a: usize, b: usize, c: usize, interior: &Point3) -> Self {
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        let mut normal = (pb - pa).cross(&(pc - pa));
        let len = normal.norm();
        if len > 0.0 {
            normal /= len;
        }
        let mut v = [a, b, c];
        if normal.dot(&(interior - pa)) > 0.0 {
            normal = -normal;
            v.swap(1, 2);
        }
        Self {
            v,
            normal,
            offset: normal.dot(&pa.coords),
        }
    }

    /// Signed distance from the facet plane; positive means outside.
    fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }
}

impl<'a> ConvexHull<'a> {
    /// Creates a new `ConvexHull` operation over the given points.
    #[must_use]
    pub fn new(points: &'a [Point3]) -> Self {
        Self { points }
    }

    /// Executes the hull construction.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 4 points are given or the points are
    /// coincident, collinear or coplanar.
    pub fn execute(&self) -> Result<HullMesh> {
        let points = self.points;
        if points.len() < 4 {
            return Err(GeometryError::TooFewPoints(points.len()).into());
        }

        let scale = points
            .iter()
            .flat_map(|p| [p.x.abs(), p.y.abs(), p.z.abs()])
            .fold(0.0, f64::max);
        let eps = TOLERANCE * scale.max(TOLERANCE);

        let seed = initial_simplex(points, eps)?;
        let interior = Point3::from(
            seed.iter()
                .fold(Vector3::zeros(), |acc, &i| acc + points[i].coords)
                / 4.0,
        );

        let [i0, i1, i2, i3] = seed;
        let mut facets = vec![
            Facet::new(points, i0, i1, i2, &interior),
            Facet::new(points, i0, i1, i3, &interior),
            Facet::new(points, i0, i2, i3, &interior),
            Facet::new(points, i1, i2, i3, &interior),
        ];

        for (pi, p) in points.iter().enumerate() {
            let visible: Vec<Facet> = facets
                .iter()
                .filter(|f| f.distance(p) > eps)
                .copied()
                .collect();
            if visible.is_empty() {
                continue;
            }

            let visible_edges: HashSet<(usize, usize)> =
                visible.iter().flat_map(Facet::edges).collect();

            facets.retain(|f| f.distance(p) <= eps);

            // Horizon edges keep the winding of the visible facet they came
            // from, so the new fan stays outward-facing.
            for facet in &visible {
                for (a, b) in facet.edges() {
                    if !visible_edges.contains(&(b, a)) {
                        facets.push(Facet::new(points, a, b, pi, &interior));
                    }
                }
            }
        }

        compact(points, &facets)
    }
}

/// Picks four affinely independent extreme points.
fn initial_simplex(points: &[Point3], eps: f64) -> Result<[usize; 4]> {
    let argmax = |score: &dyn Fn(&Point3) -> f64| -> (usize, f64) {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, score(p)))
            .fold((0, f64::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 {
                    cur
                } else {
                    best
                }
            })
    };

    let (i0, _) = argmax(&|p: &Point3| -p.x);
    let p0 = points[i0];

    let (i1, d1) = argmax(&|p: &Point3| (p - p0).norm());
    if d1 <= eps {
        return Err(GeometryError::Degenerate("hull points are coincident".into()).into());
    }
    let dir = (points[i1] - p0) / d1;

    let (i2, d2) = argmax(&|p: &Point3| (p - p0).cross(&dir).norm());
    if d2 <= eps {
        return Err(GeometryError::Degenerate("hull points are collinear".into()).into());
    }
    let normal = (points[i1] - p0).cross(&(points[i2] - p0)).normalize();

    let (i3, d3) = argmax(&|p: &Point3| normal.dot(&(p - p0)).abs());
    if d3 <= eps {
        return Err(GeometryError::Degenerate("hull points are coplanar".into()).into());
    }

    Ok([i0, i1, i2, i3])
}

/// Drops points not referenced by any facet and renumbers the faces.
fn compact(points: &[Point3], facets: &[Facet]) -> Result<HullMesh> {
    let mut remap: Vec<Option<u32>> = vec![None; points.len()];
    let mut mesh = HullMesh {
        vertices: Vec::new(),
        faces: Vec::with_capacity(facets.len()),
    };

    for facet in facets {
        let mut tri = [0u32; 3];
        for (slot, &vi) in tri.iter_mut().zip(&facet.v) {
            *slot = if let Some(index) = remap[vi] {
                index
            } else {
                let index = u32::try_from(mesh.vertices.len()).map_err(|_| {
                    GeometryError::Degenerate("hull vertex count exceeds u32".into())
                })?;
                mesh.vertices.push(points[vi]);
                remap[vi] = Some(index);
                index
            };
        }
        mesh.faces.push(tri);
    }

    Ok(mesh)
}
