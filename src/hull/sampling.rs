use std::f64::consts::TAU;

use rand::Rng;

use crate::math::Point3;

/// Draws a random point on the surface of an axis-aligned ellipsoid.
///
/// The azimuth is uniform in `[0, 2*pi)` and the sine of the polar angle is
/// uniform in `[-1, 1)`. For a sphere this is uniform over the surface; for
/// other axis ratios points cluster towards the poles, and generated shapes
/// depend on that clustering.
pub fn point_on_ellipsoid<R: Rng>(rng: &mut R, a: f64, b: f64, c: f64) -> Point3 {
    let azimuth = rng.random::<f64>() * TAU;
    let sin_polar = 2.0 * rng.random::<f64>() - 1.0;
    let cos_polar = (1.0 - sin_polar * sin_polar).max(0.0).sqrt();

    Point3::new(
        a * cos_polar * azimuth.cos(),
        b * cos_polar * azimuth.sin(),
        c * sin_polar,
    )
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn points_lie_on_the_surface() {
        let mut rng = StdRng::seed_from_u64(5);
        let (a, b, c) = (3.0, 2.0, 0.5);
        for _ in 0..1000 {
            let q = point_on_ellipsoid(&mut rng, a, b, c);
            let f = (q.x / a).powi(2) + (q.y / b).powi(2) + (q.z / c).powi(2);
            assert!((f - 1.0).abs() < 1e-9, "implicit form = {f}");
        }
    }

    #[test]
    fn points_stay_inside_bounding_box() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..1000 {
            let q = point_on_ellipsoid(&mut rng, 1.0, 2.0, 3.0);
            assert!(q.x.abs() <= 1.0 + 1e-12);
            assert!(q.y.abs() <= 2.0 + 1e-12);
            assert!(q.z.abs() <= 3.0 + 1e-12);
        }
    }

    #[test]
    fn sphere_samples_balance_hemispheres() {
        let mut rng = StdRng::seed_from_u64(8);
        let upper = (0..4000)
            .filter(|_| point_on_ellipsoid(&mut rng, 1.0, 1.0, 1.0).z > 0.0)
            .count();
        assert!((1700..2300).contains(&upper), "upper hemisphere: {upper}");
    }
}
