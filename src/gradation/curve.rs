use crate::aggregate::AggregateSpec;

use super::{CurvePoint, SIEVE_SIZES};

/// Computes the percent-passing gradation curve of a population.
///
/// Each aggregate class is classified by its second-largest semi-axis and
/// its whole target volume fraction is retained on the sieve just below the
/// first sieve size that exceeds it. Classes coarser than the largest sieve
/// are retained on the largest sieve. Percent passing is accumulated from the
/// coarsest sieve down, clamped at zero.
pub struct CurveFor<'a> {
    specs: &'a [AggregateSpec],
}

impl<'a> CurveFor<'a> {
    /// Creates a new `CurveFor` query.
    #[must_use]
    pub fn new(specs: &'a [AggregateSpec]) -> Self {
        Self { specs }
    }

    /// Executes the query, returning one point per sieve size in ascending
    /// size order.
    #[must_use]
    pub fn execute(&self) -> Vec<CurvePoint> {
        let retained = self.percent_retained();
        let passing = percent_passing(&retained);

        SIEVE_SIZES
            .iter()
            .zip(passing)
            .map(|(&x, y)| CurvePoint { x, y })
            .collect()
    }

    /// Percent of total volume retained on each sieve.
    #[must_use]
    pub fn percent_retained(&self) -> [f64; SIEVE_SIZES.len()] {
        let mut retained = [0.0; SIEVE_SIZES.len()];
        for spec in self.specs {
            retained[sieve_index(spec.characteristic_size())] +=
                spec.target_volume_fraction() * 100.0;
        }
        retained
    }
}

/// Index of the sieve a particle of the given size is retained on.
#[must_use]
pub fn sieve_index(size: f64) -> usize {
    match SIEVE_SIZES.iter().position(|&sieve| size < sieve) {
        // The smallest sieve is 0, so a positive size never matches index 0.
        Some(index) => index.saturating_sub(1),
        None => SIEVE_SIZES.len() - 1,
    }
}

fn percent_passing(retained: &[f64; SIEVE_SIZES.len()]) -> [f64; SIEVE_SIZES.len()] {
    let mut remaining = 100.0;
    let mut passing = [0.0; SIEVE_SIZES.len()];
    for index in (0..retained.len()).rev() {
        remaining -= retained[index];
        passing[index] = remaining.max(0.0);
    }
    passing
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn spec(id: &str, a: f64, b: f64, c: f64, fraction: f64) -> AggregateSpec {
        AggregateSpec::new(id, a, b, c, fraction, 20).unwrap()
    }

    #[test]
    fn curve_has_one_point_per_sieve() {
        let curve = CurveFor::new(&[spec("0", 1.0, 1.0, 1.0, 1.0)]).execute();
        assert_eq!(curve.len(), 12);
        for (point, &size) in curve.iter().zip(SIEVE_SIZES.iter()) {
            assert_relative_eq!(point.x, size);
        }
    }

    #[test]
    fn single_class_steps_from_zero_to_hundred() {
        // Characteristic size 5 lies between the 4 and 8 sieves.
        let curve = CurveFor::new(&[spec("0", 6.0, 5.0, 3.0, 1.0)]).execute();
        let y: Vec<f64> = curve.iter().map(|p| p.y).collect();
        assert_eq!(
            y,
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 100.0, 100.0, 100.0, 100.0]
        );
    }

    #[test]
    fn classification_uses_second_largest_axis() {
        // Sorted axes [2, 9, 10]: the class sits on the 8 sieve.
        assert_eq!(sieve_index(spec("0", 10.0, 9.0, 2.0, 0.5).characteristic_size()), 8);
        assert_eq!(sieve_index(0.05), 0);
        assert_eq!(sieve_index(0.063), 1);
        assert_eq!(sieve_index(62.9), 10);
    }

    #[test]
    fn oversize_class_is_retained_on_largest_sieve() {
        assert_eq!(sieve_index(63.0), SIEVE_SIZES.len() - 1);
        assert_eq!(sieve_index(120.0), SIEVE_SIZES.len() - 1);

        let curve = CurveFor::new(&[spec("0", 100.0, 100.0, 100.0, 0.4)]).execute();
        assert_relative_eq!(curve[11].y, 60.0);
        assert_relative_eq!(curve[0].y, 60.0);
    }

    #[test]
    fn two_classes_split_the_curve() {
        let specs = vec![spec("fine", 0.3, 0.3, 0.3, 0.3), spec("coarse", 10.0, 10.0, 10.0, 0.7)];
        let curve = CurveFor::new(&specs).execute();
        // coarse retained on 8, fine retained on 0.25
        assert_relative_eq!(curve[11].y, 100.0);
        assert_relative_eq!(curve[9].y, 100.0);
        assert_relative_eq!(curve[8].y, 30.0, epsilon = 1e-9);
        assert_relative_eq!(curve[4].y, 30.0, epsilon = 1e-9);
        assert_relative_eq!(curve[3].y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn passing_is_bounded_and_monotone() {
        let specs = vec![
            spec("0", 0.1, 0.2, 0.1, 0.6),
            spec("1", 1.0, 3.0, 2.5, 0.5),
            spec("2", 20.0, 12.0, 9.0, 0.4),
        ];
        let curve = CurveFor::new(&specs).execute();
        for pair in curve.windows(2) {
            assert!(pair[0].y <= pair[1].y, "curve must not decrease with size");
        }
        for point in &curve {
            assert!((0.0..=100.0).contains(&point.y));
        }
        // Fractions sum past 1, so the fine end clamps at zero.
        assert_relative_eq!(curve[0].y, 0.0);
    }

    #[test]
    fn curve_is_pure() {
        let specs = vec![spec("0", 0.7, 0.4, 0.2, 0.5), spec("1", 5.0, 4.0, 3.0, 0.5)];
        assert_eq!(CurveFor::new(&specs).execute(), CurveFor::new(&specs).execute());
    }

    #[test]
    fn empty_population_passes_everything() {
        let curve = CurveFor::new(&[]).execute();
        assert!(curve.iter().all(|p| (p.y - 100.0).abs() < f64::EPSILON));
    }
}
