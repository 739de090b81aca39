//! Aggregate particle classes.

use std::collections::HashSet;
use std::f64::consts::PI;

use crate::error::{InputError, Result};

/// Minimum number of surface samples needed to span a polyhedron.
pub const MIN_SAMPLE_COUNT: usize = 4;

/// Description of one aggregate particle class.
///
/// A class is an ellipsoid with semi-axes `a`, `b`, `c` that the hull builder
/// approximates with a convex polyhedron, together with the share of total
/// solid volume the class should occupy.
///
/// All fields are fixed at construction except the draw count, which is
/// assigned once per run by the count derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSpec {
    id: String,
    a: f64,
    b: f64,
    c: f64,
    target_volume_fraction: f64,
    sample_count: usize,
    ellipsoid_volume: f64,
    draw_count: Option<usize>,
}

impl AggregateSpec {
    /// Creates a new aggregate class.
    ///
    /// # Errors
    ///
    /// Returns an error if any semi-axis is not a positive finite number, the
    /// volume fraction lies outside `(0, 1]`, or fewer than four surface
    /// samples are requested.
    pub fn new(
        id: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
        target_volume_fraction: f64,
        sample_count: usize,
    ) -> Result<Self> {
        let id = id.into();
        let invalid = |reason: String| InputError::InvalidAggregate {
            id: id.clone(),
            reason,
        };

        for (name, value) in [("a", a), ("b", b), ("c", c)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!(
                    "semi-axis {name} must be positive and finite, got {value}"
                ))
                .into());
            }
        }
        if !target_volume_fraction.is_finite()
            || target_volume_fraction <= 0.0
            || target_volume_fraction > 1.0
        {
            return Err(invalid(format!(
                "target volume fraction must lie in (0, 1], got {target_volume_fraction}"
            ))
            .into());
        }
        if sample_count < MIN_SAMPLE_COUNT {
            return Err(invalid(format!(
                "sample count must be at least {MIN_SAMPLE_COUNT}, got {sample_count}"
            ))
            .into());
        }

        Ok(Self {
            id,
            a,
            b,
            c,
            target_volume_fraction,
            sample_count,
            ellipsoid_volume: 4.0 / 3.0 * PI * a * b * c,
            draw_count: None,
        })
    }

    /// Stable identifier of this class.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Semi-axes `(a, b, c)`.
    #[must_use]
    pub fn semi_axes(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Intended share of total solid volume, in `(0, 1]`.
    #[must_use]
    pub fn target_volume_fraction(&self) -> f64 {
        self.target_volume_fraction
    }

    /// Number of random surface points used to build each hull.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Nominal ellipsoid volume `4/3 * pi * a * b * c`.
    #[must_use]
    pub fn ellipsoid_volume(&self) -> f64 {
        self.ellipsoid_volume
    }

    /// Largest semi-axis.
    #[must_use]
    pub fn max_semi_axis(&self) -> f64 {
        self.a.max(self.b).max(self.c)
    }

    /// Second-largest semi-axis, which decides the sieve a particle is
    /// retained on.
    #[must_use]
    pub fn characteristic_size(&self) -> f64 {
        let mut axes = [self.a, self.b, self.c];
        axes.sort_by(f64::total_cmp);
        axes[1]
    }

    /// Target number of instances, once derived.
    #[must_use]
    pub fn draw_count(&self) -> Option<usize> {
        self.draw_count
    }

    /// Attaches the derived draw count.
    ///
    /// # Errors
    ///
    /// Returns an error if a draw count was already assigned in this run.
    pub fn assign_draw_count(&mut self, count: usize) -> Result<()> {
        if self.draw_count.is_some() {
            return Err(InputError::DrawCountAssigned(self.id.clone()).into());
        }
        self.draw_count = Some(count);
        Ok(())
    }
}

/// Checks that a population is non-empty and its ids are unique.
///
/// # Errors
///
/// Returns an error on an empty slice or a repeated id.
pub fn validate_population(specs: &[AggregateSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(InputError::EmptyPopulation.into());
    }
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        if !seen.insert(spec.id()) {
            return Err(InputError::DuplicateAggregate(spec.id().to_owned()).into());
        }
    }
    Ok(())
}

/// Largest semi-axis across a population, or `0.0` when empty.
#[must_use]
pub fn max_dimension(specs: &[AggregateSpec]) -> f64 {
    specs
        .iter()
        .map(AggregateSpec::max_semi_axis)
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn ellipsoid_volume_is_computed_at_construction() {
        let spec = AggregateSpec::new("0", 1.0, 2.0, 3.0, 0.5, 20).unwrap();
        assert_relative_eq!(spec.ellipsoid_volume(), 8.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn characteristic_size_is_second_largest_axis() {
        let spec = AggregateSpec::new("0", 10.0, 9.0, 2.0, 0.5, 20).unwrap();
        assert_relative_eq!(spec.characteristic_size(), 9.0);
        assert_relative_eq!(spec.max_semi_axis(), 10.0);
    }

    #[test]
    fn non_positive_axis_fails() {
        assert!(AggregateSpec::new("0", 0.0, 1.0, 1.0, 0.5, 20).is_err());
        assert!(AggregateSpec::new("0", 1.0, -1.0, 1.0, 0.5, 20).is_err());
        assert!(AggregateSpec::new("0", 1.0, 1.0, f64::NAN, 0.5, 20).is_err());
    }

    #[test]
    fn fraction_out_of_range_fails() {
        assert!(AggregateSpec::new("0", 1.0, 1.0, 1.0, 0.0, 20).is_err());
        assert!(AggregateSpec::new("0", 1.0, 1.0, 1.0, 1.5, 20).is_err());
        assert!(AggregateSpec::new("0", 1.0, 1.0, 1.0, 1.0, 20).is_ok());
    }

    #[test]
    fn too_few_samples_fails() {
        assert!(AggregateSpec::new("0", 1.0, 1.0, 1.0, 0.5, 3).is_err());
    }

    #[test]
    fn draw_count_is_assigned_once() {
        let mut spec = AggregateSpec::new("0", 1.0, 1.0, 1.0, 0.5, 20).unwrap();
        assert_eq!(spec.draw_count(), None);
        spec.assign_draw_count(4).unwrap();
        assert_eq!(spec.draw_count(), Some(4));
        assert!(spec.assign_draw_count(5).is_err());
        assert_eq!(spec.draw_count(), Some(4));
    }

    #[test]
    fn population_rejects_duplicates_and_empty() {
        assert!(validate_population(&[]).is_err());
        let a = AggregateSpec::new("x", 1.0, 1.0, 1.0, 0.5, 20).unwrap();
        let b = AggregateSpec::new("x", 2.0, 2.0, 2.0, 0.5, 20).unwrap();
        assert!(validate_population(&[a.clone(), b]).is_err());
        assert!(validate_population(&[a]).is_ok());
    }

    #[test]
    fn max_dimension_spans_population() {
        let specs = vec![
            AggregateSpec::new("0", 1.0, 4.0, 1.0, 0.5, 20).unwrap(),
            AggregateSpec::new("1", 3.0, 2.0, 2.0, 0.5, 20).unwrap(),
        ];
        assert_relative_eq!(max_dimension(&specs), 4.0);
    }
}
