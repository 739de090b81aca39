use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::AggregateSpec;
use crate::error::{InputError, Result};
use crate::hull::GenerateHull;

/// Which per-class volume the count derivation divides by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountBasis {
    /// Empirical volume of one reference hull generated per class.
    #[default]
    Hull,
    /// Nominal ellipsoid volume `4/3 * pi * a * b * c`.
    Ellipsoid,
}

impl CountBasis {
    /// Returns the volume of each class under this basis.
    ///
    /// A reference hull that fails to build yields `NaN`, which the count
    /// derivation treats as a class with no volume.
    pub fn volumes<R: Rng>(self, specs: &[AggregateSpec], rng: &mut R) -> Vec<f64> {
        match self {
            Self::Ellipsoid => specs.iter().map(AggregateSpec::ellipsoid_volume).collect(),
            Self::Hull => specs
                .iter()
                .map(|spec| match GenerateHull::new(spec).execute(&mut *rng) {
                    Ok(hull) => hull.volume(),
                    Err(err) => {
                        warn!(aggregate = spec.id(), %err, "reference hull failed");
                        f64::NAN
                    }
                })
                .collect(),
        }
    }
}

/// Derives how many particles of each class to place.
///
/// The class with the largest empirical hull volume (first one on ties)
/// fixes the total
/// solid volume as `volume / target_volume_fraction`. Every class then gets
/// `round(target_volume_fraction * total / volume)` particles. Classes with a
/// zero or non-finite volume get zero.
pub struct DeriveCounts<'a> {
    specs: &'a mut [AggregateSpec],
    volumes: Option<Vec<f64>>,
}

impl<'a> DeriveCounts<'a> {
    /// Creates a new `DeriveCounts` operation.
    ///
    /// Without [`Self::with_volumes`] the nominal ellipsoid volumes are used.
    #[must_use]
    pub fn new(specs: &'a mut [AggregateSpec]) -> Self {
        Self {
            specs,
            volumes: None,
        }
    }

    /// Uses explicit per-class volumes, in the same order as the classes.
    #[must_use]
    pub fn with_volumes(mut self, volumes: Vec<f64>) -> Self {
        self.volumes = Some(volumes);
        self
    }

    /// Executes the derivation, assigning each class its draw count and
    /// returning the total number of particles.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit volume list does not match the number
    /// of classes, or a class already carries a draw count.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn execute(self) -> Result<usize> {
        let volumes = match self.volumes {
            Some(volumes) => {
                if volumes.len() != self.specs.len() {
                    let n = self.specs.len() as f64;
                    return Err(InputError::ParameterOutOfRange {
                        parameter: "volumes.len()",
                        value: volumes.len() as f64,
                        min: n,
                        max: n,
                    }
                    .into());
                }
                volumes
            }
            None => self
                .specs
                .iter()
                .map(AggregateSpec::ellipsoid_volume)
                .collect(),
        };

        let usable = |v: f64| v.is_finite() && v > 0.0;
        let mut largest: Option<usize> = None;
        for (index, &volume) in volumes.iter().enumerate() {
            if usable(volume) && largest.is_none_or(|best| volume > volumes[best]) {
                largest = Some(index);
            }
        }

        let total_volume = largest.map_or(0.0, |index| {
            volumes[index] / self.specs[index].target_volume_fraction()
        });

        let mut total: usize = 0;
        for (spec, &volume) in self.specs.iter_mut().zip(&volumes) {
            let count = if usable(volume) {
                (spec.target_volume_fraction() * total_volume / volume).round() as usize
            } else {
                0
            };
            spec.assign_draw_count(count)?;
            total = total.saturating_add(count);
        }

        Ok(total)
    }
}
