//! JSON run descriptions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateSpec;
use crate::container::{Container, Cuboid, Cylinder, Notch};
use crate::error::{ConfigError, Result};
use crate::packing::{PackingPlan, PackingSettings, PhysicsParams};

/// One aggregate class as written in a run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateConfig {
    pub id: String,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    #[serde(alias = "vf_max")]
    pub target_volume_fraction: f64,
    #[serde(alias = "n_cuts")]
    pub sample_count: usize,
}

/// Container shape, tagged by `"shape"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ContainerConfig {
    Cuboid { width: f64, height: f64, depth: f64 },
    Cylinder { radius: f64, height: f64 },
}

/// A complete packing run: population, container, physics and scheduler
/// settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub aggregates: Vec<AggregateConfig>,
    pub container: ContainerConfig,
    #[serde(default)]
    pub notch: Option<Notch>,
    #[serde(default)]
    pub physics: PhysicsParams,
    #[serde(default)]
    pub packing: PackingSettings,
}

impl RunConfig {
    /// Parses a run description from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid run description.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(ConfigError::from)?)
    }

    /// Loads a run description from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_json_str(&json)
    }

    /// Builds validated aggregate specs.
    ///
    /// # Errors
    ///
    /// Returns an error if any aggregate is malformed.
    pub fn specs(&self) -> Result<Vec<AggregateSpec>> {
        self.aggregates
            .iter()
            .map(|agg| {
                AggregateSpec::new(
                    agg.id.clone(),
                    agg.a,
                    agg.b,
                    agg.c,
                    agg.target_volume_fraction,
                    agg.sample_count,
                )
            })
            .collect()
    }

    /// Builds the container.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is not positive and finite.
    pub fn container(&self) -> Result<Box<dyn Container>> {
        Ok(match self.container {
            ContainerConfig::Cuboid {
                width,
                height,
                depth,
            } => Box::new(Cuboid::new(width, height, depth)?),
            ContainerConfig::Cylinder { radius, height } => {
                Box::new(Cylinder::new(radius, height)?)
            }
        })
    }

    #[must_use]
    pub fn settings(&self) -> PackingSettings {
        self.packing
    }

    /// Assembles a [`PackingPlan`] ready to start against a physics world.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregates, container or notch are malformed.
    pub fn plan(&self) -> Result<PackingPlan> {
        let mut plan = PackingPlan::new(self.specs()?, self.container()?)
            .with_settings(self.packing)
            .with_physics(self.physics);
        if let Some(notch) = self.notch {
            notch.validate()?;
            plan = plan.with_notch(notch);
        }
        Ok(plan)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::container::NotchDirection;
    use crate::error::GranulisError;
    use crate::gradation::CountBasis;
    use crate::packing::PoolPolicy;

    const CYLINDER_RUN: &str = r#"{
        "aggregates": [
            {"id": "fine", "a": 1.0, "b": 0.8, "c": 0.6, "vf_max": 0.4, "n_cuts": 20},
            {"id": "coarse", "a": 3.0, "b": 2.0, "c": 2.0, "target_volume_fraction": 0.6, "sample_count": 30}
        ],
        "container": {"shape": "cylinder", "radius": 10.0, "height": 20.0},
        "notch": {"height": 1.5, "width": 4.0, "direction": "z"},
        "physics": {"friction": 0.7, "gravity": -3.0},
        "packing": {"seed": 11, "pool_policy": "exhaust", "count_basis": "ellipsoid"}
    }"#;

    #[test]
    fn parses_full_run_with_aliases() {
        let config = RunConfig::from_json_str(CYLINDER_RUN).unwrap();

        assert_eq!(config.aggregates.len(), 2);
        assert_relative_eq!(config.aggregates[0].target_volume_fraction, 0.4);
        assert_eq!(config.aggregates[0].sample_count, 20);
        assert_eq!(
            config.container,
            ContainerConfig::Cylinder {
                radius: 10.0,
                height: 20.0
            }
        );
        assert_eq!(config.notch.unwrap().direction, NotchDirection::Z);
        assert_relative_eq!(config.physics.material.friction, 0.7);
        assert_relative_eq!(config.physics.material.restitution, 0.0);
        assert_relative_eq!(config.physics.body_scale, 1.0);

        let settings = config.settings();
        assert_eq!(settings.seed, Some(11));
        assert_eq!(settings.pool_policy, PoolPolicy::Exhaust);
        assert_eq!(settings.count_basis, CountBasis::Ellipsoid);
        assert_eq!(settings.headroom_layers, 5);
    }

    #[test]
    fn minimal_run_uses_defaults() {
        let config = RunConfig::from_json_str(
            r#"{
                "aggregates": [{"id": "0", "a": 1, "b": 1, "c": 1, "vf_max": 1.0, "n_cuts": 8}],
                "container": {"shape": "cuboid", "width": 4, "height": 4, "depth": 4}
            }"#,
        )
        .unwrap();

        assert!(config.notch.is_none());
        assert_eq!(config.physics, PhysicsParams::default());
        assert_eq!(config.settings(), PackingSettings::default());
        assert_eq!(config.settings().count_basis, CountBasis::Hull);
        assert_relative_eq!(config.container().unwrap().volume(), 64.0);
        assert_eq!(config.specs().unwrap()[0].id(), "0");
    }

    #[test]
    fn builds_cylinder_container() {
        let config = RunConfig::from_json_str(CYLINDER_RUN).unwrap();
        let container = config.container().unwrap();
        assert_relative_eq!(container.height(), 20.0);
        assert_relative_eq!(
            container.volume(),
            std::f64::consts::PI * 100.0 * 20.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn invalid_aggregate_surfaces_as_input_error() {
        let mut config = RunConfig::from_json_str(CYLINDER_RUN).unwrap();
        config.aggregates[1].a = -1.0;
        assert!(matches!(config.specs(), Err(GranulisError::Input(_))));
        assert!(config.plan().is_err());
    }

    #[test]
    fn unknown_shape_is_a_parse_error() {
        let result = RunConfig::from_json_str(
            r#"{"aggregates": [], "container": {"shape": "sphere", "radius": 1}}"#,
        );
        assert!(matches!(
            result,
            Err(GranulisError::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = RunConfig::from_path("/nonexistent/granulis/run.json");
        assert!(matches!(result, Err(GranulisError::Config(ConfigError::Io(_)))));
    }

    #[test]
    fn round_trips_through_json() {
        let config = RunConfig::from_json_str(CYLINDER_RUN).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RunConfig::from_json_str(&json).unwrap(), config);
    }
}
