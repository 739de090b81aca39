use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Point3, UnitQuaternion};

/// Rotation of a particle as three independent Euler angles in radians.
///
/// Each angle lies in `[0, 2*pi)`. The rotation is applied about the body
/// origin at placement time; hull vertices are stored unrotated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Rotation about the x axis (roll).
    pub x: f64,
    /// Rotation about the y axis (pitch).
    pub y: f64,
    /// Rotation about the z axis (yaw).
    pub z: f64,
}

impl Orientation {
    /// Creates an orientation from angles in radians.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates an orientation from angles in degrees, wrapped into
    /// `[0, 2*pi)` radians.
    #[must_use]
    pub fn from_degrees(x: f64, y: f64, z: f64) -> Self {
        let wrap = |degrees: f64| degrees.to_radians().rem_euclid(TAU);
        Self {
            x: wrap(x),
            y: wrap(y),
            z: wrap(z),
        }
    }

    /// Draws three independent angles, each uniform in `[0, 360)` degrees.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut angle = || rng.random_range(0.0..360.0_f64);
        let x = angle();
        let y = angle();
        let z = angle();
        Self::from_degrees(x, y, z)
    }

    /// Returns the rotation as a unit quaternion.
    #[must_use]
    pub fn to_quaternion(&self) -> UnitQuaternion {
        UnitQuaternion::from_euler_angles(self.x, self.y, self.z)
    }

    /// Rotates a body-space point about the body origin.
    #[must_use]
    pub fn rotate(&self, point: &Point3) -> Point3 {
        self.to_quaternion() * point
    }

    /// Returns `true` if every angle lies in `[0, 2*pi)`.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|a| (0.0..TAU).contains(a))
    }
}
