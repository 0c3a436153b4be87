//! Math utilities and types
//!
//! Provides the small set of math types the pooling engine hands to hosts:
//! positions, rotations and the combined [`Pose`].

pub use nalgebra::{Quaternion, Unit, Vector3};

use serde::{Deserialize, Serialize};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Position and rotation of an instance in world space
///
/// Pools never interpret poses beyond storing the relocation target and
/// passing spawn poses through to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Pose at the origin with no rotation
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }

    /// Create a pose from position and rotation
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create a pose with only a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
        }
    }

    /// Create a pose from a position and Euler angles in radians
    pub fn from_position_euler(position: Vec3, roll: f32, pitch: f32, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_euler_angles(roll, pitch, yaw),
        }
    }

    /// Same rotation, different position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Distance between the positions of two poses
    pub fn distance(&self, other: &Pose) -> f32 {
        (self.position - other.position).magnitude()
    }
}

impl From<Vec3> for Pose {
    fn from(position: Vec3) -> Self {
        Self::from_position(position)
    }
}
