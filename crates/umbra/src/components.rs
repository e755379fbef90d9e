//! # Gameplay Components
//!
//! Plain values. Systems copy them out of the world, change the copy, and
//! write it back.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use umbra_core::Component;

/// 3D vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X axis.
    pub x: f32,
    /// Y axis (up).
    pub y: f32,
    /// Z axis.
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Placement in the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Yaw in radians.
    pub rotation: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// A unit-scale transform at `position`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Component for Transform {
    const NAME: &'static str = "Transform";
}

/// Linear velocity in units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Units per second.
    pub linear: Vec3,
    /// Radians per second around the up axis.
    pub angular: f32,
}

impl Component for Velocity {
    const NAME: &'static str = "Velocity";
}

/// Makes noise while moving.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseEmitter {
    /// Loudness of one footstep at the source.
    pub loudness: f32,
    /// Distance travelled between two footsteps.
    pub stride: f32,
    /// Distance travelled since the last footstep.
    pub travelled: f32,
}

impl Default for NoiseEmitter {
    fn default() -> Self {
        Self {
            loudness: 1.0,
            stride: 1.0,
            travelled: 0.0,
        }
    }
}

impl Component for NoiseEmitter {
    const NAME: &'static str = "NoiseEmitter";
}

/// Where an entity was last seen, and when.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LastKnownPosition {
    /// Position at the time of the sighting.
    pub position: Vec3,
    /// Tick of the sighting.
    pub tick: u64,
}

impl Component for LastKnownPosition {
    const NAME: &'static str = "LastKnownPosition";
}
