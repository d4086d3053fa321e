//! Overlap primitives used for collision, pickup and trigger zones.

use crate::math::Vec2;

/// Axis-aligned box stored as center and half-extent, with cached corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisBox {
    center: Vec2,
    radius: Vec2,
    min: Vec2,
    max: Vec2,
}

impl AxisBox {
    /// The half-extent is taken by magnitude, so a mirrored (negative) extent
    /// describes the same box.
    pub fn new(center: Vec2, radius: Vec2) -> Self {
        let radius = radius.abs();
        Self {
            center,
            radius,
            min: center - radius,
            max: center + radius,
        }
    }

    pub const fn center(&self) -> Vec2 {
        self.center
    }

    pub const fn radius(&self) -> Vec2 {
        self.radius
    }

    pub const fn min(&self) -> Vec2 {
        self.min
    }

    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Open-interval overlap on both axes: boxes that only touch do not overlap.
    pub fn overlaps(&self, other: &AxisBox) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Circular trigger zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strict containment: a point exactly on the rim is outside, and a
    /// zero-radius circle contains nothing.
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) < self.radius
    }
}
