use bevy_ecs::prelude::Component;
use glam::DVec3;

/// Axis-aligned box collider described by its half extents.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub half_extents: DVec3,
    pub offset: DVec3,
}

impl BoxCollider {
    /// Create a BoxCollider with given full size
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            half_extents: DVec3::new(width, height, depth).abs() * 0.5,
            offset: DVec3::ZERO,
        }
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: DVec3) -> Self {
        self.offset = offset;
        self
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    pub fn aabb(&self, position: DVec3) -> (DVec3, DVec3) {
        let center = position + self.offset;
        (center - self.half_extents, center + self.half_extents)
    }

    /// Box volume.
    pub fn volume(&self) -> f64 {
        let size = self.half_extents * 2.0;
        size.x * size.y * size.z
    }

    /// Longest edge of the box.
    pub fn longest_edge(&self) -> f64 {
        self.half_extents.max_element() * 2.0
    }

    /// Sphere vs AABB overlap test (closest point on the box to the center).
    pub fn overlaps_sphere(&self, position: DVec3, center: DVec3, radius: f64) -> bool {
        let (min, max) = self.aabb(position);
        let closest = center.clamp(min, max);
        closest.distance_squared(center) < radius * radius
    }

    /// Point containment in world space.
    pub fn contains_point(&self, position: DVec3, point: DVec3) -> bool {
        let (min, max) = self.aabb(position);
        point.cmpge(min).all() && point.cmple(max).all()
    }
}
