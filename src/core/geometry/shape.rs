//=========================================================================
// Shapes
//=========================================================================
//
// Piece hit regions and their axis-aligned bounds.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::Pose;

//=== Aabb ================================================================

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point. `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for p in rest {
            aabb.min = aabb.min.min(*p);
            aabb.max = aabb.max.max(*p);
        }
        Some(aabb)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half width and half height.
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

//=== Polygon =============================================================

/// Simple polygon in the owner's local space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle centred on the local origin.
    pub fn rectangle(half_extents: Vec2) -> Self {
        let h = half_extents;
        Self::new(vec![
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ])
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertices mapped through `pose`.
    pub fn world_points(&self, pose: &Pose) -> Vec<Vec2> {
        self.points.iter().map(|p| pose.transform_point(*p)).collect()
    }

    /// World-space bounds, or `None` for an empty polygon.
    pub fn world_bounds(&self, pose: &Pose) -> Option<Aabb> {
        Aabb::from_points(&self.world_points(pose))
    }

    /// Even-odd containment test for a point in local space.
    pub fn contains_local(&self, point: Vec2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > point.y) != (b.y > point.y) {
                let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Containment test for a world point, with the polygon placed at `pose`.
    pub fn contains_world(&self, pose: &Pose, point: Vec2) -> bool {
        self.contains_local(pose.inverse().transform_point(point))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
