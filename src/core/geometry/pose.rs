//=========================================================================
// Pose & Container
//=========================================================================
//
// Rigid 2D transforms and the shared transform nodes pieces hang from.
//
// Rotation is stored as a unit quaternion about +Z, so `(z, w)` and
// `(-z, -w)` describe the same orientation.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::ops::Mul;
use std::rc::Rc;

use glam::{Quat, Vec2};

//=== Pose ================================================================

/// Position plus rotation about the Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec2, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Builds a pose from a position and an angle in radians.
    pub fn from_angle(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_z(angle),
        }
    }

    /// Signed rotation angle in radians, in `(-PI, PI]`.
    pub fn angle(&self) -> f32 {
        let angle = 2.0 * self.rotation.z.atan2(self.rotation.w);
        wrap_angle(angle)
    }

    /// Rotates a vector by this pose's rotation only.
    pub fn rotate(&self, v: Vec2) -> Vec2 {
        (self.rotation * v.extend(0.0)).truncate()
    }

    /// Maps a point from this pose's local space into its parent space.
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.position + self.rotate(point)
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.conjugate();
        let position = -(rotation * self.position.extend(0.0)).truncate();
        Self { position, rotation }
    }

    /// Expresses `self` (a world pose) in the local space of `parent`.
    pub fn relative_to(&self, parent: &Pose) -> Self {
        parent.inverse() * *self
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `parent * local` yields the world pose of `local`.
impl Mul for Pose {
    type Output = Pose;

    fn mul(self, local: Pose) -> Pose {
        Pose {
            position: self.transform_point(local.position),
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }
}

fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

//=== Container ===========================================================

/// Shared transform node (puzzle container, drag container).
///
/// Clones refer to the same node. Equality is identity, not value.
#[derive(Clone)]
pub struct Container {
    name: Rc<str>,
    pose: Rc<RefCell<Pose>>,
}

impl Container {
    pub fn new(name: &str, pose: Pose) -> Self {
        Self {
            name: Rc::from(name),
            pose: Rc::new(RefCell::new(pose)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// World pose of the node.
    pub fn pose(&self) -> Pose {
        *self.pose.borrow()
    }

    pub fn set_pose(&self, pose: Pose) {
        *self.pose.borrow_mut() = pose;
    }

    pub fn set_position(&self, position: Vec2) {
        self.pose.borrow_mut().position = position;
    }

    /// Adds `angle` radians to the node's rotation.
    pub fn rotate_by(&self, angle: f32) {
        let mut pose = self.pose.borrow_mut();
        pose.rotation = (Quat::from_rotation_z(angle) * pose.rotation).normalize();
    }

    pub fn ptr_eq(&self, other: &Container) -> bool {
        Rc::ptr_eq(&self.pose, &other.pose)
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("pose", &self.pose())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
