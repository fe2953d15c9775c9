//=========================================================================
// Snap Test
//=========================================================================
//
// Decides whether a released piece is close enough to its target to
// start settling.
//
// Boundaries are deliberately asymmetric: an offset `d` is within
// leniency `L` when `0 <= d <= L` or `-L < d <= 0`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::geometry::Pose;

//=== Functions ===========================================================

/// Asymmetric leniency check for one signed offset.
pub fn within_leniency(offset: f32, leniency: f32) -> bool {
    (offset >= 0.0 && offset <= leniency) || (offset <= 0.0 && offset > -leniency)
}

/// Rotation closeness on the quaternion `z` component. `q` and `-q` are
/// the same rotation, so both signs are tried.
pub fn rotation_within_leniency(z: f32, leniency: f32) -> bool {
    within_leniency(z, leniency) || within_leniency(-z, leniency)
}

/// True when `local` is within `positional` on both axes and within
/// `rotational` of `target`'s orientation.
pub fn snap_test(local: &Pose, target: &Pose, positional: f32, rotational: f32) -> bool {
    let offset = local.position - target.position;
    let relative = target.rotation.conjugate() * local.rotation;

    within_leniency(offset.x, positional)
        && within_leniency(offset.y, positional)
        && rotation_within_leniency(relative.z, rotational)
}

//=========================================================================
// Unit Tests
//=========================================================================
