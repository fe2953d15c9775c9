//=========================================================================
// Settle Animation
//=========================================================================
//
// Per-piece interpolation from the release pose to the exact target,
// advanced once per tick. Cancelling means dropping the state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Weak;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::geometry::Pose;
use crate::core::piece::{Piece, PieceId};

//=== Easing ==============================================================

/// Curve applied to normalised animation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    SmoothStep,
    EaseOutCubic,
    EaseInOutQuad,
}

impl Easing {
    /// Evaluates the curve. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

//=== SettleAnimation =====================================================

pub(crate) struct SettleAnimation {
    pub(crate) piece: Weak<RefCell<Piece>>,
    pub(crate) id: PieceId,
    elapsed: f32,
    start: Pose,
    target: Pose,
}

impl SettleAnimation {
    pub(crate) fn new(piece: Weak<RefCell<Piece>>, id: PieceId, start: Pose, target: Pose) -> Self {
        Self {
            piece,
            id,
            elapsed: 0.0,
            start,
            target,
        }
    }

    /// Steps time by `dt * speed` and returns the pose for this tick along
    /// with whether the animation reached its end.
    pub(crate) fn advance(&mut self, dt: f32, speed: f32, easing: Easing) -> (Pose, bool) {
        self.elapsed = (self.elapsed + dt * speed).min(1.0);

        if self.elapsed >= 1.0 {
            return (self.target, true);
        }

        let t = easing.apply(self.elapsed);
        let pose = Pose::new(
            self.start.position.lerp(self.target.position, t),
            self.start.rotation.slerp(self.target.rotation, t),
        );
        (pose, false)
    }

    pub(crate) fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::SmoothStep,
        Easing::EaseOutCubic,
        Easing::EaseInOutQuad,
    ];

    #[test]
    fn easing_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{:?} at 1", easing);
        }
    }

    #[test]
    fn easing_clamps_input() {
        for easing in ALL {
            assert_eq!(easing.apply(-3.0), easing.apply(0.0));
            assert_eq!(easing.apply(7.0), easing.apply(1.0));
        }
    }

    #[test]
    fn easing_is_monotonic() {
        for easing in ALL {
            let mut last = 0.0;
            for i in 1..=20 {
                let v = easing.apply(i as f32 / 20.0);
                assert!(v >= last, "{:?} decreased", easing);
                last = v;
            }
        }
    }

    #[test]
    fn animation_reaches_exact_target() {
        let start = Pose::from_angle(Vec2::new(0.3, -0.2), 0.08);
        let target = Pose::IDENTITY;
        let mut anim = SettleAnimation::new(Weak::new(), PieceId::next(), start, target);

        let (mid, done) = anim.advance(0.1, 4.0, Easing::Linear);
        assert!(!done);
        assert!((mid.position - Vec2::new(0.18, -0.12)).length() < 1e-5);

        let (end, done) = anim.advance(1.0, 4.0, Easing::Linear);
        assert!(done);
        assert_eq!(end, target);
        assert_eq!(anim.elapsed(), 1.0);
    }
}
