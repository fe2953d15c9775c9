//=========================================================================
// Drag Controller
//=========================================================================
//
// Owns the single drag session and every settle animation.
//
// States:
//   Idle ──grab──> Holding ──release──> snap_test ─┬─> Drop ──> Idle
//                                                  └─> StartSnap ──> Snapping ──> Snap ──> Idle
//
// Each tick: apply cheats → track pointer (position, scroll rotation,
// recenter, clamp) → advance settle animations.
//
// A piece grabbed close to its outline slides under the pointer until
// its centroid meets it, so the grip never sits on the very edge.
//
// Only this controller moves pieces. Outcomes are published as
// PieceAction events; nothing is called on other components directly.
//
//=========================================================================

//=== Module Declarations =================================================

mod settle;
mod snap;

//=== Public API ==========================================================

pub use settle::Easing;
pub use snap::{rotation_within_leniency, snap_test, within_leniency};

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::cheats::{CheatCommand, CheatEvent};
use crate::core::geometry::{
    centroid, clamp_to_visible_bounds, delta_between, distance_between, is_close_to_edge, Container,
    Pose, Viewport,
};
use crate::core::level::LevelData;
use crate::core::message_bus::{EventBus, Inbox};
use crate::core::piece::{
    self, Piece, PieceAction, PieceActionKind, PieceHandle, PieceId, BASELINE_RENDER_ORDER,
};
use settle::SettleAnimation;

//=== DragSettings ========================================================

/// Tuning for pointer-driven movement and the settle animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Degrees per second per wheel line.
    pub rotation_speed: f32,

    /// Multiplier on frame time while settling; `1 / settle_speed` seconds
    /// per animation.
    pub settle_speed: f32,

    pub easing: Easing,

    /// World distance around the grab point that must stay inside the
    /// piece. A grab closer to the outline starts recentering; `0` turns
    /// it off.
    pub edge_leniency: f32,

    /// World units per second the centroid travels toward the pointer
    /// while recentering.
    pub recenter_speed: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 2400.0,
            settle_speed: 4.0,
            easing: Easing::SmoothStep,
            edge_leniency: 0.15,
            recenter_speed: 6.0,
        }
    }
}

/// Recentering stops once the centroid is this close to the pointer.
const RECENTER_TOLERANCE: f32 = 0.01;

//=== DragState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    /// No piece held and nothing settling.
    Idle,

    /// A piece follows the pointer.
    Holding(PieceId),

    /// Nothing held, at least one settle animation running.
    Snapping,
}

//=== Internal Types ======================================================

struct HeldPiece {
    piece: Weak<RefCell<Piece>>,
    id: PieceId,
    return_parent: Container,

    /// Local-space centroid still sliding toward the pointer.
    recenter: Option<Vec2>,
}

/// Transient copy of the active level's drag parameters.
struct ActiveLevel {
    number: u32,
    positional_leniency: f32,
    rotational_leniency: f32,
    drag_container: Container,
}

//=== DragController ======================================================

pub struct DragController {
    settings: DragSettings,
    bus: EventBus,
    cheats: Inbox<CheatEvent>,
    level: Option<ActiveLevel>,
    held: Option<HeldPiece>,
    settling: Vec<SettleAnimation>,
    next_render_order: i32,
    auto_snap: bool,
}

impl DragController {
    pub fn new(settings: DragSettings, bus: &EventBus) -> Self {
        Self {
            settings,
            bus: bus.clone(),
            cheats: bus.inbox::<CheatEvent>(),
            level: None,
            held: None,
            settling: Vec::new(),
            next_render_order: BASELINE_RENDER_ORDER,
            auto_snap: false,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> DragState {
        match (&self.held, self.settling.is_empty()) {
            (Some(held), _) => DragState::Holding(held.id),
            (None, false) => DragState::Snapping,
            (None, true) => DragState::Idle,
        }
    }

    pub fn held_piece(&self) -> Option<PieceHandle> {
        self.held.as_ref().and_then(|h| h.piece.upgrade())
    }

    pub fn is_settling(&self, id: PieceId) -> bool {
        self.settling.iter().any(|a| a.id == id)
    }

    pub fn auto_snap(&self) -> bool {
        self.auto_snap
    }

    pub fn settings(&self) -> &DragSettings {
        &self.settings
    }

    //--- Configuration ----------------------------------------------------

    /// Bypasses the snap test on every release while enabled.
    pub fn set_auto_snap(&mut self, enabled: bool) {
        if self.auto_snap != enabled {
            info!("Auto-snap {}", if enabled { "enabled" } else { "disabled" });
        }
        self.auto_snap = enabled;
    }

    //--- Level Lifecycle --------------------------------------------------

    /// Binds the controller to a freshly loaded level. Scatters its pieces
    /// when the level asks for it.
    pub fn attach_level(&mut self, level: &LevelData, viewport: &Viewport) {
        if self.level.is_some() {
            self.detach_level();
        }

        self.level = Some(ActiveLevel {
            number: level.number(),
            positional_leniency: level.positional_leniency(),
            rotational_leniency: level.rotational_leniency(),
            drag_container: level.drag_container().clone(),
        });
        self.next_render_order = BASELINE_RENDER_ORDER;

        if level.shuffle_on_load() {
            self.shuffle(level.pieces(), level.shuffle_seed(), viewport);
        }

        debug!("Drag controller attached to level {}", level.number());
    }

    /// Forgets the active level. A held piece is dropped back to its
    /// container and all settle animations are cancelled.
    pub fn detach_level(&mut self) {
        if let Some(held) = self.held.take() {
            if let Some(handle) = held.piece.upgrade() {
                handle.borrow_mut().reparent(&held.return_parent);
                piece::force_release(&handle);
            }
            self.bus.publish(PieceAction::new(held.id, PieceActionKind::Drop));
        }

        self.settling.clear();

        if let Some(level) = self.level.take() {
            debug!("Drag controller detached from level {}", level.number);
        }
    }

    //--- Grab & Release ---------------------------------------------------

    /// Starts dragging `piece`. Rejected while another piece is held or
    /// when no level is attached.
    pub fn try_grab(&mut self, piece: &PieceHandle, pointer: Vec2) -> bool {
        if let Some(held) = &self.held {
            warn!("Grab rejected: {} is already held", held.id);
            return false;
        }
        let Some(level) = &self.level else {
            warn!("Grab rejected: no level attached");
            return false;
        };

        let drag_container = level.drag_container.clone();
        drag_container.set_position(pointer);

        self.next_render_order += 1;
        let leniency = self.settings.edge_leniency;
        let (id, return_parent, recenter) = {
            let mut p = piece.borrow_mut();
            let recenter = is_close_to_edge(p.shape(), &p.world_pose(), pointer, leniency)
                .then(|| centroid(p.shape().points()));
            let return_parent = p.parent().clone();
            p.reparent(&drag_container);
            p.set_render_order(self.next_render_order);
            (p.id(), return_parent, recenter)
        };

        // A new grab always wins over a pending settle
        self.settling.retain(|anim| anim.id != id);

        self.held = Some(HeldPiece {
            piece: Rc::downgrade(piece),
            id,
            return_parent,
            recenter,
        });

        self.bus.publish(PieceAction::new(id, PieceActionKind::Grab));
        debug!(
            "Grabbed {} (render order {}, recenter {})",
            id,
            self.next_render_order,
            recenter.is_some()
        );
        true
    }

    /// Releases `piece` if it is the held one, then snaps or drops it.
    pub fn try_release(&mut self, piece: &PieceHandle) -> bool {
        let is_held = self
            .held
            .as_ref()
            .is_some_and(|h| std::ptr::eq(h.piece.as_ptr(), Rc::as_ptr(piece)));
        if !is_held {
            warn!("Release rejected: {} is not the held piece", piece.borrow().id());
            return false;
        }
        let Some(held) = self.held.take() else {
            return false;
        };

        let (local, target) = {
            let mut p = piece.borrow_mut();
            p.reparent(&held.return_parent);
            (p.local(), p.target())
        };

        let (positional, rotational) = self
            .level
            .as_ref()
            .map(|l| (l.positional_leniency, l.rotational_leniency))
            .unwrap_or((0.0, 0.0));

        if self.auto_snap || snap_test(&local, &target, positional, rotational) {
            self.settling
                .push(SettleAnimation::new(Rc::downgrade(piece), held.id, local, target));
            self.bus.publish(PieceAction::new(held.id, PieceActionKind::StartSnap));
            debug!("Released {} within tolerance, settling", held.id);
        } else {
            self.bus.publish(PieceAction::new(held.id, PieceActionKind::Drop));
            debug!(
                "Dropped {} at offset ({:.3}, {:.3})",
                held.id,
                local.position.x - target.position.x,
                local.position.y - target.position.y
            );
        }

        true
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances the controller by one tick.
    ///
    /// `pointer` is in world space; `scroll` is this tick's wheel delta.
    pub fn update(&mut self, dt: f32, pointer: Vec2, scroll: f32, viewport: &Viewport) {
        self.process_cheats();
        self.track_pointer(dt, pointer, scroll, viewport);
        self.advance_settles(dt);
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_cheats(&mut self) {
        for cheat in self.cheats.drain() {
            if cheat.command == CheatCommand::AutoSnap {
                self.set_auto_snap(true);
            }
        }
    }

    fn track_pointer(&mut self, dt: f32, pointer: Vec2, scroll: f32, viewport: &Viewport) {
        let Some(held) = &mut self.held else {
            return;
        };
        let Some(level) = &self.level else {
            return;
        };
        let Some(piece) = held.piece.upgrade() else {
            warn!("Held {} was destroyed while dragging", held.id);
            self.held = None;
            return;
        };

        let container = &level.drag_container;
        container.set_position(pointer);

        if scroll != 0.0 {
            container.rotate_by((scroll * self.settings.rotation_speed * dt).to_radians());
        }

        if let Some(local_centroid) = held.recenter {
            let max_step = self.settings.recenter_speed * dt;
            if recenter_step(&piece, container, local_centroid, pointer, max_step) {
                debug!("{} recentered under the pointer", held.id);
                held.recenter = None;
            }
        }

        // Keep the held piece's bounding box on screen
        let Some(bounds) = piece.borrow().world_bounds() else {
            return;
        };
        let half = bounds.half_extents();
        let offset = bounds.center() - pointer;
        let clamped = clamp_to_visible_bounds(bounds.center(), half.x, half.y, &viewport.visible_bounds());
        container.set_position(clamped - offset);
    }

    fn advance_settles(&mut self, dt: f32) {
        let speed = self.settings.settle_speed;
        let easing = self.settings.easing;
        let mut finished = Vec::new();

        self.settling.retain_mut(|anim| {
            let Some(piece) = anim.piece.upgrade() else {
                return false;
            };
            if piece.borrow().is_held() {
                return false;
            }

            let (pose, done) = anim.advance(dt, speed, easing);
            let mut p = piece.borrow_mut();
            p.set_local(pose);
            if done {
                p.set_render_order(BASELINE_RENDER_ORDER);
                finished.push(anim.id);
            }
            !done
        });

        for id in finished {
            self.bus.publish(PieceAction::new(id, PieceActionKind::Snap));
            debug!("{} snapped into place", id);
        }
    }

    fn shuffle(&mut self, pieces: &[PieceHandle], seed: u64, viewport: &Viewport) {
        let mut rng = StdRng::seed_from_u64(seed);
        let bounds = viewport.visible_bounds();

        for handle in pieces {
            let mut piece = handle.borrow_mut();
            let half = piece
                .shape()
                .world_bounds(&Pose::IDENTITY)
                .map(|b| b.half_extents())
                .unwrap_or(Vec2::ZERO);

            let x = sample_axis(&mut rng, bounds.min.x + half.x, bounds.max.x - half.x);
            let y = sample_axis(&mut rng, bounds.min.y + half.y, bounds.max.y - half.y);
            let angle = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);

            let world = Pose::from_angle(Vec2::new(x, y), angle);
            let local = world.relative_to(&piece.parent().pose());
            piece.set_local(local);

            self.bus.publish(PieceAction::new(piece.id(), PieceActionKind::Shuffle));
        }

        debug!("Shuffled {} pieces (seed {})", pieces.len(), seed);
    }
}

/// Moves the held piece up to `max_step` so its centroid approaches
/// `pointer`. Returns `true` once the centroid is under the pointer.
fn recenter_step(
    piece: &PieceHandle,
    container: &Container,
    local_centroid: Vec2,
    pointer: Vec2,
    max_step: f32,
) -> bool {
    let mut p = piece.borrow_mut();
    let world_centroid = p.world_pose().transform_point(local_centroid);
    let distance = distance_between(world_centroid, pointer);
    if distance <= RECENTER_TOLERANCE {
        return true;
    }

    let step = delta_between(world_centroid, pointer).normalize_or_zero() * max_step.min(distance);
    let mut local = p.local();
    local.position += container.pose().inverse().rotate(step);
    p.set_local(local);

    distance - max_step.min(distance) <= RECENTER_TOLERANCE
}

fn sample_axis(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) * 0.5
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
