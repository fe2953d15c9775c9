//=========================================================================
// Piece
//=========================================================================
//
// One draggable paper fragment.
//
// A piece owns its pose relative to a parent container, the target pose
// it must reach, and a `settled` flag. It only asks the drag controller
// for grabs and releases; every pose change comes from the controller.
//
// Pattern: spawn() → subscribe to PieceAction (own id only) → drop
//
//=========================================================================

//=== Module Declarations =================================================

mod action;

//=== Public API ==========================================================

pub use action::{PieceAction, PieceActionKind, PieceId};

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::drag::DragController;
use crate::core::geometry::{Aabb, Container, Polygon, Pose};
use crate::core::message_bus::{EventBus, Subscription};

//=== Types ===============================================================

/// Shared handle to a piece. The level owns the strong handles; the drag
/// controller and animations keep weak ones.
pub type PieceHandle = Rc<RefCell<Piece>>;

/// Render order given to pieces that are not being dragged.
pub const BASELINE_RENDER_ORDER: i32 = 0;

//=== Piece ===============================================================

pub struct Piece {
    id: PieceId,
    name: String,
    parent: Container,
    local: Pose,
    target: Pose,
    shape: Polygon,
    settled: bool,
    render_order: i32,
    held: bool,
    subscription: Option<Subscription>,
}

impl Piece {
    //--- Construction -----------------------------------------------------

    /// Creates a piece under `parent` and registers its PieceAction handler.
    pub fn spawn(
        name: &str,
        parent: Container,
        local: Pose,
        target: Pose,
        shape: Polygon,
        bus: &EventBus,
    ) -> PieceHandle {
        let handle = Rc::new(RefCell::new(Piece {
            id: PieceId::next(),
            name: name.to_string(),
            parent,
            local,
            target,
            shape,
            settled: false,
            render_order: BASELINE_RENDER_ORDER,
            held: false,
            subscription: None,
        }));

        let weak: Weak<RefCell<Piece>> = Rc::downgrade(&handle);
        let subscription = bus.subscribe::<PieceAction, _>(move |action, _| {
            let Some(piece) = weak.upgrade() else {
                return;
            };
            let Ok(mut piece) = piece.try_borrow_mut() else {
                warn!("Piece busy while receiving {:?}", action);
                return;
            };
            if piece.id == action.piece {
                piece.on_piece_action(action.kind);
            }
        });

        handle.borrow_mut().subscription = Some(subscription);
        handle
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> &Container {
        &self.parent
    }

    /// Pose relative to the parent container.
    pub fn local(&self) -> Pose {
        self.local
    }

    pub fn target(&self) -> Pose {
        self.target
    }

    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn render_order(&self) -> i32 {
        self.render_order
    }

    /// True between an accepted grab and an accepted release.
    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn world_pose(&self) -> Pose {
        self.parent.pose() * self.local
    }

    /// World-space bounds of the hit region.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.shape.world_bounds(&self.world_pose())
    }

    pub fn contains_world_point(&self, point: Vec2) -> bool {
        self.shape.contains_world(&self.world_pose(), point)
    }

    //--- Mutation (drag controller) ---------------------------------------

    /// Moves the piece under `container`, keeping its world pose.
    pub fn reparent(&mut self, container: &Container) {
        let world = self.world_pose();
        self.local = world.relative_to(&container.pose());
        self.parent = container.clone();
    }

    pub(crate) fn set_local(&mut self, local: Pose) {
        self.local = local;
    }

    pub(crate) fn set_render_order(&mut self, order: i32) {
        self.render_order = order;
    }

    //--- Event Handling ---------------------------------------------------

    fn on_piece_action(&mut self, kind: PieceActionKind) {
        match kind {
            PieceActionKind::Grab | PieceActionKind::StartSnap => self.settled = false,
            PieceActionKind::Snap => self.settled = true,
            PieceActionKind::Drop | PieceActionKind::Shuffle => {}
        }
        trace!("{} '{}' handled {:?} (settled: {})", self.id, self.name, kind, self.settled);
    }
}

impl std::fmt::Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Piece")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("local", &self.local)
            .field("settled", &self.settled)
            .field("render_order", &self.render_order)
            .field("held", &self.held)
            .finish()
    }
}

//=== Pointer Handling ====================================================

/// Pointer pressed over `piece`. Asks the drag controller for a grab and
/// marks the piece held only if the grab is granted.
pub fn pointer_down(piece: &PieceHandle, drag: &mut DragController, pointer: Vec2) -> bool {
    let already_held = piece.borrow().held;
    if already_held {
        return false;
    }

    let granted = drag.try_grab(piece, pointer);
    piece.borrow_mut().held = granted;
    granted
}

/// Pointer released while `piece` is held. Asks the drag controller to
/// drop it; the piece stays held if the release is refused.
pub fn pointer_up(piece: &PieceHandle, drag: &mut DragController) -> bool {
    let held = piece.borrow().held;
    if !held {
        return false;
    }

    let released = drag.try_release(piece);
    if released {
        piece.borrow_mut().held = false;
    }
    released
}

/// Topmost piece under `point`: highest render order, later pieces win ties.
pub fn pick_topmost(pieces: &[PieceHandle], point: Vec2) -> Option<PieceHandle> {
    pieces
        .iter()
        .filter(|p| p.borrow().contains_world_point(point))
        .max_by_key(|p| p.borrow().render_order)
        .cloned()
}

/// Clears the held flag when the drag controller lets go on its own
/// (level detach).
pub(crate) fn force_release(piece: &PieceHandle) {
    piece.borrow_mut().held = false;
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square_at(bus: &EventBus, parent: &Container, position: Vec2) -> PieceHandle {
        Piece::spawn(
            "square",
            parent.clone(),
            Pose::from_angle(position, 0.0),
            Pose::IDENTITY,
            Polygon::rectangle(Vec2::splat(0.5)),
            bus,
        )
    }

    //=====================================================================
    // Event Handling Tests
    //=====================================================================

    #[test]
    fn snap_settles_and_grab_unsettles() {
        let bus = EventBus::new();
        let parent = Container::new("puzzle", Pose::IDENTITY);
        let piece = square_at(&bus, &parent, Vec2::ZERO);
        let id = piece.borrow().id();

        bus.publish(PieceAction::new(id, PieceActionKind::Snap));
        bus.flush();
        assert!(piece.borrow().is_settled());

        bus.publish(PieceAction::new(id, PieceActionKind::Grab));
        bus.flush();
        assert!(!piece.borrow().is_settled());
    }

    #[test]
    fn start_snap_clears_settled() {
        let bus = EventBus::new();
        let parent = Container::new("puzzle", Pose::IDENTITY);
        let piece = square_at(&bus, &parent, Vec2::ZERO);
        let id = piece.borrow().id();

        bus.publish(PieceAction::new(id, PieceActionKind::Snap));
        bus.publish(PieceAction::new(id, PieceActionKind::StartSnap));
        bus.flush();
        assert!(!piece.borrow().is_settled());
    }

    #[test]
    fn actions_for_other_pieces_are_ignored() {
        let bus = EventBus::new();
        let parent = Container::new("puzzle", Pose::IDENTITY);
        let a = square_at(&bus, &parent, Vec2::ZERO);
        let b = square_at(&bus, &parent, Vec2::ONE);

        let b_id = b.borrow().id();
        bus.publish(PieceAction::new(b_id, PieceActionKind::Snap));
        bus.flush();

        assert!(!a.borrow().is_settled());
        assert!(b.borrow().is_settled());
    }

    #[test]
    fn dropping_piece_unsubscribes() {
        let bus = EventBus::new();
        let parent = Container::new("puzzle", Pose::IDENTITY);
        let piece = square_at(&bus, &parent, Vec2::ZERO);
        assert_eq!(bus.subscriber_count::<PieceAction>(), 1);

        drop(piece);
        assert_eq!(bus.subscriber_count::<PieceAction>(), 0);
    }

    //=====================================================================
    // Geometry Tests
    //=====================================================================

    #[test]
    fn reparent_preserves_world_pose() {
        let bus = EventBus::new();
        let puzzle = Container::new("puzzle", Pose::from_angle(Vec2::new(1.0, 2.0), 0.3));
        let drag = Container::new("drag", Pose::from_angle(Vec2::new(-4.0, 0.5), -1.1));
        let piece = square_at(&bus, &puzzle, Vec2::new(0.25, -0.75));

        let before = piece.borrow().world_pose();
        piece.borrow_mut().reparent(&drag);
        let after = piece.borrow().world_pose();

        assert_eq!(piece.borrow().parent(), &drag);
        assert!((before.position - after.position).length() < 1e-5);
        assert!((before.angle() - after.angle()).abs() < 1e-5);
    }

    #[test]
    fn contains_world_point_follows_parent() {
        let bus = EventBus::new();
        let puzzle = Container::new("puzzle", Pose::IDENTITY);
        let piece = square_at(&bus, &puzzle, Vec2::ZERO);

        assert!(piece.borrow().contains_world_point(Vec2::new(0.2, 0.2)));
        puzzle.set_position(Vec2::new(5.0, 0.0));
        assert!(!piece.borrow().contains_world_point(Vec2::new(0.2, 0.2)));
        assert!(piece.borrow().contains_world_point(Vec2::new(5.2, 0.2)));
    }

    //=====================================================================
    // Picking Tests
    //=====================================================================

    #[test]
    fn pick_topmost_prefers_render_order() {
        let bus = EventBus::new();
        let puzzle = Container::new("puzzle", Pose::IDENTITY);
        let low = square_at(&bus, &puzzle, Vec2::ZERO);
        let high = square_at(&bus, &puzzle, Vec2::new(0.2, 0.0));
        let pieces = vec![high.clone(), low.clone()];

        low.borrow_mut().set_render_order(3);
        let picked = pick_topmost(&pieces, Vec2::new(0.1, 0.0)).unwrap();
        assert!(Rc::ptr_eq(&picked, &low));
    }

    #[test]
    fn pick_topmost_ties_go_to_later_piece() {
        let bus = EventBus::new();
        let puzzle = Container::new("puzzle", Pose::IDENTITY);
        let first = square_at(&bus, &puzzle, Vec2::ZERO);
        let second = square_at(&bus, &puzzle, Vec2::ZERO);
        let pieces = vec![first, second.clone()];

        let picked = pick_topmost(&pieces, Vec2::ZERO).unwrap();
        assert!(Rc::ptr_eq(&picked, &second));
    }

    #[test]
    fn pick_topmost_misses() {
        let bus = EventBus::new();
        let puzzle = Container::new("puzzle", Pose::IDENTITY);
        let pieces = vec![square_at(&bus, &puzzle, Vec2::ZERO)];

        assert!(pick_topmost(&pieces, Vec2::new(3.0, 3.0)).is_none());
    }
}
