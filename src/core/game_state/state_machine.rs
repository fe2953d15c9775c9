//=========================================================================
// Game State Machine
//=========================================================================
//
// Single authority over the current GameAction / GameState.
//
// Architecture:
//   ActionRequest ─┐
//   UiInteract    ─┼─> perform_action() ─> GameActionEvent
//   CheatEvent    ─┤                   └─> GameStateChanged (on change)
//   BeatLastLevel ─┘
//
//   PieceAction::Snap ─> completion timer ─> check_completion()
//                                            └─> CompleteLevel (once)
//
// Inputs arrive through inboxes and are applied in `update`, so the
// machine never runs inside another component's handler.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Weak;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{
    ActionRequest, BeatLastLevel, GameAction, GameActionEvent, GameState, GameStateChanged,
    UiEventKind, UiInteract, UiInteraction,
};
use crate::core::cheats::CheatEvent;
use crate::core::level::{LevelData, LevelEvent};
use crate::core::message_bus::{EventBus, Inbox};
use crate::core::piece::{Piece, PieceAction, PieceActionKind};

//=== Constants ===========================================================

/// Default wait between a terminal snap and the completion check.
pub const DEFAULT_COMPLETION_DELAY: f32 = 0.1;

//=== GameStateMachine ====================================================

pub struct GameStateMachine {
    bus: EventBus,

    //--- Authoritative State ---------------------------------------------
    state: GameState,
    last_action: GameAction,
    level_number: Option<u32>,

    //--- Level Completion ------------------------------------------------
    pieces: Vec<Weak<RefCell<Piece>>>,
    completion_delay: f32,
    completion_timer: Option<f32>,
    level_complete: bool,
    loading: bool,

    //--- Inboxes ---------------------------------------------------------
    piece_actions: Inbox<PieceAction>,
    requests: Inbox<ActionRequest>,
    ui: Inbox<UiInteract>,
    cheats: Inbox<CheatEvent>,
    beat_last_level: Inbox<BeatLastLevel>,
    level_events: Inbox<LevelEvent>,
}

impl GameStateMachine {
    pub fn new(completion_delay: f32, bus: &EventBus) -> Self {
        Self {
            bus: bus.clone(),
            state: GameState::None,
            last_action: GameAction::None,
            level_number: None,
            pieces: Vec::new(),
            completion_delay: completion_delay.max(0.0),
            completion_timer: None,
            level_complete: false,
            loading: false,
            piece_actions: bus.inbox(),
            requests: bus.inbox(),
            ui: bus.inbox(),
            cheats: bus.inbox(),
            beat_last_level: bus.inbox(),
            level_events: bus.inbox(),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn last_action(&self) -> GameAction {
        self.last_action
    }

    pub fn level_number(&self) -> Option<u32> {
        self.level_number
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    /// True between `LevelEvent::LoadStarted` and `LevelEvent::Loaded`.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    //--- Actions ----------------------------------------------------------

    /// The one entry point for changing game state.
    ///
    /// Records the action, broadcasts it, and moves to the state the action
    /// maps to. Returns `false` for the `None` sentinel.
    pub fn perform_action(&mut self, action: GameAction, level: Option<u32>) -> bool {
        if action == GameAction::None {
            warn!("Rejected GameAction::None");
            return false;
        }

        self.last_action = action;
        if level.is_some() {
            self.level_number = level;
        }

        info!("Game action: {:?} (level {:?})", action, level);
        self.bus.publish(GameActionEvent { action, level });

        match action.resulting_state() {
            Some(next) if next != self.state => {
                self.set_state(next);
            }
            Some(next) => debug!("{:?} keeps state {:?}", action, next),
            None => {}
        }

        true
    }

    /// Toggles between Running and Paused. Ignored while a level loads,
    /// right after a level completes, or outside those two states.
    pub fn toggle_pause(&mut self) -> bool {
        if self.loading {
            debug!("Pause ignored while loading");
            return false;
        }
        if self.last_action == GameAction::CompleteLevel {
            debug!("Pause ignored after level completion");
            return false;
        }

        let level = self.level_number;
        match self.state {
            GameState::Running => self.perform_action(GameAction::PauseGame, level),
            GameState::Paused => self.perform_action(GameAction::ResumeGame, level),
            _ => false,
        }
    }

    //--- Level Binding ----------------------------------------------------

    /// Tracks the pieces of a newly loaded level for completion checks.
    pub fn attach_level(&mut self, level: &LevelData) {
        self.pieces = level.pieces().iter().map(std::rc::Rc::downgrade).collect();
        self.level_number = Some(level.number());
        self.level_complete = false;
        self.completion_timer = None;
        debug!("Tracking {} pieces for level {}", self.pieces.len(), level.number());
    }

    pub fn detach_level(&mut self) {
        self.pieces.clear();
        self.completion_timer = None;
        self.level_complete = false;
    }

    //--- Update Loop ------------------------------------------------------

    /// Applies queued requests and runs the completion timer. The timer
    /// is frozen while Paused so a level never completes behind the pause.
    pub fn update(&mut self, dt: f32) {
        self.process_level_events();
        self.process_requests();
        self.process_piece_actions();
        if self.state != GameState::Paused {
            self.tick_completion_timer(dt);
        }
    }

    /// Performs `CompleteLevel` once every tracked piece is settled.
    /// Returns `true` only on the call that completes the level.
    pub fn check_completion(&mut self) -> bool {
        if self.level_complete || self.pieces.is_empty() {
            return false;
        }

        let all_settled = self
            .pieces
            .iter()
            .all(|p| p.upgrade().is_some_and(|p| p.borrow().is_settled()));

        if !all_settled {
            return false;
        }

        self.level_complete = true;
        self.perform_action(GameAction::CompleteLevel, self.level_number)
    }

    //--- Internal Helpers -------------------------------------------------

    fn set_state(&mut self, state: GameState) -> bool {
        if state == GameState::None {
            warn!("Rejected transition to GameState::None");
            return false;
        }
        if state == self.state {
            warn!("Rejected transition to current state {:?}", state);
            return false;
        }

        let old = self.state;
        self.state = state;
        info!("Game state: {:?} -> {:?}", old, state);
        self.bus.publish(GameStateChanged {
            old,
            new: state,
            level: self.level_number,
        });
        true
    }

    fn process_level_events(&mut self) {
        for event in self.level_events.drain() {
            match event {
                LevelEvent::LoadStarted { .. } => self.loading = true,
                LevelEvent::Loaded { .. } | LevelEvent::Unloaded { .. } => self.loading = false,
            }
        }
    }

    fn process_requests(&mut self) {
        for request in self.requests.drain() {
            self.perform_action(request.action, request.level);
        }

        for ui in self.ui.drain() {
            if ui.kind == UiEventKind::GameAction && ui.interaction == UiInteraction::Click {
                self.perform_action(ui.action, ui.level);
            }
        }

        for cheat in self.cheats.drain() {
            if cheat.action != GameAction::None {
                self.perform_action(cheat.action, None);
            }
        }

        for _ in self.beat_last_level.drain() {
            self.perform_action(GameAction::BeatGame, self.level_number);
        }
    }

    fn process_piece_actions(&mut self) {
        for action in self.piece_actions.drain() {
            if action.kind == PieceActionKind::Snap && !self.level_complete && !self.pieces.is_empty() {
                self.completion_timer = Some(self.completion_delay);
            }
        }
    }

    fn tick_completion_timer(&mut self, dt: f32) {
        let Some(remaining) = self.completion_timer else {
            return;
        };

        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.completion_timer = Some(remaining);
            return;
        }

        self.completion_timer = None;
        self.check_completion();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cheats::CheatCommand;
    use crate::core::geometry::{Container, Polygon, Pose};
    use crate::core::piece::PieceHandle;
    use glam::Vec2;

    //--- Test Helpers -----------------------------------------------------

    struct Rig {
        bus: EventBus,
        machine: GameStateMachine,
        actions: Inbox<GameActionEvent>,
        changes: Inbox<GameStateChanged>,
    }

    fn rig() -> Rig {
        let bus = EventBus::new();
        let machine = GameStateMachine::new(DEFAULT_COMPLETION_DELAY, &bus);
        let actions = bus.inbox();
        let changes = bus.inbox();
        Rig { bus, machine, actions, changes }
    }

    fn level_with(bus: &EventBus, count: usize) -> (LevelData, Vec<PieceHandle>) {
        let puzzle = Container::new("puzzle", Pose::IDENTITY);
        let pieces: Vec<PieceHandle> = (0..count)
            .map(|_| {
                Piece::spawn(
                    "p",
                    puzzle.clone(),
                    Pose::IDENTITY,
                    Pose::IDENTITY,
                    Polygon::rectangle(Vec2::ONE),
                    bus,
                )
            })
            .collect();
        let level = LevelData::from_parts(
            1,
            0.45,
            0.1,
            puzzle,
            Container::new("drag", Pose::IDENTITY),
            pieces.clone(),
        );
        (level, pieces)
    }

    fn snap(bus: &EventBus, piece: &PieceHandle) {
        bus.publish(PieceAction::new(piece.borrow().id(), PieceActionKind::Snap));
        bus.flush();
    }

    fn completions(rig: &Rig) -> usize {
        rig.bus.flush();
        rig.actions
            .drain()
            .iter()
            .filter(|e| e.action == GameAction::CompleteLevel)
            .count()
    }

    fn run(rig: &mut Rig, seconds: f32) {
        let dt = 1.0 / 60.0;
        let mut t = 0.0;
        while t < seconds {
            rig.machine.update(dt);
            t += dt;
        }
    }

    //=====================================================================
    // Action / State Tests
    //=====================================================================

    #[test]
    fn every_action_maps_to_table_state() {
        for action in GameAction::ALL {
            let mut rig = rig();
            rig.machine.perform_action(GameAction::EnterMainMenu, None);
            let before = rig.machine.state();

            assert!(rig.machine.perform_action(action, None));

            let expected = action.resulting_state().unwrap_or(before);
            assert_eq!(rig.machine.state(), expected, "{:?}", action);
            assert_eq!(rig.machine.last_action(), action);
        }
    }

    #[test]
    fn none_action_is_rejected() {
        let mut rig = rig();
        rig.machine.perform_action(GameAction::StartLevel, Some(1));
        rig.bus.flush();
        rig.actions.clear();

        assert!(!rig.machine.perform_action(GameAction::None, None));
        assert_eq!(rig.machine.state(), GameState::Running);
        assert_eq!(rig.machine.last_action(), GameAction::StartLevel);

        rig.bus.flush();
        assert!(rig.actions.is_empty());
    }

    #[test]
    fn state_change_only_on_difference() {
        let mut rig = rig();
        rig.machine.perform_action(GameAction::StartLevel, Some(1));
        rig.machine.perform_action(GameAction::RestartLevel, None);
        rig.bus.flush();

        assert_eq!(rig.actions.len(), 2);
        let changes = rig.changes.drain();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old, GameState::None);
        assert_eq!(changes[0].new, GameState::Running);
        assert_eq!(changes[0].level, Some(1));
    }

    #[test]
    fn set_state_rejects_current_and_none() {
        let mut rig = rig();
        assert!(rig.machine.set_state(GameState::InMenu));
        assert!(!rig.machine.set_state(GameState::InMenu));
        assert!(!rig.machine.set_state(GameState::None));
        assert_eq!(rig.machine.state(), GameState::InMenu);

        rig.bus.flush();
        assert_eq!(rig.changes.len(), 1);
    }

    #[test]
    fn level_number_sticks_until_replaced() {
        let mut rig = rig();
        rig.machine.perform_action(GameAction::StartLevel, Some(3));
        rig.machine.perform_action(GameAction::PauseGame, None);
        assert_eq!(rig.machine.level_number(), Some(3));
    }

    //=====================================================================
    // Pause Tests
    //=====================================================================

    #[test]
    fn pause_toggles_between_running_and_paused() {
        let mut rig = rig();
        rig.machine.perform_action(GameAction::StartLevel, Some(1));

        assert!(rig.machine.toggle_pause());
        assert_eq!(rig.machine.state(), GameState::Paused);
        assert_eq!(rig.machine.last_action(), GameAction::PauseGame);

        assert!(rig.machine.toggle_pause());
        assert_eq!(rig.machine.state(), GameState::Running);
        assert_eq!(rig.machine.last_action(), GameAction::ResumeGame);
    }

    #[test]
    fn pause_ignored_in_menu() {
        let mut rig = rig();
        rig.machine.perform_action(GameAction::EnterMainMenu, None);
        assert!(!rig.machine.toggle_pause());
        assert_eq!(rig.machine.state(), GameState::InMenu);
    }

    #[test]
    fn pause_ignored_after_completion() {
        let mut rig = rig();
        rig.machine.perform_action(GameAction::StartLevel, Some(1));
        rig.machine.perform_action(GameAction::CompleteLevel, Some(1));

        assert!(!rig.machine.toggle_pause());
        assert_eq!(rig.machine.state(), GameState::Running);
    }

    #[test]
    fn completion_waits_while_paused() {
        let mut rig = rig();
        let (level, pieces) = level_with(&rig.bus, 1);
        rig.machine.attach_level(&level);
        rig.machine.perform_action(GameAction::StartLevel, Some(1));

        snap(&rig.bus, &pieces[0]);
        rig.machine.update(1.0 / 60.0);
        assert!(rig.machine.toggle_pause());

        run(&mut rig, 0.5);
        assert_eq!(completions(&rig), 0);
        assert_eq!(rig.machine.state(), GameState::Paused);

        assert!(rig.machine.toggle_pause());
        assert_eq!(rig.machine.state(), GameState::Running);

        run(&mut rig, 0.2);
        assert_eq!(completions(&rig), 1);
        assert_eq!(rig.machine.state(), GameState::Running);
        assert!(!rig.machine.toggle_pause());
    }

    #[test]
    fn pause_ignored_while_loading() {
        let mut rig = rig();
        rig.machine.perform_action(GameAction::StartLevel, Some(1));
        rig.bus.publish(LevelEvent::LoadStarted { number: 2 });
        rig.bus.flush();
        rig.machine.update(0.0);

        assert!(rig.machine.is_loading());
        assert!(!rig.machine.toggle_pause());

        rig.bus.publish(LevelEvent::Loaded { number: 2 });
        rig.bus.flush();
        rig.machine.update(0.0);
        assert!(rig.machine.toggle_pause());
    }

    //=====================================================================
    // Request Funnel Tests
    //=====================================================================

    #[test]
    fn ui_click_is_funnelled() {
        let mut rig = rig();
        rig.bus.publish(UiInteract::click(GameAction::StartLevel, Some(2)));
        rig.bus.publish(UiInteract {
            kind: UiEventKind::GameAction,
            interaction: UiInteraction::Enter,
            action: GameAction::EnterMainMenu,
            level: None,
        });
        rig.bus.flush();
        rig.machine.update(0.0);

        assert_eq!(rig.machine.state(), GameState::Running);
        assert_eq!(rig.machine.level_number(), Some(2));
    }

    #[test]
    fn cheat_action_is_funnelled() {
        let mut rig = rig();
        rig.bus.publish(CheatEvent {
            action: GameAction::EnterMainMenu,
            command: CheatCommand::None,
        });
        rig.bus.flush();
        rig.machine.update(0.0);

        assert_eq!(rig.machine.state(), GameState::InMenu);
    }

    #[test]
    fn beat_last_level_becomes_beat_game() {
        let mut rig = rig();
        rig.machine.perform_action(GameAction::LoadNextLevel, None);
        rig.bus.publish(BeatLastLevel);
        rig.bus.flush();
        rig.machine.update(0.0);

        assert_eq!(rig.machine.last_action(), GameAction::BeatGame);
        assert_eq!(rig.machine.state(), GameState::Running);
    }

    //=====================================================================
    // Completion Tests
    //=====================================================================

    #[test]
    fn completion_waits_for_all_pieces_and_delay() {
        let mut rig = rig();
        let (level, pieces) = level_with(&rig.bus, 3);
        rig.machine.attach_level(&level);
        rig.machine.perform_action(GameAction::StartLevel, Some(1));

        snap(&rig.bus, &pieces[0]);
        snap(&rig.bus, &pieces[1]);
        run(&mut rig, 0.5);
        assert_eq!(completions(&rig), 0);

        snap(&rig.bus, &pieces[2]);
        rig.machine.update(1.0 / 60.0);
        assert_eq!(completions(&rig), 0);

        run(&mut rig, 0.2);
        assert_eq!(completions(&rig), 1);
        assert!(rig.machine.is_level_complete());
    }

    #[test]
    fn completion_is_idempotent() {
        let mut rig = rig();
        let (level, pieces) = level_with(&rig.bus, 1);
        rig.machine.attach_level(&level);

        snap(&rig.bus, &pieces[0]);
        run(&mut rig, 0.2);
        assert_eq!(completions(&rig), 1);

        snap(&rig.bus, &pieces[0]);
        run(&mut rig, 0.2);
        assert!(!rig.machine.check_completion());
        assert_eq!(completions(&rig), 0);
    }

    #[test]
    fn start_snap_does_not_schedule_check() {
        let mut rig = rig();
        let (level, pieces) = level_with(&rig.bus, 1);
        rig.machine.attach_level(&level);

        rig.bus.publish(PieceAction::new(pieces[0].borrow().id(), PieceActionKind::StartSnap));
        rig.bus.flush();
        run(&mut rig, 0.5);

        assert_eq!(completions(&rig), 0);
    }

    #[test]
    fn reattach_resets_completion() {
        let mut rig = rig();
        let (level, pieces) = level_with(&rig.bus, 1);
        rig.machine.attach_level(&level);
        snap(&rig.bus, &pieces[0]);
        run(&mut rig, 0.2);
        assert!(rig.machine.is_level_complete());

        let (next, _next_pieces) = level_with(&rig.bus, 2);
        rig.machine.attach_level(&next);
        assert!(!rig.machine.is_level_complete());
    }
}
