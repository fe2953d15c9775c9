//=========================================================================
// Puzzle Systems
//=========================================================================
//
// Owns the puzzle's logic components and runs them in a fixed order each
// tick, flushing the bus between stages so every stage sees the events
// of the one before it.
//
// Tick pipeline:
//   1. input     fold platform batches into the state tracker
//   2. start     perform the configured start action (first tick only)
//   3. pointer   press → pick + grab (Running), release → drop (always)
//   4. drag      follow pointer, wheel rotation, settles    (not Paused)
//   5. pause     pause key toggles Running / Paused
//   6. cheats    typed codes → CheatEvent
//   ── flush ──
//   7. state     funnel requests, completion timer
//   ── flush ──
//   8. levels    director loads / unloads, systems re-attach
//   ── flush ──
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::cheats::CheatConsole;
use crate::core::drag::DragController;
use crate::core::error::PuzzleError;
use crate::core::game_state::{ActionRequest, GameAction, GameActionEvent, GameState, GameStateMachine};
use crate::core::geometry::Viewport;
use crate::core::input::{KeyCode, MouseButton};
use crate::core::level::{LevelCatalog, LevelChange, LevelDirector};
use crate::core::message_bus::Inbox;
use crate::core::piece::{self, pick_topmost};
use crate::core::settings::PuzzleSettings;

//=== PuzzleSystems =======================================================

pub struct PuzzleSystems {
    pub drag: DragController,
    pub state_machine: GameStateMachine,
    pub director: LevelDirector,
    pub cheats: CheatConsole,

    pause_key: KeyCode,
    auto_advance: bool,
    start_action: Option<ActionRequest>,
    performed: Inbox<GameActionEvent>,
}

impl PuzzleSystems {
    pub fn new(settings: &PuzzleSettings, catalog: LevelCatalog, ctx: &GlobalContext) -> Self {
        let bus = &ctx.bus;
        Self {
            drag: DragController::new(settings.drag, bus),
            state_machine: GameStateMachine::new(settings.completion_delay, bus),
            director: LevelDirector::new(catalog, bus),
            cheats: CheatConsole::new(settings.cheat_codes.clone(), settings.cheats_enabled),
            pause_key: settings.pause_key,
            auto_advance: settings.auto_advance,
            start_action: Some(settings.start_action),
            performed: bus.inbox(),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick. An error means the level content is broken and the
    /// simulation cannot continue.
    pub fn update(&mut self, ctx: &mut GlobalContext, dt: f32) -> Result<(), PuzzleError> {
        ctx.begin_frame();

        if let Some(start) = self.start_action.take() {
            info!("Start action: {:?} (level {:?})", start.action, start.level);
            self.state_machine.perform_action(start.action, start.level);
        }

        let state = self.state_machine.state();
        let pointer = ctx.pointer_world();

        // Releases always reach the held piece so a pause never strands it.
        if state == GameState::Running {
            self.route_press(ctx, pointer);
        }
        self.route_release(ctx);
        if state != GameState::Paused {
            self.drag
                .update(dt, pointer, ctx.input_state.scroll_delta(), &ctx.viewport);
        }

        if ctx.input_state.is_key_pressed(self.pause_key) {
            self.state_machine.toggle_pause();
        }

        self.cheats.update(&ctx.input_state, &ctx.bus);
        ctx.bus.flush();

        self.state_machine.update(dt);
        ctx.bus.flush();

        self.request_auto_advance(ctx);
        self.apply_level_changes(&ctx.viewport)?;
        ctx.bus.flush();

        Ok(())
    }

    //--- Internal Helpers -------------------------------------------------

    fn route_press(&mut self, ctx: &GlobalContext, pointer: Vec2) {
        if !ctx.input_state.is_button_pressed(MouseButton::Left) {
            return;
        }

        let picked = self
            .director
            .current()
            .and_then(|level| pick_topmost(level.pieces(), pointer));
        if let Some(handle) = picked {
            piece::pointer_down(&handle, &mut self.drag, pointer);
        }
    }

    fn route_release(&mut self, ctx: &GlobalContext) {
        if !ctx.input_state.is_button_released(MouseButton::Left) {
            return;
        }

        if let Some(handle) = self.drag.held_piece() {
            piece::pointer_up(&handle, &mut self.drag);
        }
    }

    fn request_auto_advance(&mut self, ctx: &GlobalContext) {
        let completed = self
            .performed
            .drain()
            .iter()
            .any(|e| e.action == GameAction::CompleteLevel);

        if completed && self.auto_advance {
            debug!("Level complete, requesting the next one");
            ctx.bus.publish(ActionRequest::new(GameAction::LoadNextLevel));
        }
    }

    fn apply_level_changes(&mut self, viewport: &Viewport) -> Result<(), PuzzleError> {
        let drag = &mut self.drag;
        let state_machine = &mut self.state_machine;

        self.director.update(|change| match change {
            LevelChange::Unloading(_) => {
                drag.detach_level();
                state_machine.detach_level();
            }
            LevelChange::Loaded(level) => {
                drag.attach_level(level, viewport);
                state_machine.attach_level(level);
            }
        })?;

        Ok(())
    }
}
