//=========================================================================
// Simulation
//=========================================================================
//
// One puzzle instance: context plus systems, stepped by the core thread
// or directly by tests. Single-threaded; build it on the thread that
// steps it.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::error::PuzzleError;
use crate::core::game_state::{GameAction, GameState};
use crate::core::geometry::Viewport;
use crate::core::globals::{GlobalContext, PuzzleSystems};
use crate::core::input::InputEvent;
use crate::core::level::{LevelCatalog, LevelData};
use crate::core::message_bus::EventBus;
use crate::core::settings::PuzzleSettings;

//=== Simulation ==========================================================

pub struct Simulation {
    pub ctx: GlobalContext,
    pub systems: PuzzleSystems,
}

impl Simulation {
    /// Default 1280x720 window.
    pub fn new(settings: PuzzleSettings, catalog: LevelCatalog) -> Self {
        let mut viewport = Viewport::default();
        viewport.half_height = settings.viewport_half_height;
        Self::with_viewport(settings, catalog, viewport)
    }

    pub fn with_viewport(settings: PuzzleSettings, catalog: LevelCatalog, viewport: Viewport) -> Self {
        let ctx = GlobalContext::new(viewport);
        let systems = PuzzleSystems::new(&settings, catalog, &ctx);
        Self { ctx, systems }
    }

    //--- Stepping ---------------------------------------------------------

    pub fn push_input(&mut self, batch: Vec<InputEvent>) {
        self.ctx.push_input(batch);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.viewport.resize(width, height);
    }

    pub fn step(&mut self, dt: f32) -> Result<(), PuzzleError> {
        self.systems.update(&mut self.ctx, dt)
    }

    //--- Queries ----------------------------------------------------------

    pub fn bus(&self) -> &EventBus {
        &self.ctx.bus
    }

    pub fn state(&self) -> GameState {
        self.systems.state_machine.state()
    }

    pub fn last_action(&self) -> GameAction {
        self.systems.state_machine.last_action()
    }

    pub fn level(&self) -> Option<&LevelData> {
        self.systems.director.current()
    }

    /// Pixel position that maps to `world` under the current viewport.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let viewport = &self.ctx.viewport;
        let half = Vec2::new(viewport.half_width(), viewport.half_height);
        let ndc = (world - viewport.center) / half;
        let size = viewport.screen_size();
        Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_to_screen_inverts_screen_to_world() {
        let sim = Simulation::new(PuzzleSettings::default(), LevelCatalog::default());
        for world in [Vec2::ZERO, Vec2::new(3.0, -2.0), Vec2::new(-6.5, 4.0)] {
            let screen = sim.world_to_screen(world);
            let back = sim.ctx.viewport.screen_to_world(screen);
            assert!((back - world).length() < 1e-4, "{:?} -> {:?}", world, back);
        }
    }

    #[test]
    fn unknown_start_level_stops_simulation() {
        let mut sim = Simulation::new(PuzzleSettings::default(), LevelCatalog::default());
        let err = sim.step(1.0 / 60.0).unwrap_err();
        assert!(matches!(
            err,
            PuzzleError::Config(crate::core::error::ConfigError::UnknownLevel(1))
        ));
    }

    #[test]
    fn resize_updates_viewport() {
        let mut sim = Simulation::new(PuzzleSettings::default(), LevelCatalog::default());
        sim.resize(800, 800);
        assert_eq!(sim.ctx.viewport.screen_size(), Vec2::new(800.0, 800.0));
        assert_eq!(sim.ctx.viewport.half_width(), sim.ctx.viewport.half_height);
    }
}
