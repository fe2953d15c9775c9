//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Runs the puzzle simulation on its own thread at a fixed tick rate,
// fed by the platform thread through a crossbeam channel.
//
// Architecture:
//   Platform thread                     Core thread
//   ───────────────                     ───────────
//   winit ─> PlatformEvent ──channel──> EventCollector
//                                         │
//                                         ├─ input batches ─> Simulation::push_input
//                                         ├─ latest resize ─> Simulation::resize
//                                         └─ step(dt) at TPS
//
// The simulation is single-threaded (Rc-based); it is built inside the
// core thread from Send-able settings and level content.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod cheats;
pub mod drag;
pub mod error;
pub mod game_state;
pub mod geometry;
pub mod globals;
pub mod input;
pub mod level;
pub mod message_bus;
pub mod piece;
pub(crate) mod platform_bridge;
pub mod settings;
pub mod simulation;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{error, info};

//=== Internal Dependencies ===============================================

use level::LevelCatalog;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use settings::PuzzleSettings;
use simulation::Simulation;

//=== Types ===============================================================

/// Runs once on the core thread after the simulation is built.
pub(crate) type InitFn = Box<dyn FnOnce(&mut Simulation) + Send>;

//=== CoreSystemsOrchestrator =============================================

pub(crate) struct CoreSystemsOrchestrator {
    settings: PuzzleSettings,
    catalog: LevelCatalog,
    init: Vec<InitFn>,
}

impl CoreSystemsOrchestrator {
    pub(crate) fn new(settings: PuzzleSettings, catalog: LevelCatalog) -> Self {
        Self {
            settings,
            catalog,
            init: Vec::new(),
        }
    }

    pub(crate) fn add_init(&mut self, init: InitFn) {
        self.init.push(init);
    }

    /// Spawns the core thread. It exits when the window closes, the
    /// channel disconnects, or a tick fails.
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let dt = frame_duration.as_secs_f32();

        thread::spawn(move || {
            let mut collector = EventCollector::new(receiver);
            let mut simulation = Simulation::new(self.settings, self.catalog);
            for init in self.init {
                init(&mut simulation);
            }
            info!("Core thread running at {} TPS", tps);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }
                for batch in collector.take_batches() {
                    simulation.push_input(batch);
                }
                if let Some((width, height)) = collector.take_resize() {
                    simulation.resize(width, height);
                }

                //--- Step 2: Advance the simulation ------------------------
                if let Err(e) = simulation.step(dt) {
                    error!("Simulation stopped: {}", e);
                    break;
                }

                //--- Step 3: Maintain fixed pacing -------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        })
    }
}
