//=========================================================================
// Paper Puzzle Engine
//
// Main entry point. Wires the winit platform to the core thread that
// runs the puzzle simulation.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ init(): queued, runs on core thread
//         ├─ with_settings()         └─ run(): spawns core thread,
//         └─ with_levels()                     blocks on platform loop
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::error::PlatformError;
use crate::core::level::LevelCatalog;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::settings::PuzzleSettings;
use crate::core::simulation::Simulation;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== Constants ===========================================================

const DEFAULT_TPS: f64 = 60.0;
const DEFAULT_CHANNEL_CAPACITY: usize = 128;
const DEFAULT_TITLE: &str = "Paper Puzzle";

//=== EngineBuilder =======================================================

/// Builder for an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0
/// - **Channel capacity**: 128 platform messages
/// - **Settings**: [`PuzzleSettings::default`]
/// - **Levels**: empty catalog
///
/// # Examples
///
/// ```no_run
/// use paper_puzzle::EngineBuilder;
/// use paper_puzzle::core::level::LevelCatalog;
///
/// let catalog = LevelCatalog::from_path("levels/levels.toml")?;
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_levels(catalog)
///     .build()
///     .run()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    settings: PuzzleSettings,
    catalog: LevelCatalog,
    title: String,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            tps: DEFAULT_TPS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            settings: PuzzleSettings::default(),
            catalog: LevelCatalog::default(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Sets the simulation tick rate.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the platform → core channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn with_settings(mut self, settings: PuzzleSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_levels(mut self, catalog: LevelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, channel: {}, levels: {})",
            self.tps,
            self.channel_capacity,
            self.catalog.len()
        );

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(self.settings, self.catalog),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            title: self.title,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Paper puzzle runtime.
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Core Thread @ TPS)
///   │     └─► Simulation: drag, state machine, level director, cheats
///   │
///   └─► Platform (Event Loop)
///         └─► Window, input capture
///
/// Communication: bounded crossbeam channel (PlatformEvent)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
    title: String,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Queues a hook that runs on the core thread once the simulation is
    /// built, before the first tick. Hooks run in registration order.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut Simulation) + Send + 'static,
    {
        self.orchestrator.add_init(Box::new(init_fn));
        self
    }

    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform → core channel
    /// 2. Spawns the core thread at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On close the channel disconnects and the core thread is joined
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running. A panicking core thread is logged, not returned.
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting engine runtime (TPS: {})", self.tps);

        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);

        let platform = Platform::new(tx, &self.title);
        let result = platform.run();
        if let Err(e) = &result {
            error!("Platform error: {}", e);
        }

        // The platform (and its sender) is gone by now, so the core thread
        // sees a disconnect even if no WindowClosed was delivered.
        if let Err(e) = core_handle.join() {
            error!("Core thread panicked: {:?}", e);
        }

        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
