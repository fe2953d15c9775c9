//=========================================================================
// Paper Puzzle: Library Root
//
// Interaction and orchestration core for a torn-paper reconstruction
// puzzle: draggable pieces, snap-to-target, level completion and level
// sequencing, driven by a winit window on the main thread.
//
// Typical usage:
// ```no_run
// use paper_puzzle::EngineBuilder;
//
// fn main() {
//     EngineBuilder::new().build().run().ok();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the simulation: bus, pieces, drag, state machine, levels.
// It can be stepped headless through `core::simulation::Simulation`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window and input capture; `engine` wires it to the
// core thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
