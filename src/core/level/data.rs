//=========================================================================
// Level Data
//=========================================================================
//
// Runtime instance of a level: its containers, its pieces and the
// leniencies the drag controller snaps with. Owns the only strong piece
// handles; dropping it unsubscribes every piece.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::config::LevelConfig;
use crate::core::geometry::{Container, Pose};
use crate::core::message_bus::EventBus;
use crate::core::piece::{Piece, PieceHandle};

//=== LevelData ===========================================================

pub struct LevelData {
    number: u32,
    positional_leniency: f32,
    rotational_leniency: f32,
    shuffle_on_load: bool,
    shuffle_seed: u64,
    puzzle_container: Container,
    drag_container: Container,
    pieces: Vec<PieceHandle>,
}

impl LevelData {
    /// Spawns every configured piece under a fresh puzzle container.
    pub fn instantiate(config: &LevelConfig, bus: &EventBus) -> Self {
        let puzzle = Container::new("puzzle", Pose::IDENTITY);
        let drag = Container::new("drag", Pose::IDENTITY);

        let pieces = config
            .pieces
            .iter()
            .map(|p| {
                Piece::spawn(
                    &p.name,
                    puzzle.clone(),
                    p.start.to_pose(),
                    p.target.to_pose(),
                    p.polygon(),
                    bus,
                )
            })
            .collect::<Vec<_>>();

        debug!("Instantiated level {} with {} pieces", config.number, pieces.len());

        let mut level = Self::from_parts(
            config.number,
            config.positional_leniency,
            config.rotational_leniency,
            puzzle,
            drag,
            pieces,
        );
        level.set_shuffle(config.shuffle_on_load, config.shuffle_seed);
        level
    }

    /// Builds a level from already spawned pieces. Shuffling is off.
    pub fn from_parts(
        number: u32,
        positional_leniency: f32,
        rotational_leniency: f32,
        puzzle_container: Container,
        drag_container: Container,
        pieces: Vec<PieceHandle>,
    ) -> Self {
        Self {
            number,
            positional_leniency,
            rotational_leniency,
            shuffle_on_load: false,
            shuffle_seed: 0,
            puzzle_container,
            drag_container,
            pieces,
        }
    }

    pub fn set_shuffle(&mut self, enabled: bool, seed: u64) {
        self.shuffle_on_load = enabled;
        self.shuffle_seed = seed;
    }

    //--- Queries ----------------------------------------------------------

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn positional_leniency(&self) -> f32 {
        self.positional_leniency
    }

    pub fn rotational_leniency(&self) -> f32 {
        self.rotational_leniency
    }

    pub fn shuffle_on_load(&self) -> bool {
        self.shuffle_on_load
    }

    pub fn shuffle_seed(&self) -> u64 {
        self.shuffle_seed
    }

    pub fn puzzle_container(&self) -> &Container {
        &self.puzzle_container
    }

    pub fn drag_container(&self) -> &Container {
        &self.drag_container
    }

    /// Pieces in level order.
    pub fn pieces(&self) -> &[PieceHandle] {
        &self.pieces
    }

    pub fn settled_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.borrow().is_settled()).count()
    }
}

impl std::fmt::Debug for LevelData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelData")
            .field("number", &self.number)
            .field("pieces", &self.pieces.len())
            .field("positional_leniency", &self.positional_leniency)
            .field("rotational_leniency", &self.rotational_leniency)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
