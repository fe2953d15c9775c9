//=========================================================================
// Piece Actions
//=========================================================================
//
// Events published by the drag controller for every piece transition.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

//=== PieceId =============================================================

/// Identity of one spawned piece. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u64);

static NEXT_PIECE_ID: AtomicU64 = AtomicU64::new(1);

impl PieceId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        Self(NEXT_PIECE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece#{}", self.0)
    }
}

//=== PieceActionKind =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceActionKind {
    /// Piece started following the pointer.
    Grab,

    /// Released outside the snap tolerance.
    Drop,

    /// Released inside the tolerance, settle animation started.
    StartSnap,

    /// Settle animation finished, piece sits exactly on its target.
    Snap,

    /// Piece scattered to a random pose when its level loaded.
    Shuffle,
}

//=== PieceAction =========================================================

/// One piece transition. Consumers filter by `piece`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceAction {
    pub piece: PieceId,
    pub kind: PieceActionKind,
}

impl PieceAction {
    pub fn new(piece: PieceId, kind: PieceActionKind) -> Self {
        Self { piece, kind }
    }
}
