//! Error types for the simulation core.
//!
//! Arena failures are typed so the VM can turn them into organism-local
//! faults; only [`SimError`] ever reaches a driver.

use mycora_data::{Coord, OrganismId, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected arena mutation. Never leaves the arena half-modified.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// Write attempted on a cell another organism owns.
    #[error("cell {coord} is protected by organism {owner}")]
    ProtectedCellViolation { coord: Coord, owner: OrganismId },

    /// Claim or hand-over over cells that are not available.
    #[error("region {rect} is unavailable")]
    RegionUnavailable { rect: Rect },
}

/// Errors surfaced past the core to its driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Inspection requested with no living organisms.
    #[error("population is empty")]
    EmptyPopulation,

    /// Seed genome is empty or ragged.
    #[error("invalid genome: {0}")]
    InvalidGenome(String),

    #[error("arena error: {0}")]
    Arena(#[from] ArenaError),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// A failure an organism absorbs locally. Recorded on the organism and
/// counted, never propagated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fault {
    #[error("write blocked by a protected cell")]
    ProtectedCellViolation,
    #[error("offspring region unavailable")]
    RegionUnavailable,
    #[error("offspring buffer not fully written")]
    IncompleteOffspring,
    #[error("no offspring buffer allocated")]
    NoOffspringBuffer,
    #[error("offspring buffer already allocated")]
    OffspringPending,
    #[error("address stack overflow")]
    StackOverflow,
    #[error("address stack underflow")]
    StackUnderflow,
    #[error("template not found")]
    TemplateNotFound,
}

impl From<ArenaError> for Fault {
    fn from(err: ArenaError) -> Self {
        match err {
            ArenaError::ProtectedCellViolation { .. } => Fault::ProtectedCellViolation,
            ArenaError::RegionUnavailable { .. } => Fault::RegionUnavailable,
        }
    }
}
