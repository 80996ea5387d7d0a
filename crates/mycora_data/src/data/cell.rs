use super::symbol::EMPTY_SYMBOL;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an organism. Handed out monotonically and never reused,
/// so a stale id simply stops resolving once its organism is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One location of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub symbol: char,
    pub owner: Option<OrganismId>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: EMPTY_SYMBOL,
            owner: None,
        }
    }
}

impl Cell {
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    /// Owned cells are protected: no instruction exposes a cell to
    /// foreign writes.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.is_owned()
    }

    /// Whether `writer` may overwrite this cell.
    #[must_use]
    pub fn writable_by(&self, writer: OrganismId) -> bool {
        !self.is_protected() || self.owner == Some(writer)
    }
}
