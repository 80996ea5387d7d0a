//! Plain data shared by every Mycora crate: grid geometry, arena cells and
//! the instruction alphabet. Nothing in here knows how a tick works.

pub mod data;

pub use data::cell::{Cell, OrganismId};
pub use data::geometry::{Coord, Extent, Heading, Rect};
pub use data::symbol::{is_valid_symbol, symbol_at, symbol_code, ALPHABET, EMPTY_SYMBOL};
