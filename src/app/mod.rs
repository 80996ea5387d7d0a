//! Driver state for the `mycora` binary.
//!
//! The simulation core knows nothing about pausing, display modes or
//! scrolling; those live here.

pub mod input;
pub mod render;
pub mod state;

pub use input::Command;
pub use state::App;
