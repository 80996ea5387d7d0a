//! Core data structures for the Mycora simulation.

pub mod cell;
pub mod geometry;
pub mod symbol;
