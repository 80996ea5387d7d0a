//! # Mycora Core
//!
//! The simulation engine for Mycora, a two-dimensional artificial-life
//! world in which self-replicating programs compete for memory.
//!
//! This crate contains the deterministic simulation logic:
//! - The toroidal memory arena with per-cell ownership
//! - The organism virtual machine and its instruction set
//! - The scheduler queue with round-robin execution and eviction
//! - The simulation clock with decay and population-pressure hooks
//! - Lineage bookkeeping, metrics and structured logging
//!
//! ## Architecture
//!
//! Everything runs on one thread. Each tick steps every living organism
//! exactly once, in birth order; the arena is the only shared state and
//! enforces ownership on every write. A seeded `ChaCha8Rng` makes runs
//! reproducible.
//!
//! ## Example
//!
//! ```
//! use mycora_core::config::AppConfig;
//! use mycora_core::Simulation;
//! use mycora_data::Coord;
//!
//! let mut config = AppConfig::default();
//! config.clock.seed = Some(7);
//! let mut sim = Simulation::new(config).unwrap();
//!
//! let genome = vec!["@C$".chars().collect::<Vec<_>>()];
//! sim.seed_genome(&genome, Coord::new(0, 0)).unwrap();
//! sim.run(5);
//! assert_eq!(sim.queue().len(), 2);
//! ```

/// Toroidal memory arena with ownership
pub mod arena;
/// Configuration management for simulation parameters
pub mod config;
pub mod error;
/// Instruction decoding and operand resolution
pub mod isa;
/// Lineage tracking and registry
pub mod lineage_registry;
/// Performance metrics collection and logging
pub mod metrics;
/// Scheduler queue
pub mod queue;
pub mod simulation;
/// Organism snapshots for display and export
pub mod snapshot;
/// Organism virtual machine
pub mod vm;

pub use arena::{Arena, Viewport};
pub use error::{ArenaError, Fault, SimError};
pub use metrics::{init_logging, Metrics};
pub use queue::{CycleReport, Queue};
pub use simulation::{Simulation, TickReport};
pub use vm::Organism;
