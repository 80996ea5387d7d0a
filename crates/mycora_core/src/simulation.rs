//! The simulation aggregate and its clock.
//!
//! [`Simulation`] owns everything a run needs: the arena, the scheduler
//! queue, the random source and the tick counter. One call to
//! [`Simulation::tick`] is one full pass over the population followed by
//! the periodic maintenance hooks.

use crate::arena::{Arena, Viewport};
use crate::config::AppConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::queue::{CycleReport, Queue};
use crate::snapshot::{OrganismSnapshot, PopulationStats, SimulationSnapshot};
use mycora_data::{Coord, Extent, OrganismId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::Instant;

/// Outcome of one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub cycle: CycleReport,
    /// Cells rewritten by the decay sweep, when one ran.
    pub decayed: Option<usize>,
    pub evicted: Vec<OrganismId>,
}

pub struct Simulation {
    config: AppConfig,
    arena: Arena,
    queue: Queue,
    tick: u64,
    rng: ChaCha8Rng,
    metrics: Metrics,
}

impl Simulation {
    /// Builds an empty simulation. Seeded from `clock.seed` when set,
    /// from OS entropy otherwise.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let rng = match config.clock.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        tracing::info!(
            width = config.arena.width,
            height = config.arena.height,
            seed = ?config.clock.seed,
            fingerprint = %config.fingerprint(),
            "simulation created"
        );
        Ok(Self {
            arena: Arena::new(config.arena.width, config.arena.height),
            queue: Queue::new(),
            tick: 0,
            rng,
            metrics: Metrics::new(config.clock.log_interval),
            config,
        })
    }

    /// Loads a founder genome at `address`.
    pub fn seed_genome(&mut self, genome: &[Vec<char>], address: Coord) -> Result<OrganismId> {
        let id = self
            .queue
            .spawn_founder(&mut self.arena, genome, address, &self.config.vm, self.tick)?;
        self.metrics.add_births(1);
        Ok(id)
    }

    pub fn tick(&mut self) -> TickReport {
        let start = Instant::now();
        let cycle = self
            .queue
            .cycle_all(&mut self.arena, &self.config.vm, &mut self.rng, self.tick);
        self.tick += 1;

        let mut report = TickReport {
            tick: self.tick,
            cycle,
            ..Default::default()
        };

        if self.tick % self.config.decay_period() == 0 {
            let decayed = self.arena.decay_sweep(
                &mut self.rng,
                self.config.arena.decay_sample,
                self.config.arena.decay_probability,
            );
            if decayed > 0 {
                tracing::debug!(tick = self.tick, decayed, "decay sweep");
            }
            report.decayed = Some(decayed);
        }

        if self.tick % self.config.pressure_period() == 0
            && self.arena.occupancy_ratio() > self.config.pressure.high_water
        {
            report.evicted = self.queue.kill_organisms(&mut self.arena, &self.config.pressure);
            tracing::debug!(
                tick = self.tick,
                evicted = report.evicted.len(),
                occupancy = self.arena.occupancy_ratio(),
                "population pressure"
            );
        }

        self.metrics.add_births(cycle.births);
        self.metrics.add_deaths(cycle.deaths);
        self.metrics.add_evictions(report.evicted.len());
        self.metrics.add_faults(cycle.faults);
        self.metrics
            .record_tick(start.elapsed(), self.queue.len(), self.arena.occupancy_ratio());
        report
    }

    /// Runs `ticks` ticks, stopping early if the population dies out.
    /// Returns the number of ticks actually run.
    pub fn run(&mut self, ticks: u64) -> u64 {
        for done in 0..ticks {
            if self.queue.is_empty() {
                tracing::info!(tick = self.tick, "population extinct");
                return done;
            }
            self.tick();
        }
        ticks
    }

    #[must_use]
    pub fn stats(&self) -> PopulationStats {
        let population = self.queue.len();
        let total_age: u64 = self.queue.iter().map(|o| o.age).sum();
        PopulationStats {
            tick: self.tick,
            population,
            occupancy: self.arena.occupancy_ratio(),
            owned_cells: self.arena.owned_total(),
            births: self.metrics.births(),
            deaths: self.metrics.deaths(),
            evictions: self.metrics.evictions(),
            faults: self.metrics.faults(),
            mean_age: if population == 0 {
                0.0
            } else {
                total_age as f64 / population as f64
            },
            max_generation: self.queue.iter().map(|o| o.generation).max().unwrap_or(0),
            lineages_alive: self.queue.lineages().living_count(),
        }
    }

    /// Captures the population and, optionally, a window of the arena.
    #[must_use]
    pub fn snapshot(&self, window: Option<(Coord, Extent)>) -> SimulationSnapshot {
        SimulationSnapshot {
            tick: self.tick,
            width: self.arena.width(),
            height: self.arena.height(),
            stats: self.stats(),
            organisms: self
                .queue
                .iter()
                .map(|o| OrganismSnapshot::capture(o, &self.arena))
                .collect(),
            selected: self.queue.get_organism().ok().map(|o| o.id),
            viewport: window.map(|(origin, extent)| self.viewport(origin, extent)),
            config_fingerprint: self.config.fingerprint(),
        }
    }

    #[must_use]
    pub fn viewport(&self, origin: Coord, extent: Extent) -> Viewport {
        self.arena.viewport(origin, extent)
    }

    /// Hash of the arena plus the complete state of every organism,
    /// stack and offspring buffer included. Equal digests after equal tick
    /// counts mean identical runs.
    #[must_use]
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.arena.digest().as_bytes());
        hasher.update(self.tick.to_le_bytes());
        for org in self.queue.iter() {
            hasher.update(format!("{org:?}").as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Inspection text for the organism under the cursor.
    pub fn selected_info(&self) -> Result<String> {
        self.queue.get_organism().map(|o| o.info())
    }

    pub fn select_next(&mut self) {
        self.queue.select_next();
    }

    pub fn select_previous(&mut self) {
        self.queue.select_previous();
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[must_use]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
