pub mod macros;

use mycora_core::config::AppConfig;
use mycora_core::Simulation;
use mycora_data::Coord;

/// Parses genome text the way tests write it: one row per line.
#[allow(dead_code)]
pub fn genome(text: &str) -> Vec<Vec<char>> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.chars().collect())
        .collect()
}

#[allow(dead_code)]
pub struct SimulationBuilder {
    config: AppConfig,
    founders: Vec<(Vec<Vec<char>>, Coord)>,
}

#[allow(dead_code)]
impl SimulationBuilder {
    /// A quiet 10x10 arena with a fixed seed and no background decay.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.arena.width = 10;
        config.arena.height = 10;
        config.arena.decay_probability = 0.0;
        config.clock.seed = Some(42);
        Self {
            config,
            founders: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.config.arena.width = width;
        self.config.arena.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.clock.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_genome(mut self, text: &str, x: i32, y: i32) -> Self {
        self.founders.push((genome(text), Coord::new(x, y)));
        self
    }

    pub fn build(self) -> Simulation {
        let mut sim = Simulation::new(self.config).expect("test config must be valid");
        for (rows, at) in &self.founders {
            sim.seed_genome(rows, *at).expect("founder must fit");
        }
        sim
    }
}
