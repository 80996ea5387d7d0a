use anyhow::Result;
use mycora_core::config::AppConfig;
use mycora_core::Simulation;
use mycora_data::{Coord, Extent, Heading};

/// Cells moved per scroll command.
pub const SCROLL_STEP: i32 = 10;

/// Default size of the visible arena window.
pub const VIEW_SIZE: Extent = Extent::new(60, 20);

/// Driver-side state around a simulation: run/pause flag, display mode
/// and the viewport. None of it influences simulation outcomes.
pub struct App {
    /// Main loop keeps going while set.
    pub running: bool,
    pub paused: bool,
    /// Minimal mode: summary only, no viewport or inspection.
    pub minimal: bool,
    /// Top-left corner of the viewport, always wrapped into the arena.
    pub position: Coord,
    pub view: Extent,
    pub sim: Simulation,
}

impl App {
    /// Creates the simulation and seeds `genome` at the arena centre.
    pub fn new(config: AppConfig, genome: &[Vec<char>]) -> Result<Self> {
        let center = Coord::new(
            i32::from(config.arena.width) / 2,
            i32::from(config.arena.height) / 2,
        );
        let mut sim = Simulation::new(config)?;
        let founder = sim.seed_genome(genome, center)?;
        tracing::info!(%founder, %center, "founder placed");

        let view = Extent::new(
            VIEW_SIZE.width.min(sim.arena().width()),
            VIEW_SIZE.height.min(sim.arena().height()),
        );
        let mut app = Self {
            running: true,
            paused: true,
            minimal: false,
            position: Coord::ZERO,
            view,
            sim,
        };
        app.center_on(center);
        Ok(app)
    }

    /// Moves the viewport so `target` sits in its middle.
    pub fn center_on(&mut self, target: Coord) {
        let half = Coord::new(
            i32::from(self.view.width) / 2,
            i32::from(self.view.height) / 2,
        );
        self.position = self.sim.arena().wrap(target - half);
    }

    pub fn scroll(&mut self, heading: Heading) {
        self.position = self
            .sim
            .arena()
            .wrap(self.position + heading.delta() * SCROLL_STEP);
    }
}
