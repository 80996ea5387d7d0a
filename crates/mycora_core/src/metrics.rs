//! Performance metrics collection for the simulation.
//!
//! Provides structured logging and counters for monitoring a run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Running totals of one simulation.
pub struct Metrics {
    tick_count: AtomicU64,
    population: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    evictions: AtomicU64,
    faults: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("tick_count", &self.tick_count())
            .field("population", &self.population())
            .field("births", &self.births())
            .field("deaths", &self.deaths())
            .field("evictions", &self.evictions())
            .field("faults", &self.faults())
            .finish()
    }
}

impl Metrics {
    /// Creates a collector that logs a summary every `log_interval` ticks.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            population: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            faults: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, population: usize, occupancy: f64) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.population.store(population as u64, Ordering::Relaxed);

        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick % self.log_interval == 0 {
            tracing::info!(
                tick = tick,
                population = population,
                occupancy = occupancy,
                births = self.births(),
                deaths = self.deaths(),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn add_births(&self, n: usize) {
        self.births.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn add_deaths(&self, n: usize) {
        self.deaths.fetch_add(n as u64, Ordering::Relaxed);
    }

    /// Evictions also count as deaths.
    pub fn add_evictions(&self, n: usize) {
        self.evictions.fetch_add(n as u64, Ordering::Relaxed);
        self.add_deaths(n);
    }

    pub fn add_faults(&self, n: usize) {
        self.faults.fetch_add(n as u64, Ordering::Relaxed);
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn population(&self) -> u64 {
        self.population.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn faults(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honours `RUST_LOG`, falling back to `default_level`. Safe to call more
/// than once; later calls are ignored.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::default();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.births(), 0);
    }

    #[test]
    fn test_record_tick() {
        let metrics = Metrics::new(1);
        metrics.record_tick(Duration::from_millis(2), 12, 0.25);
        assert_eq!(metrics.tick_count(), 1);
        assert_eq!(metrics.population(), 12);
    }

    #[test]
    fn test_evictions_count_as_deaths() {
        let metrics = Metrics::default();
        metrics.add_deaths(1);
        metrics.add_evictions(3);
        assert_eq!(metrics.evictions(), 3);
        assert_eq!(metrics.deaths(), 4);
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging("warn");
        init_logging("debug");
    }
}
