//! The scheduler: ordered population, round-robin execution and eviction.
//!
//! Organisms are kept in insertion order. Identifiers are handed out
//! monotonically and newborns are always appended, so insertion order is
//! also identifier order and lookups can binary-search.

use crate::arena::Arena;
use crate::config::{EvictionPolicy, PressureConfig, VmConfig};
use crate::error::{Result, SimError};
use crate::lineage_registry::LineageRegistry;
use crate::vm::{IdAllocator, Organism, StepContext};
use mycora_data::{is_valid_symbol, Coord, OrganismId, Rect};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// What happened during one pass over the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Instructions executed (one per organism present at pass start).
    pub executed: usize,
    pub births: usize,
    /// Organisms swept because they no longer own any cell.
    pub deaths: usize,
    pub faults: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Queue {
    organisms: Vec<Organism>,
    /// Inspection cursor. Always a valid position unless empty.
    index: usize,
    ids: IdAllocator,
    lineages: LineageRegistry,
}

impl Queue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            organisms: Vec::new(),
            index: 0,
            ids: IdAllocator::new(),
            lineages: LineageRegistry::new(),
        }
    }

    /// Loads `genome` at `address` and appends its founder.
    pub fn spawn_founder(
        &mut self,
        arena: &mut Arena,
        genome: &[Vec<char>],
        address: Coord,
        config: &VmConfig,
        tick: u64,
    ) -> Result<OrganismId> {
        let width = genome.first().map_or(0, Vec::len);
        if width == 0 || genome.iter().any(|row| row.len() != width) {
            return Err(SimError::InvalidGenome(
                "rows must be non-empty and of equal length".to_string(),
            ));
        }
        if let Some(bad) = genome.iter().flatten().find(|s| !is_valid_symbol(**s)) {
            return Err(SimError::InvalidGenome(format!("unknown symbol {bad:?}")));
        }

        let id = self.ids.next_id();
        let extent = arena.load_genome(genome, address, id)?;
        let rect = Rect::new(arena.wrap(address), extent);
        self.organisms.push(Organism::founder(id, rect, config, tick));
        self.lineages.record_birth(id, 0, tick);
        tracing::debug!(organism = %id, %rect, "founder seeded");
        Ok(id)
    }

    /// Steps every organism present at the start of the pass, in order.
    /// Newborns join at the tail and first run next pass.
    pub fn cycle_all<R: Rng>(
        &mut self,
        arena: &mut Arena,
        config: &VmConfig,
        rng: &mut R,
        tick: u64,
    ) -> CycleReport {
        let mut report = CycleReport::default();
        let mut newborns = Vec::new();

        let present = self.organisms.len();
        for org in self.organisms.iter_mut().take(present) {
            let before = org.errors;
            let mut ctx = StepContext {
                arena: &mut *arena,
                config,
                rng: &mut *rng,
                ids: &mut self.ids,
                tick,
            };
            if let Some(child) = org.step(&mut ctx) {
                newborns.push(child);
            }
            report.executed += 1;
            report.faults += org.errors.saturating_sub(before) as usize;
        }

        report.births = newborns.len();
        for child in newborns {
            self.lineages.record_birth(child.lineage, child.generation, tick);
            self.organisms.push(child);
        }

        let dead: Vec<OrganismId> = self
            .organisms
            .iter()
            .filter(|o| arena.owned_count(o.id) == 0)
            .map(|o| o.id)
            .collect();
        for id in dead {
            tracing::debug!(organism = %id, "organism lost all territory");
            self.remove(id);
            report.deaths += 1;
        }
        report
    }

    /// Evicts organisms in policy order until occupancy drops to
    /// `low_water` or nobody is left. Returns the evicted ids in order.
    pub fn kill_organisms(&mut self, arena: &mut Arena, pressure: &PressureConfig) -> Vec<OrganismId> {
        let mut order: Vec<&Organism> = self.organisms.iter().collect();
        match pressure.eviction_policy {
            EvictionPolicy::Oldest => order.sort_by_key(|o| (Reverse(o.age), o.id)),
            EvictionPolicy::LargestFootprint => {
                order.sort_by_key(|o| (Reverse(arena.owned_count(o.id)), Reverse(o.age), o.id));
            }
            EvictionPolicy::MostErrors => {
                order.sort_by_key(|o| (Reverse(o.errors), Reverse(o.age), o.id));
            }
        }
        let order: Vec<OrganismId> = order.into_iter().map(|o| o.id).collect();

        let mut evicted = Vec::new();
        for id in order {
            if arena.occupancy_ratio() <= pressure.low_water {
                break;
            }
            let freed = arena.release(id);
            self.remove(id);
            tracing::debug!(organism = %id, freed, "evicted");
            evicted.push(id);
        }
        evicted
    }

    fn position(&self, id: OrganismId) -> Option<usize> {
        self.organisms.binary_search_by_key(&id, |o| o.id).ok()
    }

    /// Drops an organism, keeping the cursor on the same organism when
    /// possible.
    fn remove(&mut self, id: OrganismId) -> Option<Organism> {
        let pos = self.position(id)?;
        let org = self.organisms.remove(pos);
        self.lineages.record_death(org.lineage);
        if pos < self.index {
            self.index -= 1;
        }
        if self.index >= self.organisms.len() {
            self.index = self.organisms.len().saturating_sub(1);
        }
        Some(org)
    }

    pub fn select_next(&mut self) {
        if !self.organisms.is_empty() {
            self.index = (self.index + 1) % self.organisms.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.organisms.is_empty() {
            let len = self.organisms.len();
            self.index = (self.index + len - 1) % len;
        }
    }

    /// The organism under the inspection cursor.
    pub fn get_organism(&self) -> Result<&Organism> {
        self.organisms.get(self.index).ok_or(SimError::EmptyPopulation)
    }

    #[must_use]
    pub fn get(&self, id: OrganismId) -> Option<&Organism> {
        self.position(id).map(|p| &self.organisms[p])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Organism> {
        self.organisms.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn lineages(&self) -> &LineageRegistry {
        &self.lineages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rows(s: &str) -> Vec<Vec<char>> {
        s.lines().map(|l| l.chars().collect()).collect()
    }

    fn seeded(width: u16, height: u16, genomes: &[(&str, Coord)]) -> (Arena, Queue) {
        let mut arena = Arena::new(width, height);
        let mut queue = Queue::new();
        for (g, at) in genomes {
            queue
                .spawn_founder(&mut arena, &rows(g), *at, &VmConfig::default(), 0)
                .unwrap();
        }
        (arena, queue)
    }

    #[test]
    fn test_spawn_rejects_bad_genomes() {
        let mut arena = Arena::new(10, 10);
        let mut queue = Queue::new();
        let config = VmConfig::default();

        let ragged = vec![vec!['.', '.'], vec!['.']];
        assert!(matches!(
            queue.spawn_founder(&mut arena, &ragged, Coord::ZERO, &config, 0),
            Err(SimError::InvalidGenome(_))
        ));
        assert!(matches!(
            queue.spawn_founder(&mut arena, &rows(".Z"), Coord::ZERO, &config, 0),
            Err(SimError::InvalidGenome(_))
        ));
        assert!(queue.is_empty());
        assert_eq!(arena.owned_total(), 0);
    }

    #[test]
    fn test_spawn_on_occupied_cells_fails() {
        let (mut arena, mut queue) = seeded(10, 10, &[("..", Coord::ZERO)]);
        let err = queue
            .spawn_founder(&mut arena, &rows(".."), Coord::new(1, 0), &VmConfig::default(), 0)
            .unwrap_err();
        assert!(matches!(err, SimError::Arena(_)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_cycle_appends_newborns_after_pass() {
        let (mut arena, mut queue) = seeded(20, 5, &[("@C$", Coord::ZERO)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = VmConfig::default();

        let mut births = 0;
        for tick in 0..5 {
            let report = queue.cycle_all(&mut arena, &config, &mut rng, tick);
            assert_eq!(report.executed, 1);
            births += report.births;
        }
        assert_eq!(births, 1);
        assert_eq!(queue.len(), 2);
        let ids: Vec<_> = queue.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![OrganismId(1), OrganismId(2)]);
        assert_eq!(queue.get(OrganismId(2)).unwrap().age, 0);

        let report = queue.cycle_all(&mut arena, &config, &mut rng, 5);
        assert_eq!(report.executed, 2);
        assert_eq!(queue.lineages().get(OrganismId(1)).unwrap().total_produced, 2);
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        let (_, mut queue) = seeded(10, 10, &[(".", Coord::ZERO), (".", Coord::new(2, 0))]);
        assert_eq!(queue.index(), 0);
        queue.select_previous();
        assert_eq!(queue.index(), 1);
        queue.select_next();
        assert_eq!(queue.index(), 0);
    }

    #[test]
    fn test_empty_queue_selection() {
        let mut queue = Queue::new();
        queue.select_next();
        queue.select_previous();
        assert_eq!(queue.index(), 0);
        assert_eq!(queue.get_organism().unwrap_err(), SimError::EmptyPopulation);
    }

    #[test]
    fn test_eviction_oldest_first_until_low_water() {
        let (mut arena, mut queue) = seeded(
            2,
            2,
            &[("..", Coord::ZERO), (".", Coord::new(0, 1)), (".", Coord::new(1, 1))],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        queue.cycle_all(&mut arena, &VmConfig::default(), &mut rng, 0);

        let pressure = PressureConfig {
            high_water: 0.9,
            low_water: 0.5,
            eviction_policy: EvictionPolicy::Oldest,
        };
        let evicted = queue.kill_organisms(&mut arena, &pressure);

        assert_eq!(evicted, vec![OrganismId(1)]);
        assert!(arena.occupancy_ratio() <= 0.5);
        assert_eq!(arena.owned_count(OrganismId(1)), 0);
        assert!(queue.get(OrganismId(1)).is_none());
    }

    #[test]
    fn test_eviction_largest_footprint() {
        let (mut arena, mut queue) = seeded(
            3,
            3,
            &[(".", Coord::ZERO), ("...", Coord::new(0, 1)), (".", Coord::new(0, 2))],
        );
        let pressure = PressureConfig {
            high_water: 0.9,
            low_water: 0.3,
            eviction_policy: EvictionPolicy::LargestFootprint,
        };
        let evicted = queue.kill_organisms(&mut arena, &pressure);
        assert_eq!(evicted, vec![OrganismId(2)]);
    }

    #[test]
    fn test_eviction_empties_population_if_needed() {
        let (mut arena, mut queue) = seeded(2, 1, &[(".", Coord::ZERO), (".", Coord::new(1, 0))]);
        let pressure = PressureConfig {
            high_water: 0.9,
            low_water: -1.0,
            eviction_policy: EvictionPolicy::MostErrors,
        };
        let evicted = queue.kill_organisms(&mut arena, &pressure);
        assert_eq!(evicted.len(), 2);
        assert!(queue.is_empty());
        assert_eq!(arena.owned_total(), 0);
    }

    #[test]
    fn test_cursor_follows_selected_organism_on_removal() {
        let (mut arena, mut queue) = seeded(
            3,
            1,
            &[(".", Coord::ZERO), (".", Coord::new(1, 0)), (".", Coord::new(2, 0))],
        );
        queue.select_next();
        queue.select_next();
        assert_eq!(queue.get_organism().unwrap().id, OrganismId(3));

        let pressure = PressureConfig {
            high_water: 0.9,
            low_water: 0.5,
            eviction_policy: EvictionPolicy::Oldest,
        };
        let evicted = queue.kill_organisms(&mut arena, &pressure);
        assert_eq!(evicted, vec![OrganismId(1), OrganismId(2)]);
        assert_eq!(queue.get_organism().unwrap().id, OrganismId(3));
        assert_eq!(queue.index(), 0);
    }
}
