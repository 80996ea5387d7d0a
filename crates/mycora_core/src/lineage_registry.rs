use mycora_data::OrganismId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Population history of one line of descent, keyed by its founder.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageRecord {
    pub founder: OrganismId,
    pub total_produced: usize,
    pub current_population: usize,
    pub peak_population: usize,
    pub max_generation: u32,
    pub first_appearance_tick: u64,
    pub is_extinct: bool,
}

/// Every lineage that has ever existed in the arena. Reporting only; the
/// simulation never reads it back.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LineageRegistry {
    pub lineages: HashMap<OrganismId, LineageRecord>,
}

impl LineageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_birth(&mut self, lineage: OrganismId, generation: u32, tick: u64) {
        let entry = self.lineages.entry(lineage).or_insert_with(|| LineageRecord {
            founder: lineage,
            first_appearance_tick: tick,
            ..Default::default()
        });
        entry.total_produced += 1;
        entry.current_population += 1;
        entry.peak_population = entry.peak_population.max(entry.current_population);
        entry.max_generation = entry.max_generation.max(generation);
        entry.is_extinct = false;
    }

    pub fn record_death(&mut self, lineage: OrganismId) {
        if let Some(record) = self.lineages.get_mut(&lineage) {
            record.current_population = record.current_population.saturating_sub(1);
            if record.current_population == 0 {
                record.is_extinct = true;
            }
        }
    }

    #[must_use]
    pub fn get(&self, lineage: OrganismId) -> Option<&LineageRecord> {
        self.lineages.get(&lineage)
    }

    /// Lineages still holding at least one organism.
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.lineages.values().filter(|r| !r.is_extinct).count()
    }

    /// Most prolific lineages first; ties broken by founder id.
    #[must_use]
    pub fn get_top_lineages(&self, count: usize) -> Vec<&LineageRecord> {
        let mut list: Vec<_> = self.lineages.values().collect();
        list.sort_by(|a, b| {
            b.total_produced
                .cmp(&a.total_produced)
                .then(a.founder.cmp(&b.founder))
        });
        list.into_iter().take(count).collect()
    }
}
