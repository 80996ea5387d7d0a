use crate::arena::{Arena, Viewport};
use crate::error::Fault;
use crate::vm::Organism;
use mycora_data::{Coord, Heading, OrganismId, Rect};
use serde::{Deserialize, Serialize};

/// Read-only copy of one organism for display and export.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrganismSnapshot {
    pub id: OrganismId,
    pub parent: Option<OrganismId>,
    pub lineage: OrganismId,
    pub generation: u32,
    pub genome: Rect,
    pub offspring: Option<Rect>,
    pub ip: Coord,
    pub heading: Heading,
    pub age: u64,
    pub birth_tick: u64,
    pub children: u32,
    pub errors: u32,
    pub last_fault: Option<Fault>,
    pub owned_cells: usize,
}

impl OrganismSnapshot {
    #[must_use]
    pub fn capture(org: &Organism, arena: &Arena) -> Self {
        Self {
            id: org.id,
            parent: org.parent,
            lineage: org.lineage,
            generation: org.generation,
            genome: org.genome,
            offspring: org.offspring.as_ref().map(|o| o.rect),
            ip: org.ip,
            heading: org.heading,
            age: org.age,
            birth_tick: org.birth_tick,
            children: org.children,
            errors: org.errors,
            last_fault: org.last_fault,
            owned_cells: arena.owned_count(org.id),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PopulationStats {
    pub tick: u64,
    pub population: usize,
    pub occupancy: f64,
    pub owned_cells: usize,
    pub births: u64,
    pub deaths: u64,
    pub evictions: u64,
    pub faults: u64,
    pub mean_age: f64,
    pub max_generation: u32,
    pub lineages_alive: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SimulationSnapshot {
    pub tick: u64,
    pub width: u16,
    pub height: u16,
    pub stats: PopulationStats,
    pub organisms: Vec<OrganismSnapshot>,
    /// Organism under the inspection cursor.
    pub selected: Option<OrganismId>,
    pub viewport: Option<Viewport>,
    pub config_fingerprint: String,
}
