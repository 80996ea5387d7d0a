//! The organism virtual machine.
//!
//! An [`Organism`] is a program living in the arena: an instruction pointer
//! walking over cells, a heading, four vector registers, a bounded address
//! stack and the territory it owns. [`Organism::step`] executes exactly one
//! instruction against the shared [`Arena`].

mod execute;
pub mod registers;

use crate::arena::Arena;
use crate::config::VmConfig;
use crate::error::Fault;
use mycora_data::{Coord, Heading, OrganismId, Rect};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

pub use registers::{AddressStack, RegisterFile};

/// Hands out organism identifiers. Monotonic, never reused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> OrganismId {
        let id = OrganismId(self.next.max(1));
        self.next = id.0 + 1;
        id
    }
}

/// Offspring buffer claimed by `@` and filled by `W`/`C`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offspring {
    pub rect: Rect,
    written: Vec<bool>,
    /// Row-major offset of the next cell `C` copies.
    pub cursor: usize,
}

impl Offspring {
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            written: vec![false; rect.area()],
            cursor: 0,
        }
    }

    pub fn mark_written(&mut self, index: usize) {
        if let Some(w) = self.written.get_mut(index) {
            *w = true;
        }
    }

    #[must_use]
    pub fn written_count(&self) -> usize {
        self.written.iter().filter(|w| **w).count()
    }

    /// Every cell has been written at least once since the claim.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.written.iter().all(|w| *w)
    }
}

/// Everything a step may touch besides the organism itself.
pub struct StepContext<'a, R: Rng> {
    pub arena: &'a mut Arena,
    pub config: &'a VmConfig,
    pub rng: &'a mut R,
    pub ids: &'a mut IdAllocator,
    pub tick: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    pub id: OrganismId,
    /// Reporting only; may no longer resolve.
    pub parent: Option<OrganismId>,
    /// Founder of the line this organism descends from.
    pub lineage: OrganismId,
    pub generation: u32,
    /// The genome rectangle the organism was born with.
    pub genome: Rect,
    pub offspring: Option<Offspring>,
    pub ip: Coord,
    pub heading: Heading,
    pub registers: RegisterFile,
    pub stack: AddressStack,
    pub age: u64,
    pub birth_tick: u64,
    pub children: u32,
    pub errors: u32,
    pub last_fault: Option<Fault>,
}

impl Organism {
    /// First organism of a lineage, executing from the genome origin
    /// heading right.
    #[must_use]
    pub fn founder(id: OrganismId, genome: Rect, config: &VmConfig, tick: u64) -> Self {
        Self {
            id,
            parent: None,
            lineage: id,
            generation: 0,
            genome,
            offspring: None,
            ip: genome.origin,
            heading: Heading::default(),
            registers: RegisterFile::default(),
            stack: AddressStack::new(config.stack_depth),
            age: 0,
            birth_tick: tick,
            children: 0,
            errors: 0,
            last_fault: None,
        }
    }

    /// Child detached from `parent` over the finished buffer `rect`.
    #[must_use]
    pub fn offspring_of(parent: &Organism, id: OrganismId, rect: Rect, tick: u64) -> Self {
        Self {
            id,
            parent: Some(parent.id),
            lineage: parent.lineage,
            generation: parent.generation + 1,
            genome: rect,
            offspring: None,
            ip: rect.origin,
            heading: parent.heading,
            registers: RegisterFile::default(),
            stack: AddressStack::new(parent.stack.capacity()),
            age: 0,
            birth_tick: tick,
            children: 0,
            errors: 0,
            last_fault: None,
        }
    }

    /// Territory the organism currently accounts for: genome plus any
    /// pending offspring buffer.
    #[must_use]
    pub fn territory(&self) -> Vec<Rect> {
        let mut rects = vec![self.genome];
        if let Some(off) = &self.offspring {
            rects.push(off.rect);
        }
        rects
    }

    pub(crate) fn record_fault(&mut self, fault: Fault) {
        self.errors = self.errors.saturating_add(1);
        self.last_fault = Some(fault);
        tracing::trace!(organism = %self.id, %fault, "fault absorbed");
    }

    /// Human-readable state for the inspection display. No side effects.
    #[must_use]
    pub fn info(&self) -> String {
        let mut out = String::new();
        let parent = self
            .parent
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let _ = writeln!(out, "Id         : {}", self.id);
        let _ = writeln!(out, "Parent     : {parent}");
        let _ = writeln!(out, "Lineage    : {}", self.lineage);
        let _ = writeln!(out, "Generation : {}", self.generation);
        let _ = writeln!(out, "Age        : {}", self.age);
        let _ = writeln!(out, "Born       : tick {}", self.birth_tick);
        let _ = writeln!(out, "Position   : {}", self.genome);
        let _ = writeln!(out, "IP         : {}", self.ip);
        let _ = writeln!(out, "Heading    : {}", self.heading);
        let _ = writeln!(out, "Registers  : {}", self.registers);
        let stack: Vec<String> = self.stack.as_slice().iter().map(Coord::to_string).collect();
        let _ = writeln!(out, "Stack      : [{}]", stack.join(", "));
        if let Some(off) = &self.offspring {
            let _ = writeln!(
                out,
                "Child      : {} ({}/{} written)",
                off.rect,
                off.written_count(),
                off.rect.area()
            );
        }
        let _ = writeln!(out, "Children   : {}", self.children);
        let _ = write!(out, "Errors     : {}", self.errors);
        out
    }
}
