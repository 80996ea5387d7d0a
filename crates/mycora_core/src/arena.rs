//! The shared toroidal memory arena.
//!
//! The arena is the only mutable store of the simulation. Every mutation goes
//! through [`Arena::write`], [`Arena::claim`], [`Arena::reassign`] or
//! [`Arena::release`], and each of them either completes or leaves the grid
//! untouched. Ownership bookkeeping is kept alongside the cells so occupancy
//! and per-organism footprints are O(1).

use crate::error::ArenaError;
use mycora_data::{symbol_at, Cell, Coord, Extent, OrganismId, Rect, ALPHABET};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Arena {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    owned: HashMap<OrganismId, usize>,
    owned_total: usize,
}

/// Cells of a rectangular window, row by row, as `(symbol, owner)` pairs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub origin: Coord,
    pub extent: Extent,
    pub rows: Vec<Vec<(char, Option<OrganismId>)>>,
}

impl Arena {
    /// Allocates an empty `width` x `height` arena. Never resized afterwards.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            owned: HashMap::new(),
            owned_total: 0,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn wrap(&self, coord: Coord) -> Coord {
        coord.wrap(self.width, self.height)
    }

    #[inline(always)]
    fn index(&self, coord: Coord) -> usize {
        let c = self.wrap(coord);
        c.y as usize * usize::from(self.width) + c.x as usize
    }

    /// Symbol at `coord`. Any coordinate is valid.
    #[must_use]
    pub fn read(&self, coord: Coord) -> char {
        self.cells[self.index(coord)].symbol
    }

    #[must_use]
    pub fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[self.index(coord)]
    }

    #[must_use]
    pub fn owner(&self, coord: Coord) -> Option<OrganismId> {
        self.cell(coord).owner
    }

    /// Writes `symbol` on behalf of `writer`.
    ///
    /// Succeeds on unowned cells and on cells `writer` already owns; the cell
    /// is owned by `writer` afterwards.
    pub fn write(
        &mut self,
        coord: Coord,
        symbol: char,
        writer: OrganismId,
    ) -> Result<(), ArenaError> {
        let idx = self.index(coord);
        let cell = self.cells[idx];
        if !cell.writable_by(writer) {
            return Err(ArenaError::ProtectedCellViolation {
                coord: self.wrap(coord),
                owner: cell.owner.unwrap_or(writer),
            });
        }
        if cell.owner != Some(writer) {
            self.set_owner(idx, Some(writer));
        }
        self.cells[idx].symbol = symbol;
        Ok(())
    }

    /// Atomically takes every cell of `rect` for `owner`.
    ///
    /// Fails with [`ArenaError::RegionUnavailable`] without touching
    /// anything if a single cell is owned or the rectangle does not fit.
    pub fn claim(&mut self, rect: Rect, owner: OrganismId) -> Result<(), ArenaError> {
        let indices = self.rect_indices(rect)?;
        if indices.iter().any(|&i| self.cells[i].is_owned()) {
            return Err(ArenaError::RegionUnavailable { rect });
        }
        for i in indices {
            self.set_owner(i, Some(owner));
        }
        Ok(())
    }

    /// Hands a rectangle wholly owned by `from` over to `to` in one step.
    ///
    /// Used when an offspring buffer becomes a new organism; the cells never
    /// pass through the unowned state.
    pub fn reassign(
        &mut self,
        rect: Rect,
        from: OrganismId,
        to: OrganismId,
    ) -> Result<(), ArenaError> {
        let indices = self.rect_indices(rect)?;
        if indices.iter().any(|&i| self.cells[i].owner != Some(from)) {
            return Err(ArenaError::RegionUnavailable { rect });
        }
        for i in indices {
            self.set_owner(i, Some(to));
        }
        Ok(())
    }

    /// Unowns every cell of `owner`. Returns how many were released.
    pub fn release(&mut self, owner: OrganismId) -> usize {
        let Some(count) = self.owned.get(&owner).copied() else {
            return 0;
        };
        let mut remaining = count;
        for i in 0..self.cells.len() {
            if remaining == 0 {
                break;
            }
            if self.cells[i].owner == Some(owner) {
                self.set_owner(i, None);
                remaining -= 1;
            }
        }
        count
    }

    /// Loads a seed genome at `address` and claims it for `owner`.
    ///
    /// Rows must be non-empty and of equal length.
    pub fn load_genome(
        &mut self,
        genome: &[Vec<char>],
        address: Coord,
        owner: OrganismId,
    ) -> Result<Extent, ArenaError> {
        let height = genome.len();
        let width = genome.first().map_or(0, Vec::len);
        let extent = Extent::new(
            u16::try_from(width).unwrap_or(0),
            u16::try_from(height).unwrap_or(0),
        );
        let rect = Rect::new(address, extent);
        if extent.is_empty() || genome.iter().any(|row| row.len() != width) {
            return Err(ArenaError::RegionUnavailable { rect });
        }
        self.claim(rect, owner)?;
        for (dy, row) in genome.iter().enumerate() {
            for (dx, &symbol) in row.iter().enumerate() {
                let idx = self.index(address + Coord::new(dx as i32, dy as i32));
                self.cells[idx].symbol = symbol;
            }
        }
        Ok(extent)
    }

    /// Background mutation of abandoned memory.
    ///
    /// Samples `sample` random cells; each unowned one is replaced by a
    /// random alphabet symbol with probability `probability`. Returns the
    /// number of cells rewritten.
    pub fn decay_sweep<R: Rng>(&mut self, rng: &mut R, sample: usize, probability: f64) -> usize {
        let mut mutated = 0;
        for _ in 0..sample {
            let idx = rng.gen_range(0..self.cells.len());
            if self.cells[idx].is_owned() {
                continue;
            }
            if rng.gen_bool(probability) {
                self.cells[idx].symbol = symbol_at(rng.gen_range(0..ALPHABET.len()));
                mutated += 1;
            }
        }
        mutated
    }

    /// Fraction of cells currently owned.
    #[must_use]
    pub fn occupancy_ratio(&self) -> f64 {
        self.owned_total as f64 / self.cells.len() as f64
    }

    #[must_use]
    pub fn owned_total(&self) -> usize {
        self.owned_total
    }

    /// Cells currently owned by `owner`.
    #[must_use]
    pub fn owned_count(&self, owner: OrganismId) -> usize {
        self.owned.get(&owner).copied().unwrap_or(0)
    }

    /// Copies out the cells of a window for display.
    #[must_use]
    pub fn viewport(&self, origin: Coord, extent: Extent) -> Viewport {
        let rows = (0..i32::from(extent.height))
            .map(|dy| {
                (0..i32::from(extent.width))
                    .map(|dx| {
                        let cell = self.cell(origin + Coord::new(dx, dy));
                        (cell.symbol, cell.owner)
                    })
                    .collect()
            })
            .collect();
        Viewport {
            origin: self.wrap(origin),
            extent,
            rows,
        }
    }

    /// SHA-256 over every symbol and owner, for replay comparison.
    #[must_use]
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 4];
        for cell in &self.cells {
            hasher.update(cell.symbol.encode_utf8(&mut buf).as_bytes());
            let owner = cell.owner.map_or(u64::MAX, |id| id.0);
            hasher.update(owner.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Wrapped indices of `rect`, rejecting rectangles larger than the arena
    /// (their cells would alias).
    fn rect_indices(&self, rect: Rect) -> Result<Vec<usize>, ArenaError> {
        if rect.extent.is_empty()
            || rect.extent.width > self.width
            || rect.extent.height > self.height
        {
            return Err(ArenaError::RegionUnavailable { rect });
        }
        Ok(rect.cells().map(|c| self.index(c)).collect())
    }

    fn set_owner(&mut self, idx: usize, owner: Option<OrganismId>) {
        if let Some(prev) = self.cells[idx].owner {
            if let Some(count) = self.owned.get_mut(&prev) {
                *count -= 1;
                if *count == 0 {
                    self.owned.remove(&prev);
                }
            }
            self.owned_total -= 1;
        }
        if let Some(next) = owner {
            *self.owned.entry(next).or_insert(0) += 1;
            self.owned_total += 1;
        }
        self.cells[idx].owner = owner;
    }
}
