#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod types;

/// Static parameters of a board: grid size and target mine count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    size: Coord2,
    mines: CellCount,
}

impl BoardConfig {
    /// Rejects zero-sized grids and mine counts outside `(0, width * height)`.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidConfiguration);
        }
        if mines == 0 || mines >= cell_area(size.0, size.1) {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(Self { size, mines })
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_area(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size.0 && coords.1 < self.size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }
}

/// Mine placement over a board, immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        Self {
            mine_mask,
            mine_count,
        }
    }

    /// Builds a layout from explicit mine coordinates; the seam for
    /// deterministic tests and replays.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mine_mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mines among the up-to-8 in-bounds neighbors of `coords`.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        neighbors(coords, self.size())
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Result of a `mark` toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    Unmarked,
}

/// Result of opening a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The cell held a mine.
    MineHit,
    /// The cell is open and safe; payload is the adjacent mine count.
    Revealed(u8),
    /// The cell is marked and stays closed.
    Rejected,
}

impl OpenOutcome {
    pub const fn is_mine_hit(self) -> bool {
        matches!(self, Self::MineHit)
    }
}

/// Everything a single cascading open changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeReveal {
    pub outcome: OpenOutcome,
    /// Newly revealed safe cells with their adjacency counts, in visit order.
    /// Empty on a mine hit or a rejected/repeated open.
    pub opened: Vec<(Coord2, u8)>,
}
