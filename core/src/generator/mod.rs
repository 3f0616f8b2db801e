use serde::{Deserialize, Serialize};

use crate::*;

pub use random::*;

mod random;

/// Strategy for placing mines when a board goes live.
pub trait MineGenerator {
    /// Builds a layout for `config` whose safe zone around `safe_cell`
    /// contains no mines.
    fn generate(&self, config: BoardConfig, safe_cell: Coord2) -> MineLayout;
}

/// Cells excluded from mine placement around the first opened cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeZone {
    /// Only the opened cell itself is guaranteed mine-free.
    Cell,
    /// The opened cell and its up-to-8 neighbors are mine-free, so the
    /// first reveal is always a zero.
    Neighborhood,
}

impl Default for SafeZone {
    fn default() -> Self {
        Self::Cell
    }
}
