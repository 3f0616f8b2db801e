use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
///
/// Opening is monotonic: once a cell is `Opened` or `Detonated` it never
/// returns to `Hidden`, and it can no longer be marked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Marked,
    /// Open and safe; payload is the adjacent mine count.
    Opened(u8),
    /// Open and it was a mine.
    Detonated,
}

impl CellState {
    pub const fn is_opened(self) -> bool {
        matches!(self, Self::Opened(_) | Self::Detonated)
    }

    pub const fn is_marked(self) -> bool {
        matches!(self, Self::Marked)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
