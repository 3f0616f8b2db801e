use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board lifecycle: mines do not exist until the first open commits them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum Phase {
    Ungenerated {
        safe_cell: Coord2,
        generator: RandomMineGenerator,
    },
    Live {
        layout: MineLayout,
    },
}

/// A full game board: owns per-cell state, lazily places mines on the first
/// open, and answers the one-cell-at-a-time commands and queries a
/// presentation layer drives.
///
/// The board never declares a win or loss; it exposes the counts and the
/// detonation coordinate the caller needs to do that itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    grid: Array2<CellState>,
    opened_count: Saturating<CellCount>,
    marked_count: Saturating<CellCount>,
    detonated: Option<Coord2>,
    phase: Phase,
}

impl Board {
    /// Ungenerated board whose first opened cell is guaranteed mine-free.
    ///
    /// `safe_cell` is the coordinate of the player's first click; it must be
    /// in bounds. Mine placement is reproducible from `seed`.
    pub fn new(config: BoardConfig, safe_cell: Coord2, seed: u64) -> Result<Self> {
        Self::with_safe_zone(config, safe_cell, seed, SafeZone::default())
    }

    /// Like [`Board::new`], with an explicit safe-zone policy.
    pub fn with_safe_zone(
        config: BoardConfig,
        safe_cell: Coord2,
        seed: u64,
        zone: SafeZone,
    ) -> Result<Self> {
        let safe_cell = config.validate_coords(safe_cell)?;
        Ok(Self::with_phase(
            config,
            Phase::Ungenerated {
                safe_cell,
                generator: RandomMineGenerator::new(seed, zone),
            },
        ))
    }

    /// Live board over an explicit mine layout, for deterministic tests and
    /// replays. The layout must satisfy the usual configuration rules.
    pub fn from_layout(layout: MineLayout) -> Result<Self> {
        let config = BoardConfig::new(layout.size(), layout.mine_count())?;
        Ok(Self::with_phase(config, Phase::Live { layout }))
    }

    fn with_phase(config: BoardConfig, phase: Phase) -> Self {
        Self {
            config,
            grid: Array2::default(config.size().to_nd_index()),
            opened_count: Saturating(0),
            marked_count: Saturating(0),
            detonated: None,
            phase,
        }
    }

    pub const fn config(&self) -> BoardConfig {
        self.config
    }

    pub const fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub const fn width(&self) -> Coord {
        self.config.width()
    }

    pub const fn height(&self) -> Coord {
        self.config.height()
    }

    pub const fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn opened_count(&self) -> CellCount {
        self.opened_count.0
    }

    pub fn marked_count(&self) -> CellCount {
        self.marked_count.0
    }

    /// Mines not yet accounted for by marks; negative when overmarked.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.config.mines()) - i32::from(self.marked_count.0)
    }

    /// Whether mines have been placed yet. False until the first `open`.
    pub fn is_generated(&self) -> bool {
        matches!(self.phase, Phase::Live { .. })
    }

    /// Coordinate of the opened mine, if one has been hit.
    pub const fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    /// Whether every non-mine cell has been opened without a detonation.
    /// The engine exposes the fact; declaring the win is the caller's move.
    pub fn is_cleared(&self) -> bool {
        self.detonated.is_none() && self.opened_count.0 == self.config.safe_cells()
    }

    pub fn cell(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.grid[coords.to_nd_index()])
    }

    pub fn is_marked(&self, coords: Coord2) -> Result<bool> {
        Ok(self.cell(coords)?.is_marked())
    }

    /// False for every cell until mines are generated, frozen afterwards.
    pub fn has_mine(&self, coords: Coord2) -> Result<bool> {
        let coords = self.config.validate_coords(coords)?;
        Ok(match &self.phase {
            Phase::Ungenerated { .. } => false,
            Phase::Live { layout } => layout.contains_mine(coords),
        })
    }

    /// Opens one cell, never cascading.
    ///
    /// The first successful call commits the mine layout, excluding the
    /// opened cell (and, under [`SafeZone::Neighborhood`], its neighbors)
    /// from placement. A marked target is rejected and left untouched;
    /// re-opening an opened cell re-reports its status.
    pub fn open(&mut self, coords: Coord2) -> Result<OpenOutcome> {
        let coords = self.config.validate_coords(coords)?;
        self.generate_if_needed(coords);

        Ok(match self.grid[coords.to_nd_index()] {
            CellState::Marked => OpenOutcome::Rejected,
            CellState::Opened(count) => OpenOutcome::Revealed(count),
            CellState::Detonated => OpenOutcome::MineHit,
            CellState::Hidden => self.open_hidden(coords),
        })
    }

    /// Opens one cell and, when it reveals a zero, sweeps the connected
    /// zero-adjacency region in the same call.
    ///
    /// Marked cells block the sweep and stay marked. Termination does not
    /// depend on caller bookkeeping: the sweep tracks visited cells
    /// explicitly and opening is monotonic.
    pub fn open_with_cascade(&mut self, coords: Coord2) -> Result<CascadeReveal> {
        let coords = self.config.validate_coords(coords)?;
        let was_hidden = matches!(self.grid[coords.to_nd_index()], CellState::Hidden);
        let outcome = self.open(coords)?;

        let mut opened = Vec::new();
        if was_hidden {
            if let OpenOutcome::Revealed(count) = outcome {
                opened.push((coords, count));
                if count == 0 {
                    self.flood_fill(coords, &mut opened);
                }
            }
        }

        Ok(CascadeReveal { outcome, opened })
    }

    /// Toggles the mark on a closed cell. Opened cells cannot be marked.
    pub fn mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.config.validate_coords(coords)?;

        match self.grid[coords.to_nd_index()] {
            CellState::Hidden => {
                self.grid[coords.to_nd_index()] = CellState::Marked;
                self.marked_count += 1;
                Ok(MarkOutcome::Marked)
            }
            CellState::Marked => {
                self.grid[coords.to_nd_index()] = CellState::Hidden;
                self.marked_count -= 1;
                Ok(MarkOutcome::Unmarked)
            }
            CellState::Opened(_) | CellState::Detonated => Err(GameError::InvalidOperation),
        }
    }

    fn generate_if_needed(&mut self, first_open: Coord2) {
        let Phase::Ungenerated {
            safe_cell,
            generator,
        } = &self.phase
        else {
            return;
        };

        if *safe_cell != first_open {
            log::warn!(
                "First open at {:?} does not match the declared safe cell {:?}",
                first_open,
                safe_cell
            );
        }

        let layout = generator.generate(self.config, first_open);
        log::debug!(
            "Board live: {} mines on {:?}",
            layout.mine_count(),
            self.config.size()
        );
        self.phase = Phase::Live { layout };
    }

    fn live_layout(&self) -> &MineLayout {
        match &self.phase {
            Phase::Live { layout } => layout,
            Phase::Ungenerated { .. } => unreachable!("commands generate before inspecting mines"),
        }
    }

    fn open_hidden(&mut self, coords: Coord2) -> OpenOutcome {
        let layout = self.live_layout();
        let has_mine = layout.contains_mine(coords);
        let count = layout.adjacent_mine_count(coords);

        if has_mine {
            self.grid[coords.to_nd_index()] = CellState::Detonated;
            self.opened_count += 1;
            self.detonated = Some(coords);
            log::debug!("Mine hit at {:?}", coords);
            OpenOutcome::MineHit
        } else {
            self.grid[coords.to_nd_index()] = CellState::Opened(count);
            self.opened_count += 1;
            OpenOutcome::Revealed(count)
        }
    }

    // Breadth-first sweep over the connected zero region; only Hidden cells
    // are ever opened, so each cell is visited at most once.
    fn flood_fill(&mut self, start: Coord2, opened: &mut Vec<(Coord2, u8)>) {
        let size = self.config.size();
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<Coord2> = neighbors(start, size)
            .filter(|&pos| matches!(self.grid[pos.to_nd_index()], CellState::Hidden))
            .collect();
        log::trace!("Cascade from {:?}, initial frontier {:?}", start, to_visit);

        while let Some(visit) = to_visit.pop_front() {
            if !visited.insert(visit) {
                continue;
            }
            if !matches!(self.grid[visit.to_nd_index()], CellState::Hidden) {
                continue;
            }

            let count = self.live_layout().adjacent_mine_count(visit);
            self.grid[visit.to_nd_index()] = CellState::Opened(count);
            self.opened_count += 1;
            opened.push((visit, count));
            log::trace!("Cascade opened {:?}, adjacent mines {}", visit, count);

            if count == 0 {
                to_visit.extend(
                    neighbors(visit, size)
                        .filter(|&pos| matches!(self.grid[pos.to_nd_index()], CellState::Hidden))
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }
}
