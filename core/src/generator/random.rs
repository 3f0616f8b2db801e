use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::*;

/// Uniform random placement driven by a caller-injected seed, with the
/// requested safe zone carved out of the candidate set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomMineGenerator {
    seed: u64,
    zone: SafeZone,
}

impl RandomMineGenerator {
    pub const fn new(seed: u64, zone: SafeZone) -> Self {
        Self { seed, zone }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&self, config: BoardConfig, safe_cell: Coord2) -> MineLayout {
        use rand::prelude::*;

        let size = config.size();
        let total = config.total_cells();

        // The single-cell zone always fits because the config guarantees
        // mines < total; the neighborhood zone may not on dense boards.
        let mut excluded: Array2<bool> = Array2::default(size.to_nd_index());
        excluded[safe_cell.to_nd_index()] = true;
        if self.zone == SafeZone::Neighborhood {
            for pos in neighbors(safe_cell, size) {
                excluded[pos.to_nd_index()] = true;
            }

            let zone_cells: CellCount = excluded.iter().filter(|&&e| e).count() as CellCount;
            if config.mines() + zone_cells > total {
                log::warn!(
                    "Safe neighborhood at {:?} leaves no room for {} mines, falling back to a single safe cell",
                    safe_cell,
                    config.mines()
                );
                excluded.fill(false);
                excluded[safe_cell.to_nd_index()] = true;
            }
        }

        let mut free: CellCount = total - excluded.iter().filter(|&&e| e).count() as CellCount;
        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        for _ in 0..config.mines() {
            let mut place = rng.random_range(0..free);
            for (cell, &off_limits) in mask.iter_mut().zip(excluded.iter()) {
                if off_limits || *cell {
                    continue;
                }
                if place == 0 {
                    *cell = true;
                    free -= 1;
                    break;
                }
                place -= 1;
            }
        }

        let layout = MineLayout::from_mine_mask(mask);
        if layout.mine_count() != config.mines() {
            log::warn!(
                "Placed {} mines, requested {}",
                layout.mine_count(),
                config.mines()
            );
        }
        log::debug!(
            "Generated {} mines on {:?}, seed {}",
            layout.mine_count(),
            size,
            self.seed
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(config: BoardConfig, seed: u64, zone: SafeZone, safe_cell: Coord2) -> MineLayout {
        RandomMineGenerator::new(seed, zone).generate(config, safe_cell)
    }

    #[test]
    fn places_exactly_the_requested_mine_count() {
        let config = BoardConfig::new((10, 10), 10).unwrap();

        for seed in 0..16 {
            let layout = generate(config, seed, SafeZone::Cell, (5, 5));
            assert_eq!(layout.mine_count(), 10);
        }
    }

    #[test]
    fn safe_cell_is_never_mined() {
        let config = BoardConfig::new((4, 4), 15).unwrap();

        // densest legal board: every cell but the safe one is a candidate
        for seed in 0..16 {
            let layout = generate(config, seed, SafeZone::Cell, (2, 1));
            assert!(!layout.contains_mine((2, 1)));
            assert_eq!(layout.mine_count(), 15);
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_layout() {
        let config = BoardConfig::new((10, 10), 20).unwrap();

        let first = generate(config, 0xdeadbeef, SafeZone::Cell, (3, 7));
        let second = generate(config, 0xdeadbeef, SafeZone::Cell, (3, 7));

        assert_eq!(first, second);
    }

    #[test]
    fn neighborhood_zone_keeps_all_neighbors_clear() {
        // 7 mines into 16 cells with a 9-cell zone: every cell outside the
        // zone must carry a mine, every cell inside must not
        let config = BoardConfig::new((4, 4), 7).unwrap();
        let layout = generate(config, 99, SafeZone::Neighborhood, (1, 1));

        assert_eq!(layout.mine_count(), 7);
        assert!(!layout.contains_mine((1, 1)));
        for pos in neighbors((1, 1), (4, 4)) {
            assert!(!layout.contains_mine(pos));
        }
        for x in 0..4 {
            for y in 0..4 {
                let in_zone = x <= 2 && y <= 2;
                assert_eq!(layout.contains_mine((x, y)), !in_zone);
            }
        }
    }

    #[test]
    fn neighborhood_zone_falls_back_when_it_cannot_fit() {
        // zone would cover the whole 3x3 board; fallback keeps only the
        // opened cell clear, which forces every other cell to be a mine
        let config = BoardConfig::new((3, 3), 8).unwrap();
        let layout = generate(config, 7, SafeZone::Neighborhood, (1, 1));

        assert_eq!(layout.mine_count(), 8);
        assert!(!layout.contains_mine((1, 1)));
        for pos in neighbors((1, 1), (3, 3)) {
            assert!(layout.contains_mine(pos));
        }
    }

    #[test]
    fn first_reveal_after_neighborhood_zone_is_a_zero() {
        let config = BoardConfig::new((9, 9), 10).unwrap();

        for seed in 0..8 {
            let layout = generate(config, seed, SafeZone::Neighborhood, (4, 4));
            assert_eq!(layout.adjacent_mine_count((4, 4)), 0);
        }
    }
}
