/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Board area as a cell count, saturating at `CellCount::MAX`.
pub const fn cell_area(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn offset_within((x, y): Coord2, (dx, dy): (i8, i8), (max_x, max_y): Coord2) -> Option<Coord2> {
    let next_x = x.checked_add_signed(dx)?;
    let next_y = y.checked_add_signed(dy)?;
    (next_x < max_x && next_y < max_y).then_some((next_x, next_y))
}

/// In-bounds coordinates of the up-to-8 cells surrounding `center`.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    NEIGHBOR_OFFSETS
        .into_iter()
        .filter_map(move |delta| offset_within(center, delta, bounds))
}
