use std::num::NonZero;

use ndarray::Ix;

use crate::direction::Direction;

pub(crate) type Coord = usize;
/// Side length of a square board. Boards are never empty.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(x, y)` on a board. The top left corner is `Location(0, 0)`.
///
/// Tiles are numbered row-major, so tile index `i` on a board of side `n` lives at `Location(i % n, i / n)`.
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// The location of tile `index` on a board of side `size`.
    pub fn from_tile_index(index: usize, size: Dimension) -> Self {
        Self(index % size.get(), index / size.get())
    }

    /// The row-major tile index of this location on a board of side `size`.
    pub fn tile_index(&self, size: Dimension) -> usize {
        self.1 * size.get() + self.0
    }

    /// Whether this location lies on a board of side `size`.
    pub fn within(&self, size: Dimension) -> bool {
        self.0 < size.get() && self.1 < size.get()
    }

    /// Step one cell in `direction`, or [`None`] if that leaves a board of side `size`.
    pub fn step(self, direction: Direction, size: Dimension) -> Option<Self> {
        Some(direction.attempt_from(self)).filter(|next| next.within(size))
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    pub(crate) fn manhattan(&self, other: Location) -> usize {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}
