use std::time::Duration;

use itertools::Itertools;

use crate::board::Board;
use crate::connectivity::{distances, is_solved, links};

/// One step of the staged reveal played once a board is solved.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Reveal {
    /// Tile to reveal.
    pub index: usize,
    /// Links between this tile and the nearest source.
    pub distance: usize,
}

impl Reveal {
    /// When to reveal this tile, given the delay per link.
    pub fn delay(&self, step: Duration) -> Duration {
        step.saturating_mul(u32::try_from(self.distance).unwrap_or(u32::MAX))
    }
}

/// Every active tile with its breadth-first distance from the sources, nearest first.
///
/// Tiles at equal distance are ordered by index. Returns [`None`] unless the board is solved.
pub fn solve_order(board: &Board) -> Option<Vec<Reveal>> {
    if !is_solved(board) {
        return None;
    }

    let graph = links(board);
    Some(distances(board, &graph)
        .into_iter()
        .map(|(index, distance)| Reveal { index, distance })
        .sorted_by_key(|reveal| (reveal.distance, reveal.index))
        .collect_vec())
}

impl Board {
    /// See [`solve_order`].
    pub fn solve_order(&self) -> Option<Vec<Reveal>> {
        solve_order(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_scale_with_distance_and_saturate() {
        let step = Duration::from_millis(40);
        assert_eq!(Reveal { index: 0, distance: 0 }.delay(step), Duration::ZERO);
        assert_eq!(Reveal { index: 3, distance: 5 }.delay(step), Duration::from_millis(200));
        assert_eq!(Reveal { index: 3, distance: usize::MAX }.delay(Duration::from_secs(u64::MAX)), Duration::MAX);
    }
}
