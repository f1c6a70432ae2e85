use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::Board;
use crate::connectivity::is_solved;
use crate::direction::QUARTER_TURNS;

/// Bounds on [`scramble_with`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScrambleConfig {
    /// Full re-draws of every movable tile before falling back to a forced turn.
    pub max_attempts: usize,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self { max_attempts: 20 }
    }
}

/// [`scramble_with`] under [`ScrambleConfig::default`].
pub fn scramble<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    scramble_with(board, rng, &ScrambleConfig::default())
}

/// Give every movable tile an independent, uniformly drawn rotation, such that the board is not left solved.
///
/// The whole group is re-drawn while the draw happens to solve the board, at most `config.max_attempts` times.
/// Should every draw solve it, one movable tile of the last draw is turned a quarter step instead: a quarter turn
/// changes any one- or two-port mask, and changing a single mask of a solved board always leaves some port
/// unanswered.
///
/// Boards without movable tiles are left untouched. Whether the board is started is unaffected.
pub fn scramble_with<R: Rng + ?Sized>(board: &mut Board, rng: &mut R, config: &ScrambleConfig) {
    let movable = board.movable_indices();
    if movable.is_empty() {
        debug!("no movable tiles to scramble");
        return;
    }

    for attempt in 1..=config.max_attempts {
        for &index in &movable {
            board.set_rotation(index, rng.gen_range(0..QUARTER_TURNS));
        }

        if !is_solved(board) {
            debug!(attempt, tiles = movable.len(), "scrambled board");
            return;
        }
    }

    if !is_solved(board) {
        // only reachable with a zero attempt budget
        return;
    }

    if let Some(&index) = movable.choose(rng) {
        warn!(attempts = config.max_attempts, tile = index, "every scramble draw solved the board; forcing a turn");
        let rotation = board.tile(index).map_or(0, |tile| tile.rotation());
        board.set_rotation(index, rotation + 1);
    }
}

impl Board {
    /// See [`scramble`].
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        scramble(self, rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::builder::LevelBuilder;

    fn tutorial() -> Board {
        let level = LevelBuilder::from_layout(&[
            ".....",
            "..S..",
            "..|..",
            "..T..",
            ".....",
        ]).build().unwrap();
        Board::new(&level).unwrap()
    }

    #[test]
    fn never_leaves_board_solved() {
        for seed in 0..200 {
            let mut board = tutorial();
            board.scramble(&mut StdRng::seed_from_u64(seed));
            assert!(!board.is_solved(), "seed {seed}");
        }
    }

    #[test]
    fn forced_turn_after_zero_budget_draws() {
        let mut board = tutorial();
        // an empty budget skips straight to the fallback check, which sees the canonical solved board
        scramble_with(&mut board, &mut StdRng::seed_from_u64(7), &ScrambleConfig { max_attempts: 0 });
        assert!(!board.is_solved());
        assert_eq!(board.rotations(), vec![(12, 1)]);
    }

    #[test]
    fn locked_tiles_keep_rotation() {
        let mut board = tutorial();
        board.scramble(&mut StdRng::seed_from_u64(3));
        for index in board.sources().iter().chain(board.targets()) {
            assert_eq!(board.tile(*index).unwrap().rotation(), 0);
        }
    }
}
