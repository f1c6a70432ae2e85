//! Browser bindings. A front end owns rendering, timers and persistence; it drives a [`Puzzle`] and reads back
//! masks, solved state and the reveal order.

use std::time::Duration;

use itertools::Itertools;
use js_sys::Uint32Array;
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::level::LevelDescriptor;
use crate::{generator, levels, score};

/// One attempt at a level: the board plus the move counter the rating is based on.
#[wasm_bindgen]
pub struct Puzzle {
    level: LevelDescriptor,
    board: Board,
    moves: u32,
}

impl Puzzle {
    fn load(level: LevelDescriptor) -> Result<Puzzle, JsError> {
        let mut board = Board::new(&level.data).map_err(|e| JsError::new(&e.to_string()))?;
        board.scramble(&mut rand::thread_rng());
        Ok(Puzzle { level, board, moves: 0 })
    }
}

#[wasm_bindgen]
impl Puzzle {
    /// Campaign level `number`, counting from 1, freshly scrambled.
    pub fn campaign(number: usize) -> Result<Puzzle, JsError> {
        let level = levels::level(number).ok_or_else(|| JsError::new("no such campaign level"))?;
        Self::load(level)
    }

    /// Number of campaign levels.
    pub fn campaign_length() -> usize {
        levels::len()
    }

    /// A generated board of side `size`, freshly scrambled.
    pub fn endless(size: usize) -> Result<Puzzle, JsError> {
        let level = generator::generate(size, &mut rand::thread_rng()).map_err(|e| JsError::new(&e.to_string()))?;
        Self::load(level)
    }

    /// Level name.
    pub fn name(&self) -> String {
        self.level.name.clone()
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Moves made this attempt.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Par move count.
    pub fn move_budget(&self) -> u32 {
        self.level.move_budget
    }

    /// Countdown length in seconds.
    pub fn time_budget(&self) -> f64 {
        self.level.time_budget.as_secs_f64()
    }

    /// Let rotations through.
    pub fn start(&mut self) {
        self.board.start();
    }

    /// Rotate tile `index` a quarter turn clockwise; returns whether it turned.
    pub fn rotate(&mut self, index: usize) -> bool {
        let turned = self.board.rotate_tile(index);
        if turned {
            self.moves += 1;
        }
        turned
    }

    /// Re-scramble and reset the move counter.
    pub fn shuffle(&mut self) {
        self.board.scramble(&mut rand::thread_rng());
        self.moves = 0;
    }

    /// Current port bits of tile `index`; zero if out of range.
    pub fn mask(&self, index: usize) -> u8 {
        self.board.tile(index).map_or(0, |tile| tile.current_mask().bits())
    }

    /// Current quarter turns of tile `index`.
    pub fn rotation(&self, index: usize) -> u8 {
        self.board.tile(index).map_or(0, |tile| tile.rotation())
    }

    /// Whether tile `index` refuses rotation.
    pub fn is_locked(&self, index: usize) -> bool {
        self.board.tile(index).map_or(true, |tile| !tile.is_movable())
    }

    /// See [`Board::is_solved`].
    pub fn is_solved(&self) -> bool {
        self.board.is_solved()
    }

    /// See [`Board::is_locally_valid`].
    pub fn is_locally_valid(&self) -> bool {
        self.board.is_locally_valid()
    }

    /// Reveal order flattened as `[index, distance, index, distance, ...]`; empty unless solved.
    pub fn solve_order(&self) -> Uint32Array {
        let flat = self.board.solve_order()
            .unwrap_or_default()
            .into_iter()
            .flat_map(|reveal| [reveal.index as u32, reveal.distance as u32])
            .collect_vec();
        Uint32Array::from(flat.as_slice())
    }

    /// Tile the player should turn next, or `-1` when there is none.
    pub fn hint(&self) -> i32 {
        self.board.hint().map_or(-1, |hint| hint.index as i32)
    }

    /// Star rating for a solve after `elapsed_secs` seconds.
    pub fn stars(&self, elapsed_secs: f64) -> u8 {
        let elapsed = Duration::try_from_secs_f64(elapsed_secs.max(0.0)).unwrap_or(Duration::MAX);
        score::stars(&self.level, self.moves, elapsed)
    }
}
