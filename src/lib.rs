#![warn(missing_docs)]

//! # `solder`
//!
//! The engine behind "rotate the pipe" puzzles: a square board of tiles, each with a fixed set of ports, which the
//! player turns in quarter steps until the ports form a circuit joining every source to every target.
//!
//! Begin by describing a level as [`LevelData`], either by hand, through serde, with a
//! [`LevelBuilder`](builder::LevelBuilder) (including its ASCII layouts), from the [`levels`] campaign, or from the
//! [`generator`]. Build a [`Board`] from it, [`scramble`](Board::scramble) it, [`start`](Board::start) it, and feed
//! player clicks to [`rotate_tile`](Board::rotate_tile). After each move, [`is_solved`](Board::is_solved) says
//! whether the attempt is over; once it is, [`solve_order`](Board::solve_order) yields the order in which to play
//! the reveal.
//!
//! The engine renders nothing, keeps no clock and persists nothing. Callers own those concerns and pass elapsed time
//! and move counts into [`score`] when they want a rating.
//!
//! # Internals
//! A tile stores only its canonical mask and a rotation; the current mask is always derived.
//! Solved-ness is evaluated in two passes (see [`connectivity`]): local port reciprocity, then a breadth-first search
//! over a [`petgraph`] graph of reciprocated links, started from all sources at once.
//!
//! [`Board::solution`] goes further and searches for rotations that solve the board. This is expressed as a Boolean
//! satisfiability problem: one variable per tile orientation, exactly one orientation per tile, and every open port
//! implying an answering orientation next door. Satisfying assignments are locally valid but may contain closed
//! islands; each island found is forbidden by a new clause and the SAT solver is asked again.

pub use board::Board;
pub use builder::LevelBuilder;
pub use direction::{Direction, PortMask, TileShape};
pub use level::{Difficulty, LevelData, LevelDescriptor, LevelError, MAX_SIZE};
pub use location::Location;
pub use schedule::Reveal;
pub use tile::{Role, Tile};

pub(crate) mod board;
mod tests;
pub(crate) mod direction;
pub(crate) mod level;
pub(crate) mod location;
pub(crate) mod tile;
pub(crate) mod schedule;
pub mod builder;
pub mod connectivity;
pub mod generator;
pub mod levels;
pub mod scramble;
pub mod score;
pub mod solver;
#[cfg(feature = "wasm")]
pub mod wasm;
