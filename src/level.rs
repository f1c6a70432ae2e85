use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::PortMask;

/// Largest side length a level may have.
pub const MAX_SIZE: usize = 256;

/// Authoring mistakes that make a level unusable. Detected when a [`Board`](crate::Board) is built from [`LevelData`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// The board has no tiles.
    #[error("board size must be at least 1")]
    EmptyBoard,
    /// The board is wider than [`MAX_SIZE`].
    #[error("board size {0} exceeds the maximum of {max}", max = MAX_SIZE)]
    BoardTooLarge(usize),
    /// An index in the level data lies beyond the last tile.
    #[error("tile {index} lies outside a {size}x{size} board")]
    IndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Board side length.
        size: usize,
    },
    /// Only blank, dead-end, straight and corner tiles exist.
    #[error("tile {index} has {ports} ports; at most two are supported")]
    TooManyPorts {
        /// Offending index.
        index: usize,
        /// Ports its mask opens.
        ports: u32,
    },
    /// No source tile was designated.
    #[error("level designates no source")]
    NoSources,
    /// No target tile was designated.
    #[error("level designates no target")]
    NoTargets,
    /// Sources and targets must be disjoint.
    #[error("tile {0} is both a source and a target")]
    SourceIsTarget(usize),
    /// A source or target has no ports.
    #[error("endpoint {0} has no ports")]
    BlankEndpoint(usize),
    /// A locked index has nothing to lock.
    #[error("locked tile {0} has no entry in the mask table")]
    LockedWithoutMask(usize),
    /// The generator needs two distinct, non-adjacent cells.
    #[error("cannot generate a level on a {0}x{0} board")]
    TooSmall(usize),
}

/// The level interchange format: what a level-authoring tool or a save file must provide.
///
/// Indices are row-major tile indices. Unlisted indices and zero masks are blank.
/// Sources and targets are always locked; `locked` may additionally pin wires in place.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Side length of the square board.
    pub size: usize,
    /// Base (canonical) mask per tile index.
    pub masks: BTreeMap<usize, PortMask>,
    /// Where the signal originates.
    pub sources: BTreeSet<usize>,
    /// Where the signal must arrive.
    pub targets: BTreeSet<usize>,
    /// Wires the player may not rotate.
    #[serde(default)]
    pub locked: BTreeSet<usize>,
}

impl LevelData {
    /// Check every configuration rule, reporting the first violation.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.size == 0 {
            return Err(LevelError::EmptyBoard);
        }

        if self.size > MAX_SIZE {
            return Err(LevelError::BoardTooLarge(self.size));
        }

        let tile_count = self.size * self.size;
        let all_indices = self.masks.keys()
            .chain(&self.sources)
            .chain(&self.targets)
            .chain(&self.locked);
        for &index in all_indices {
            if index >= tile_count {
                return Err(LevelError::IndexOutOfBounds { index, size: self.size });
            }
        }

        for (&index, mask) in &self.masks {
            if mask.shape().is_none() {
                return Err(LevelError::TooManyPorts { index, ports: mask.port_count() });
            }
        }

        if self.sources.is_empty() {
            return Err(LevelError::NoSources);
        }
        if self.targets.is_empty() {
            return Err(LevelError::NoTargets);
        }
        if let Some(&index) = self.sources.intersection(&self.targets).next() {
            return Err(LevelError::SourceIsTarget(index));
        }

        for &index in self.sources.iter().chain(&self.targets) {
            if self.mask(index).is_empty() {
                return Err(LevelError::BlankEndpoint(index));
            }
        }

        for &index in &self.locked {
            if self.mask(index).is_empty() {
                return Err(LevelError::LockedWithoutMask(index));
            }
        }

        Ok(())
    }

    /// Base mask at `index`; blank when unlisted.
    pub fn mask(&self, index: usize) -> PortMask {
        self.masks.get(&index).copied().unwrap_or_default()
    }

    /// Number of tiles a player can rotate.
    pub fn movable_count(&self) -> usize {
        self.masks.iter()
            .filter(|&(index, mask)| !mask.is_empty()
                && !self.sources.contains(index)
                && !self.targets.contains(index)
                && !self.locked.contains(index))
            .count()
    }
}

/// Difficulty tag shown alongside a level.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Difficulty {
    /// Short paths on small boards.
    Easy,
    /// A few turns.
    Medium,
    /// Long winding paths.
    Hard,
}

impl Difficulty {
    /// Tag used for generated boards of side `size`.
    pub fn for_size(size: usize) -> Self {
        match size {
            0..=5 => Self::Easy,
            6..=7 => Self::Medium,
            _ => Self::Hard,
        }
    }
}

/// Immutable template a fresh [`Board`](crate::Board) is instantiated from, once per attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Display name.
    pub name: String,
    /// Difficulty tag.
    pub difficulty: Difficulty,
    /// Time the caller's countdown starts from.
    pub time_budget: Duration,
    /// Par move count.
    pub move_budget: u32,
    /// Board-construction data.
    pub data: LevelData,
}
