use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::num::NonZero;

use itertools::Itertools;
use ndarray::Array2;
use tracing::trace;

use crate::direction::Direction;
use crate::level::{LevelData, LevelError};
use crate::location::{Dimension, Location};
use crate::tile::{Role, Tile};

/// A square grid of rotatable tiles and the endpoints the circuit must join.
///
/// [`Board`]s are built from [`LevelData`], either authored (see [`LevelBuilder`](crate::builder::LevelBuilder)) or
/// [generated](crate::generator::generate). No tile is added or removed afterwards; the only mutations are
/// rotations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub(crate) dims: Dimension,
    pub(crate) tiles: Array2<Tile>,
    pub(crate) sources: BTreeSet<usize>,
    pub(crate) targets: BTreeSet<usize>,
    pub(crate) started: bool,
}

impl Board {
    /// Instantiate a board at canonical orientation (every rotation 0).
    ///
    /// Listed sources and targets become locked endpoints, other mask-bearing tiles become wires (locked if listed in
    /// `level.locked`), and everything else is blank.
    /// Fails on any configuration error; see [`LevelData::validate`].
    pub fn new(level: &LevelData) -> Result<Self, LevelError> {
        level.validate()?;
        let dims = NonZero::new(level.size).ok_or(LevelError::EmptyBoard)?;

        let tiles = Array2::from_shape_fn((dims.get(), dims.get()), |ind| {
            let index = Location::from(ind).tile_index(dims);
            let base = level.mask(index);
            let role = if level.sources.contains(&index) {
                Role::Source
            } else if level.targets.contains(&index) {
                Role::Target
            } else if base.is_empty() {
                Role::Blank
            } else {
                Role::Wire
            };

            Tile {
                index,
                base,
                rotation: 0,
                role,
                locked: matches!(role, Role::Source | Role::Target) || level.locked.contains(&index),
            }
        });

        trace!(size = dims.get(), sources = ?level.sources, targets = ?level.targets, "built board");

        Ok(Self {
            dims,
            tiles,
            sources: level.sources.clone(),
            targets: level.targets.clone(),
            started: false,
        })
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.dims.get()
    }

    /// Tile at row-major `index`.
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tile_at(Location::from_tile_index(index, self.dims))
    }

    /// Tile at `location`.
    pub fn tile_at(&self, location: Location) -> Option<&Tile> {
        self.tiles.get(location.as_index())
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Indices of source tiles.
    pub fn sources(&self) -> &BTreeSet<usize> {
        &self.sources
    }

    /// Indices of target tiles.
    pub fn targets(&self) -> &BTreeSet<usize> {
        &self.targets
    }

    /// Indices of tiles the player (and the scrambler) may rotate.
    pub fn movable_indices(&self) -> Vec<usize> {
        self.tiles().filter(|tile| tile.is_movable()).map(Tile::index).collect_vec()
    }

    /// Index of the cell next to `index` in `direction`, if it is on the board.
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        Location::from_tile_index(index, self.dims)
            .step(direction, self.dims)
            .map(|location| location.tile_index(self.dims))
    }

    /// Allow player rotations. Until this is called, [`Self::rotate_tile`] ignores every request.
    pub fn start(&mut self) {
        self.started = true;
    }

    /// Whether the player has started this attempt.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Rotate the tile at `index` a quarter turn clockwise in response to a player action.
    ///
    /// Blank, locked and out-of-range tiles are ignored, as is every request before [`Self::start`].
    /// Returns whether the rotation happened, which is what a caller's move counter should follow.
    pub fn rotate_tile(&mut self, index: usize) -> bool {
        if !self.started {
            return false;
        }

        match self.tile_mut(index) {
            Some(tile) if tile.is_movable() => {
                tile.set_rotation(tile.rotation + 1);
                true
            }
            _ => false,
        }
    }

    /// Return every tile to canonical orientation.
    pub fn reset(&mut self) {
        self.tiles.iter_mut()
            .filter(|tile| tile.is_movable())
            .for_each(|tile| tile.set_rotation(0));
    }

    /// Current rotations of movable tiles, keyed by index.
    pub fn rotations(&self) -> Vec<(usize, u8)> {
        self.tiles().filter(|tile| tile.is_movable()).map(|tile| (tile.index, tile.rotation)).collect_vec()
    }

    /// Overwrite rotations of movable tiles; entries naming other tiles are skipped.
    pub fn apply_rotations(&mut self, rotations: impl IntoIterator<Item = (usize, u8)>) {
        for (index, rotation) in rotations {
            self.set_rotation(index, rotation);
        }
    }

    pub(crate) fn set_rotation(&mut self, index: usize, rotation: u8) {
        if let Some(tile) = self.tile_mut(index).filter(|tile| tile.is_movable()) {
            tile.set_rotation(rotation);
        }
    }

    fn tile_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(Location::from_tile_index(index, self.dims).as_index())
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.tiles.rows() {
            for tile in row {
                let glyph = match tile.role {
                    Role::Source => 'S',
                    Role::Target => 'T',
                    Role::Blank | Role::Wire => tile.current_mask().glyph(),
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
