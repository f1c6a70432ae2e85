use serde::{Deserialize, Serialize};

use crate::direction::{PortMask, QUARTER_TURNS};

/// What a tile does in the circuit.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Role {
    /// No ports; never part of the circuit.
    #[default]
    Blank,
    /// A wire piece the player may rotate unless it is locked.
    Wire,
    /// Where the signal originates. Always locked.
    Source,
    /// Where the signal must arrive. Always locked.
    Target,
}

/// A single cell of a [`Board`](crate::Board).
///
/// Only the base mask and the rotation are stored; the current mask is always derived from them.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Tile {
    pub(crate) index: usize,
    pub(crate) base: PortMask,
    pub(crate) rotation: u8,
    pub(crate) role: Role,
    pub(crate) locked: bool,
}

impl Tile {
    /// Row-major position of this tile on its board.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Ports at canonical orientation.
    pub fn base_mask(&self) -> PortMask {
        self.base
    }

    /// Clockwise quarter turns applied to the base mask, in `0..4`.
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// The tile's role in the circuit.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the player is barred from rotating this tile.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Ports as currently rotated.
    pub fn current_mask(&self) -> PortMask {
        self.base.rotate(self.rotation as i32)
    }

    /// Whether this tile has any open port, i.e. takes part in connectivity.
    pub fn is_active(&self) -> bool {
        !self.current_mask().is_empty()
    }

    /// Whether rotations of this tile are under the player's (or the scrambler's) control.
    pub fn is_movable(&self) -> bool {
        !self.locked && self.role != Role::Blank
    }

    pub(crate) fn set_rotation(&mut self, rotation: u8) {
        self.rotation = rotation % QUARTER_TURNS;
    }

    /// Orientations with distinct masks, as `(rotation, mask)` pairs, lowest rotation first.
    ///
    /// Locked tiles only have their current orientation.
    pub(crate) fn orientations(&self) -> Vec<(u8, PortMask)> {
        if !self.is_movable() {
            return vec![(self.rotation, self.current_mask())];
        }

        let mut seen = Vec::with_capacity(QUARTER_TURNS as usize);
        for rotation in 0..QUARTER_TURNS {
            let mask = self.base.rotate(rotation as i32);
            if !seen.iter().any(|(_, existing)| *existing == mask) {
                seen.push((rotation, mask));
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;

    fn wire(base: PortMask) -> Tile {
        Tile { base, role: Role::Wire, ..Default::default() }
    }

    #[test]
    fn current_mask_follows_rotation() {
        let mut tile = wire(Direction::Up | Direction::Right);
        tile.set_rotation(5);
        assert_eq!(tile.rotation(), 1);
        assert_eq!(tile.current_mask(), Direction::Right | Direction::Down);
    }

    #[test]
    fn straight_has_two_orientations() {
        let tile = wire(Direction::Up | Direction::Down);
        assert_eq!(tile.orientations(), vec![
            (0, Direction::Up | Direction::Down),
            (1, Direction::Left | Direction::Right),
        ]);
        assert_eq!(wire(Direction::Up | Direction::Left).orientations().len(), 4);
        assert_eq!(wire(Direction::Left.into()).orientations().len(), 4);
    }

    #[test]
    fn locked_tiles_keep_one_orientation() {
        let tile = Tile { locked: true, rotation: 2, ..wire(Direction::Up.into()) };
        assert_eq!(tile.orientations(), vec![(2, Direction::Down.into())]);
        assert!(!tile.is_movable());
    }
}
