use std::fmt::{Display, Formatter};
use std::ops::BitOr;

use serde::{Deserialize, Serialize};
use strum::VariantArray;
use thiserror::Error;

use crate::location::Location;

/// Number of distinct quarter turns a tile can be in.
pub const QUARTER_TURNS: u8 = 4;

/// One of the four compass directions a port can face.
///
/// Variants are listed clockwise, so a quarter turn moves each direction to the next variant.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last column.
    Right,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
}

impl Direction {
    /// The bit this direction occupies in a [`PortMask`].
    pub const fn bit(self) -> u8 {
        match self {
            Self::Up => 0b0001,
            Self::Right => 0b0010,
            Self::Down => 0b0100,
            Self::Left => 0b1000,
        }
    }

    /// The facing direction; an involution.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The direction a quarter turn clockwise from `self`.
    pub fn clockwise(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Attempt the step from `location` in this direction.
    ///
    /// Stepping off the top or left edge wraps to a huge coordinate, so callers bounds-check the result.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }

    /// Determine the direction from `a` to `b`.
    /// Only grid-adjacent locations have one; anything else yields [`None`].
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|dir| dir.attempt_from(a) == b)
    }
}

/// Raised when a raw value carries bits beyond the four direction flags.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("port mask {0:#06b} has bits outside the four directions")]
pub struct InvalidPortBits(pub u8);

/// The set of open ports on a tile, one bit per [`Direction`].
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PortMask(u8);

/// The tile families a mask can describe.
///
/// Masks with three or four ports have no family; levels containing them are rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TileShape {
    /// No ports.
    Blank,
    /// A single port.
    DeadEnd,
    /// Two opposing ports.
    Straight,
    /// Two perpendicular ports.
    Corner,
}

impl PortMask {
    /// No open ports.
    pub const EMPTY: Self = Self(0);
    /// Every valid bit.
    const ALL_BITS: u8 = 0b1111;

    /// Directions contained in this mask, in clockwise order starting from [`Direction::Up`].
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::VARIANTS.iter().copied().filter(move |dir| self.contains(*dir))
    }

    /// Raw bits, [`Direction::bit`] per open port.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether the port facing `direction` is open.
    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// This mask with the port facing `direction` opened.
    pub fn with(self, direction: Direction) -> Self {
        Self(self.0 | direction.bit())
    }

    /// Whether no port is open.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of open ports.
    pub fn port_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Rotate clockwise by `steps` quarter turns.
    ///
    /// `steps` is reduced modulo four first, negative values included, so `rotate(-1)` is a counter-clockwise quarter turn.
    pub fn rotate(self, steps: i32) -> Self {
        (0..steps.rem_euclid(QUARTER_TURNS as i32)).fold(self, |mask, _| {
            Self(((mask.0 << 1) | (mask.0 >> 3)) & Self::ALL_BITS)
        })
    }

    /// The family of this mask, or [`None`] for three- and four-port masks.
    pub fn shape(self) -> Option<TileShape> {
        match self.port_count() {
            0 => Some(TileShape::Blank),
            1 => Some(TileShape::DeadEnd),
            2 if self.is_straight() => Some(TileShape::Straight),
            2 => Some(TileShape::Corner),
            _ => None,
        }
    }

    /// Exactly two opposing ports.
    pub fn is_straight(self) -> bool {
        self == (Direction::Up | Direction::Down) || self == (Direction::Left | Direction::Right)
    }

    /// Exactly two perpendicular ports.
    pub fn is_corner(self) -> bool {
        self.port_count() == 2 && !self.is_straight()
    }

    /// The layout glyph drawing this mask. Three- and four-port masks draw as `+`.
    pub fn glyph(self) -> char {
        match self.0 {
            0b0000 => '.',
            0b0101 => '|',
            0b1010 => '-',
            0b0011 => 'L',
            0b0110 => 'R',
            0b1100 => 'J',
            0b1001 => '7',
            0b0001 => '^',
            0b0010 => '>',
            0b0100 => 'v',
            0b1000 => '<',
            _ => '+',
        }
    }

    /// Inverse of [`Self::glyph`] for every glyph except `+`.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        Some(Self(match glyph {
            '.' => 0b0000,
            '|' => 0b0101,
            '-' => 0b1010,
            'L' => 0b0011,
            'R' => 0b0110,
            'J' => 0b1100,
            '7' => 0b1001,
            '^' => 0b0001,
            '>' => 0b0010,
            'v' => 0b0100,
            '<' => 0b1000,
            _ => return None,
        }))
    }
}

impl TryFrom<u8> for PortMask {
    type Error = InvalidPortBits;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value & !Self::ALL_BITS {
            0 => Ok(Self(value)),
            _ => Err(InvalidPortBits(value)),
        }
    }
}

impl From<PortMask> for u8 {
    fn from(value: PortMask) -> Self {
        value.0
    }
}

impl From<Direction> for PortMask {
    fn from(value: Direction) -> Self {
        Self(value.bit())
    }
}

impl FromIterator<Direction> for PortMask {
    fn from_iter<T: IntoIterator<Item = Direction>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl BitOr for PortMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Direction> for PortMask {
    type Output = Self;

    fn bitor(self, rhs: Direction) -> Self::Output {
        self.with(rhs)
    }
}

impl BitOr for Direction {
    type Output = PortMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        PortMask::from(self).with(rhs)
    }
}

impl std::fmt::Debug for PortMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.directions()).finish()
    }
}

impl Display for PortMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
