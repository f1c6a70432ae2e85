//! Builders producing [`LevelData`].
//!
//! Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
//! Once a builder becomes invalid every further call is a no-op, and [`LevelBuilder::build`] reports why.

use std::collections::BTreeSet;
use std::num::NonZero;

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::direction::{Direction, PortMask};
use crate::level::LevelData;
use crate::location::{Dimension, Location};

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A feature was placed outside the board.
    FeatureOutOfBounds,
    /// A layout contained a character with no meaning.
    UnknownGlyph(char),
    /// A layout was empty or not square.
    RaggedLayout,
    /// A layout endpoint has no neighbor pointing at it, so no port could be derived.
    EndpointUnconnected(Location),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Endpoint {
    Source,
    Target,
}

/// A builder for square levels.
#[derive(Clone, Debug)]
pub struct LevelBuilder {
    dims: Dimension,
    masks: Array2<PortMask>,
    sources: BTreeSet<Location>,
    targets: BTreeSet<Location>,
    locked: BTreeSet<Location>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::with_size(NonZero::new(5).unwrap())
    }
}

impl LevelBuilder {
    /// Construct an empty builder for a board of side `size`.
    pub fn with_size(size: Dimension) -> Self {
        Self {
            dims: size,
            masks: Array2::from_elem((size.get(), size.get()), PortMask::EMPTY),
            sources: Default::default(),
            targets: Default::default(),
            locked: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    /// Parse a square ASCII layout, one string per row.
    ///
    /// Wires use the glyphs of [`PortMask::glyph`]; `.` is blank. `S` and `T` mark a source and a target; their
    /// ports are the directions of neighboring wires which point back at them.
    ///
    /// May cause the builder to enter a [`RaggedLayout`](BuilderInvalidReason::RaggedLayout),
    /// [`UnknownGlyph`](BuilderInvalidReason::UnknownGlyph) or
    /// [`EndpointUnconnected`](BuilderInvalidReason::EndpointUnconnected) invalid state.
    pub fn from_layout(rows: &[&str]) -> Self {
        let Some(size) = NonZero::new(rows.len()) else {
            let mut builder = Self::default();
            builder.invalid_reasons.push(BuilderInvalidReason::RaggedLayout);
            return builder;
        };

        let mut builder = Self::with_size(size);
        if rows.iter().any(|row| row.chars().count() != size.get()) {
            builder.invalid_reasons.push(BuilderInvalidReason::RaggedLayout);
            return builder;
        }

        let mut endpoints = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let location = Location(x, y);
                match glyph {
                    'S' => endpoints.push((location, Endpoint::Source)),
                    'T' => endpoints.push((location, Endpoint::Target)),
                    _ => match PortMask::from_glyph(glyph) {
                        Some(mask) => {
                            builder.add_wire(location, mask);
                        }
                        None => {
                            builder.invalid_reasons.push(BuilderInvalidReason::UnknownGlyph(glyph));
                            return builder;
                        }
                    },
                }
            }
        }

        // derive endpoint ports only from wires, so neighboring endpoints do not depend on each other
        let derived = endpoints.iter()
            .map(|(location, endpoint)| (*location, *endpoint, builder.ports_facing(*location)))
            .collect_vec();

        for (location, endpoint, mask) in derived {
            if mask.is_empty() {
                builder.invalid_reasons.push(BuilderInvalidReason::EndpointUnconnected(location));
                return builder;
            }

            match endpoint {
                Endpoint::Source => builder.add_source(location, mask),
                Endpoint::Target => builder.add_target(location, mask),
            };
        }

        builder
    }

    /// Place a movable wire with base ports `mask` at `location`, replacing whatever was there.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_wire(&mut self, location: Location, mask: PortMask) -> &mut Self {
        if self.place(location, mask) {
            self.sources.remove(&location);
            self.targets.remove(&location);
        }

        self
    }

    /// Place a source with ports `mask` at `location`.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_source(&mut self, location: Location, mask: PortMask) -> &mut Self {
        if self.place(location, mask) {
            self.targets.remove(&location);
            self.sources.insert(location);
        }

        self
    }

    /// Place a target with ports `mask` at `location`.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_target(&mut self, location: Location, mask: PortMask) -> &mut Self {
        if self.place(location, mask) {
            self.sources.remove(&location);
            self.targets.insert(location);
        }

        self
    }

    /// Pin the wire at `location` so the player cannot rotate it.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn lock(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !location.within(self.dims) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        self.locked.insert(location);
        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into [`LevelData`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    ///
    /// Configuration rules on the data itself are checked later, by [`Board::new`](crate::Board::new).
    pub fn build(&self) -> Result<LevelData, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let index_of = |location: &Location| location.tile_index(self.dims);

        Ok(LevelData {
            size: self.dims.get(),
            masks: self.masks.indexed_iter()
                .filter(|(_, mask)| !mask.is_empty())
                .map(|(ind, mask)| (Location::from(ind).tile_index(self.dims), *mask))
                .collect(),
            sources: self.sources.iter().map(index_of).collect(),
            targets: self.targets.iter().map(index_of).collect(),
            locked: self.locked.iter().map(index_of).collect(),
        })
    }

    fn place(&mut self, location: Location, mask: PortMask) -> bool {
        if !self.invalid_reasons.is_empty() {
            return false;
        }

        match self.masks.get_mut(location.as_index()) {
            Some(cell) => {
                *cell = mask;
                true
            }
            None => {
                self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
                false
            }
        }
    }

    /// Directions from `location` towards placed wires whose ports face back at it.
    fn ports_facing(&self, location: Location) -> PortMask {
        Direction::VARIANTS.iter()
            .copied()
            .filter(|direction| location.step(*direction, self.dims)
                .filter(|neighbor| !self.sources.contains(neighbor) && !self.targets.contains(neighbor))
                .and_then(|neighbor| self.masks.get(neighbor.as_index()))
                .is_some_and(|mask| mask.contains(direction.opposite())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;

    #[test]
    fn layout_derives_endpoint_ports() {
        let level = LevelBuilder::from_layout(&[
            ".S.",
            ".L-",
            "..T",
        ]).build().map_err(Vec::clone);
        // T at (2, 2) has nothing pointing at it: '-' at (2, 1) only opens left and right
        assert_eq!(level, Err(vec![BuilderInvalidReason::EndpointUnconnected(Location(2, 2))]));

        let level = LevelBuilder::from_layout(&[
            ".S.",
            ".LJ",
            "..T",
        ]).build().unwrap();
        assert_eq!(level.mask(1), Direction::Down.into());
        assert_eq!(level.mask(8), Direction::Up.into());
        assert_eq!(level.sources, BTreeSet::from([1]));
        assert_eq!(level.targets, BTreeSet::from([8]));
        assert!(Board::new(&level).unwrap().is_solved());
    }

    #[test]
    fn layout_rejects_unknown_glyphs_and_ragged_rows() {
        assert_eq!(
            LevelBuilder::from_layout(&["S?", "T."]).is_valid(),
            Some(&vec![BuilderInvalidReason::UnknownGlyph('?')]),
        );
        assert_eq!(
            LevelBuilder::from_layout(&["S..", "T."]).is_valid(),
            Some(&vec![BuilderInvalidReason::RaggedLayout]),
        );
        assert_eq!(LevelBuilder::from_layout(&[]).is_valid(), Some(&vec![BuilderInvalidReason::RaggedLayout]));
    }

    #[test]
    fn out_of_bounds_invalidates_and_later_calls_do_nothing() {
        let mut builder = LevelBuilder::with_size(NonZero::new(3).unwrap());
        builder
            .add_wire(Location(3, 0), Direction::Up.into())
            .add_source(Location(0, 0), Direction::Right.into());
        assert_eq!(builder.build(), Err(&vec![BuilderInvalidReason::FeatureOutOfBounds]));
    }

    #[test]
    fn manual_build_with_locked_wire() {
        let level = LevelBuilder::with_size(NonZero::new(3).unwrap())
            .add_source(Location(0, 0), Direction::Right.into())
            .add_wire(Location(1, 0), Direction::Left | Direction::Right)
            .add_target(Location(2, 0), Direction::Left.into())
            .lock(Location(1, 0))
            .build()
            .unwrap();

        assert_eq!(level.locked, BTreeSet::from([1]));
        assert_eq!(level.movable_count(), 0);
        let board = Board::new(&level).unwrap();
        assert!(board.tile(1).unwrap().is_locked());
        assert_eq!(format!("{}", board), "S-T\n...\n...\n");
    }
}
