use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZero;
use std::time::Duration;

use itertools::Itertools;
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::VariantArray;
use tracing::debug;

use crate::board::Board;
use crate::connectivity::is_solved;
use crate::direction::{Direction, PortMask};
use crate::level::{Difficulty, LevelData, LevelDescriptor, LevelError, MAX_SIZE};
use crate::location::{Dimension, Location};

/// Bounds on [`generate_with`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Random walks tried before carving a direct path instead.
    pub max_attempts: usize,
    /// Steps allowed per walk; [`None`] means four times the number of tiles.
    pub max_steps: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { max_attempts: 64, max_steps: None }
    }
}

/// [`generate_with`] under [`GeneratorConfig::default`].
pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<LevelDescriptor, LevelError> {
    generate_with(size, rng, &GeneratorConfig::default())
}

/// Carve a fresh single-path level on a board of side `size`.
///
/// A source and a target are drawn at least two steps apart, then joined by a random self-avoiding walk. Each path
/// cell gets ports towards its predecessor and successor only, so the level consists of dead-end endpoints and
/// straight or corner wires, and is solved at canonical orientation.
///
/// Walks that dead-end or exceed their step budget are retried up to `config.max_attempts` times; after that the
/// endpoints are joined by an L-shaped path. Fails only for boards smaller than 2x2 or wider than [`MAX_SIZE`].
pub fn generate_with<R: Rng + ?Sized>(size: usize, rng: &mut R, config: &GeneratorConfig) -> Result<LevelDescriptor, LevelError> {
    if size > MAX_SIZE {
        return Err(LevelError::BoardTooLarge(size));
    }
    let dims = NonZero::new(size).filter(|dims| dims.get() >= 2).ok_or(LevelError::TooSmall(size))?;
    let max_steps = config.max_steps.unwrap_or(4 * size * size);
    let (source, target) = pick_endpoints(dims, rng);

    for attempt in 1..=config.max_attempts {
        let Some(path) = walk(dims, source, target, max_steps, rng) else {
            debug!(attempt, ?source, ?target, "walk dead-ended");
            continue;
        };

        let level = descriptor(dims, &path);
        if Board::new(&level.data).is_ok_and(|board| is_solved(&board)) {
            debug!(attempt, length = path.len(), "carved level");
            return Ok(level);
        }
    }

    debug!(attempts = config.max_attempts, ?source, ?target, "falling back to a direct path");
    Ok(descriptor(dims, &direct_path(source, target)))
}

/// A random source, then a random target at Manhattan distance at least two, so the path has an interior wire.
fn pick_endpoints<R: Rng + ?Sized>(dims: Dimension, rng: &mut R) -> (Location, Location) {
    let cells = (0..dims.get() * dims.get())
        .map(|index| Location::from_tile_index(index, dims))
        .collect_vec();

    let source = cells[rng.gen_range(0..cells.len())];
    let candidates = cells.into_iter().filter(|cell| cell.manhattan(source) >= 2).collect_vec();
    // on a board of side >= 2 the opposite corner cell is always at distance >= 2
    let target = candidates.choose(rng).copied().unwrap_or(source);

    (source, target)
}

/// A self-avoiding random walk from `source` that ends on `target`, or [`None`] if it gets stuck or runs too long.
fn walk<R: Rng + ?Sized>(dims: Dimension, source: Location, target: Location, max_steps: usize, rng: &mut R) -> Option<Vec<Location>> {
    let mut visited = Array2::from_elem((dims.get(), dims.get()), false);
    let mut path = vec![source];
    visited[source.as_index()] = true;

    for _ in 0..max_steps {
        let current = *path.last()?;
        if current == target {
            return Some(path);
        }

        let candidates = Direction::VARIANTS.iter()
            .filter_map(|direction| current.step(*direction, dims))
            .filter(|next| *next == target || !visited[next.as_index()])
            .collect_vec();

        let next = *candidates.choose(rng)?;
        visited[next.as_index()] = true;
        path.push(next);
    }

    path.last().is_some_and(|last| *last == target).then_some(path)
}

/// Horizontal leg, then vertical leg.
fn direct_path(source: Location, target: Location) -> Vec<Location> {
    let mut path = vec![source];
    let mut current = source;

    while current.0 != target.0 {
        current = Location(if current.0 < target.0 { current.0 + 1 } else { current.0 - 1 }, current.1);
        path.push(current);
    }
    while current.1 != target.1 {
        current = Location(current.0, if current.1 < target.1 { current.1 + 1 } else { current.1 - 1 });
        path.push(current);
    }

    path
}

fn descriptor(dims: Dimension, path: &[Location]) -> LevelDescriptor {
    let mut masks = BTreeMap::new();
    for (position, location) in path.iter().enumerate() {
        let neighbors = [position.checked_sub(1), Some(position + 1)]
            .into_iter()
            .flatten()
            .filter_map(|other| path.get(other));
        let mask: PortMask = neighbors
            .filter_map(|other| Direction::direction_to(*location, *other))
            .collect();
        masks.insert(location.tile_index(dims), mask);
    }

    let first = path.first().map(|location| location.tile_index(dims));
    let last = path.last().map(|location| location.tile_index(dims));
    let data = LevelData {
        size: dims.get(),
        masks,
        sources: first.into_iter().collect(),
        targets: last.into_iter().collect(),
        locked: BTreeSet::new(),
    };

    let wires = data.movable_count() as u32;
    LevelDescriptor {
        name: format!("Endless {0}x{0}", dims.get()),
        difficulty: Difficulty::for_size(dims.get()),
        time_budget: Duration::from_secs(30 + 4 * path.len() as u64),
        move_budget: 3 * wires.max(1),
        data,
    }
}
