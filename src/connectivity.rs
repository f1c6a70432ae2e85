//! Port matching and reachability over a [`Board`].
//!
//! Evaluation happens in two passes. The local pass checks that every open port faces an in-grid neighbor that
//! opens the opposite port back. Only if that holds does the global pass run: a breadth-first search from all
//! sources at once over reciprocated links, after which the board is solved iff every target and every other active
//! tile was reached.

use std::collections::{BTreeMap, HashSet, VecDeque};

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use strum::VariantArray;
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::direction::Direction;
use crate::location::Location;
use crate::tile::{Role, Tile};

/// The graph of reciprocated links between active tiles.
///
/// Edge weights carry the direction from the lower index to the higher one.
pub(crate) type LinkGraph = UnGraphMap<usize, Direction>;

/// Why a single open port fails the local pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PortFault {
    /// The port points off the edge of the board.
    OffGrid {
        /// Tile owning the port.
        tile: usize,
        /// Direction the port faces.
        direction: Direction,
    },
    /// The neighbor is blank or does not open the opposite port.
    Unanswered {
        /// Tile owning the port.
        tile: usize,
        /// Direction the port faces.
        direction: Direction,
        /// The neighbor it faces.
        neighbor: usize,
    },
}

/// Every open port failing the local pass, in tile index order.
pub fn faults(board: &Board) -> Vec<PortFault> {
    board.tiles()
        .filter(|tile| tile.is_active())
        .flat_map(|tile| tile.current_mask()
            .directions()
            .filter_map(move |direction| port_fault(board, tile, direction)))
        .collect_vec()
}

fn port_fault(board: &Board, tile: &Tile, direction: Direction) -> Option<PortFault> {
    let Some(neighbor) = board.neighbor(tile.index(), direction) else {
        return Some(PortFault::OffGrid { tile: tile.index(), direction });
    };

    let answered = board.tile(neighbor)
        .is_some_and(|other| other.role() != Role::Blank && other.current_mask().contains(direction.opposite()));

    (!answered).then_some(PortFault::Unanswered { tile: tile.index(), direction, neighbor })
}

/// Whether every open port is answered by its neighbor. Does not require reachability.
pub fn is_locally_valid(board: &Board) -> bool {
    board.tiles()
        .filter(|tile| tile.is_active())
        .all(|tile| tile.current_mask().directions().all(|direction| port_fault(board, tile, direction).is_none()))
}

/// Every pair of grid-adjacent cells once, with the direction from the lower index.
pub(crate) fn grid_edges(board: &Board) -> impl Iterator<Item = (UnorderedPair<usize>, Direction)> + '_ {
    (0..board.size() * board.size()).flat_map(move |index| [Direction::Right, Direction::Down]
        .into_iter()
        .filter_map(move |direction| board.neighbor(index, direction)
            .map(|neighbor| (UnorderedPair(index, neighbor), direction))))
}

/// Build the reciprocated-link graph over active tiles.
pub(crate) fn links(board: &Board) -> LinkGraph {
    let active = board.tiles().filter(|tile| tile.is_active()).collect_vec();
    let mut graph = LinkGraph::with_capacity(active.len(), active.len() * 2);
    for tile in &active {
        graph.add_node(tile.index());
    }

    for (UnorderedPair(low, high), direction) in grid_edges(board) {
        let (Some(a), Some(b)) = (board.tile(low), board.tile(high)) else {
            continue;
        };
        if a.current_mask().contains(direction) && b.current_mask().contains(direction.opposite()) {
            graph.add_edge(low, high, direction);
        }
    }

    graph
}

/// Breadth-first distances from the merged source frontier over `graph`.
///
/// Sources missing from the graph contribute nothing.
pub(crate) fn distances(board: &Board, graph: &LinkGraph) -> BTreeMap<usize, usize> {
    let mut distances = BTreeMap::new();
    let mut frontier = VecDeque::with_capacity(graph.node_count());

    for &source in board.sources() {
        if graph.contains_node(source) {
            distances.insert(source, 0);
            frontier.push_back(source);
        }
    }

    while let Some(current) = frontier.pop_front() {
        let next_distance = distances[&current] + 1;
        // neighbors() order depends on insertion; sort so equal-distance tiles come out in index order
        for neighbor in graph.neighbors(current).sorted() {
            if !distances.contains_key(&neighbor) {
                distances.insert(neighbor, next_distance);
                frontier.push_back(neighbor);
            }
        }
    }

    distances
}

/// Whether the board is solved: locally valid, every target reachable from the sources, and no active tile left
/// disconnected from them.
///
/// A board with no active tiles, or with an endpoint that has no open port, is never solved.
pub fn is_solved(board: &Board) -> bool {
    if !is_locally_valid(board) {
        return false;
    }

    let graph = links(board);
    if graph.node_count() == 0 {
        return false;
    }
    if !board.sources().iter().chain(board.targets()).all(|index| graph.contains_node(*index)) {
        return false;
    }

    let reached = distances(board, &graph);
    board.targets().iter().all(|target| reached.contains_key(target)) && reached.len() == graph.node_count()
}

/// Active tiles not connected to any source, grouped into their linked components.
///
/// Each component is sorted by index; components are ordered by their lowest index.
pub(crate) fn islands(board: &Board, graph: &LinkGraph) -> Vec<Vec<usize>> {
    let reached = distances(board, graph);
    let mut seen: HashSet<usize> = reached.keys().copied().collect();
    let mut islands = Vec::new();

    for start in graph.nodes().sorted() {
        if !seen.insert(start) {
            continue;
        }

        let mut component = vec![start];
        let mut frontier = VecDeque::from([start]);
        while let Some(current) = frontier.pop_front() {
            for neighbor in graph.neighbors(current) {
                if seen.insert(neighbor) {
                    component.push(neighbor);
                    frontier.push_back(neighbor);
                }
            }
        }

        component.sort_unstable();
        islands.push(component);
    }

    islands
}

impl Board {
    /// See [`is_locally_valid`].
    pub fn is_locally_valid(&self) -> bool {
        is_locally_valid(self)
    }

    /// See [`is_solved`].
    pub fn is_solved(&self) -> bool {
        is_solved(self)
    }

    /// See [`faults`].
    pub fn faults(&self) -> Vec<PortFault> {
        faults(self)
    }

    /// Open ports of the tile at `index` that are answered by a neighbor, for partial-connection highlighting.
    pub fn linked_directions(&self, index: usize) -> Vec<Direction> {
        let Some(tile) = self.tile(index).filter(|tile| tile.is_active()) else {
            return Vec::new();
        };

        Direction::VARIANTS.iter()
            .copied()
            .filter(|direction| tile.current_mask().contains(*direction) && port_fault(self, tile, *direction).is_none())
            .collect_vec()
    }

    /// The location of tile `index`, for callers laying tiles out on screen.
    pub fn location_of(&self, index: usize) -> Location {
        Location::from_tile_index(index, self.dims)
    }
}
