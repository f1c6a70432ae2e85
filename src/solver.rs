use std::collections::{BTreeMap, HashSet};
use std::convert::identity;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;
use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

use crate::board::Board;
use crate::connectivity::{is_solved, islands, links};
use crate::direction::{PortMask, QUARTER_TURNS};
use crate::tile::Role;

/// Reasons a [`RotationSolver`] may fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverFailure {
    /// No assignment of rotations solves the board.
    Inconsistent,
    /// Every refinement round produced a model with disconnected islands.
    Exhausted,
}

/// Bounds on [`RotationSolver::solve`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Rounds of island elimination before giving up.
    pub max_refinements: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { max_refinements: 256 }
    }
}

/// A tile rotated to face a particular way, with the variable asserting it does.
#[derive(Clone, Copy, Debug)]
struct Orientation {
    tile: usize,
    rotation: u8,
    mask: PortMask,
    var: Var,
}

/// A move that brings the board closer to a solution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Hint {
    /// Tile to rotate.
    pub index: usize,
    /// Quarter turns it needs, in `1..4`.
    pub turns: u8,
}

// no two are true; (!A + !B) * (!A + !C) * ...
// at least one is true; A + B + C + ...
fn exactly_one(vars: &[Var]) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(vars.len() * (vars.len() + 1) / 2 + 1);
    clauses.extend(vars.iter()
        .tuple_combinations()
        .map(|(a, b)| vec![a.negative(), b.negative()]));
    clauses.push(vars.iter().map(|v| v.positive()).collect_vec());

    clauses
}

/// Finds rotations of the movable tiles of a [`Board`] that solve it.
/// Use [`Self::solve`] to attempt to find a solution.
///
/// # Logical setup
/// Every non-blank tile T gets one variable per orientation with a distinct mask; locked tiles have only their current
/// orientation.
/// Exactly one orientation of T holds.
/// If an orientation of T opens a port towards neighbor N, then some orientation of N holding must open the opposite
/// port; blank and off-grid neighbors have no orientations, so such an orientation cannot hold at all.
///
/// Any model is therefore locally valid. It may still leave islands: closed groups of tiles linked only among
/// themselves. Such a group stays closed under every assignment that keeps all of its orientations, so the clause
/// "at least one of these orientations differs" holds in every solution and is added before solving again.
pub struct RotationSolver<'a> {
    board: &'a Board,
    choices: BTreeMap<usize, Vec<Orientation>>,
}

impl<'a> From<&'a Board> for RotationSolver<'a> {
    fn from(board: &'a Board) -> Self {
        let mut next_var = 0;
        let choices = board.tiles()
            .filter(|tile| tile.role() != Role::Blank)
            .map(|tile| {
                let options = tile.orientations()
                    .into_iter()
                    .map(|(rotation, mask)| {
                        let var = Var::from_index(next_var);
                        next_var += 1;
                        Orientation { tile: tile.index(), rotation, mask, var }
                    })
                    .collect_vec();
                (tile.index(), options)
            })
            .collect();

        Self { board, choices }
    }
}

impl RotationSolver<'_> {
    fn formula(&self) -> CnfFormula {
        let mut formula = CnfFormula::new();

        for options in self.choices.values() {
            let vars = options.iter().map(|option| option.var).collect_vec();
            for clause in exactly_one(&vars) {
                formula.add_clause(&clause);
            }

            for option in options {
                for direction in option.mask.directions() {
                    // this orientation holding implies an answering orientation of the neighbor holds
                    let mut clause = vec![option.var.negative()];
                    if let Some(theirs) = self.board.neighbor(option.tile, direction).and_then(|n| self.choices.get(&n)) {
                        clause.extend(theirs.iter()
                            .filter(|other| other.mask.contains(direction.opposite()))
                            .map(|other| other.var.positive()));
                    }
                    formula.add_clause(&clause);
                }
            }
        }

        formula
    }

    /// Solve with the default [`SolverConfig`].
    pub fn solve(&self) -> Result<Vec<(usize, u8)>, SolverFailure> {
        self.solve_with(&SolverConfig::default())
    }

    /// Return a rotation for every movable tile, in index order, such that applying them solves the board.
    pub fn solve_with(&self, config: &SolverConfig) -> Result<Vec<(usize, u8)>, SolverFailure> {
        let mut solver = Solver::new();
        solver.add_formula(&self.formula());

        for round in 0..=config.max_refinements {
            if !solver.solve().is_ok_and(identity) {
                return Err(SolverFailure::Inconsistent);
            }
            let model: HashSet<Var> = solver.model()
                .ok_or(SolverFailure::Inconsistent)?
                .into_iter()
                .filter(|lit| lit.is_positive())
                .map(|lit| lit.var())
                .collect();

            let chosen: BTreeMap<usize, Orientation> = self.choices.iter()
                .filter_map(|(index, options)| options.iter()
                    .find(|option| model.contains(&option.var))
                    .map(|option| (*index, *option)))
                .collect();

            let mut candidate = self.board.clone();
            candidate.apply_rotations(chosen.values().map(|option| (option.tile, option.rotation)));
            if is_solved(&candidate) {
                debug!(round, "found solving rotations");
                return Ok(candidate.rotations());
            }

            let islands = islands(&candidate, &links(&candidate));
            if islands.is_empty() {
                // locally valid with everything reached but still unsolved: an endpoint can never be reached
                return Err(SolverFailure::Inconsistent);
            }

            debug!(round, islands = islands.len(), "ruling out closed islands");
            for island in islands {
                let clause = island.iter()
                    .filter_map(|index| chosen.get(index))
                    .map(|option| option.var.negative())
                    .collect_vec();
                solver.add_clause(&clause);
            }
        }

        Err(SolverFailure::Exhausted)
    }
}

impl Board {
    /// Rotations of every movable tile that solve this board. See [`RotationSolver`].
    pub fn solution(&self) -> Result<Vec<(usize, u8)>, SolverFailure> {
        RotationSolver::from(self).solve()
    }

    /// The lowest-indexed tile whose mask differs from a solution, and how far to turn it.
    ///
    /// [`None`] if the board is already solved or cannot be solved.
    pub fn hint(&self) -> Option<Hint> {
        if self.is_solved() {
            return None;
        }

        self.solution().ok()?.into_iter().find_map(|(index, rotation)| {
            let tile = self.tile(index)?;
            let wanted = tile.base_mask().rotate(rotation as i32);
            (1..QUARTER_TURNS)
                .find(|turns| tile.current_mask().rotate(*turns as i32) == wanted)
                .filter(|_| tile.current_mask() != wanted)
                .map(|turns| Hint { index, turns })
        })
    }
}
