//! Ratings derived from caller-owned signals. Nothing here influences solvability.

use std::time::Duration;

use crate::level::LevelDescriptor;

/// Stars for a solved attempt, `1..=3`.
///
/// Three stars need par moves and at most half the time budget; two need either one of those, or both within 1.5x
/// par and the full budget. Anything else that still solved the board earns one.
pub fn stars(level: &LevelDescriptor, moves: u32, elapsed: Duration) -> u8 {
    let par_moves = moves <= level.move_budget;
    let quick = elapsed <= level.time_budget / 2;
    let near_par = moves.saturating_mul(2) <= level.move_budget.saturating_mul(3);
    let in_time = elapsed <= level.time_budget;

    match (par_moves && quick, par_moves || quick || (near_par && in_time)) {
        (true, _) => 3,
        (false, true) => 2,
        (false, false) => 1,
    }
}

/// Time left on the caller's countdown; zero once the budget is spent.
pub fn time_remaining(level: &LevelDescriptor, elapsed: Duration) -> Duration {
    level.time_budget.saturating_sub(elapsed)
}
