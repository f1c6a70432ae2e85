//! The authored campaign.
//!
//! Layouts use the glyphs of [`LevelBuilder::from_layout`]. Each is drawn at its solved orientation; boards built
//! from them are meant to be scrambled before play.

use std::time::Duration;

use itertools::Itertools;

use crate::builder::LevelBuilder;
use crate::level::{Difficulty, LevelDescriptor};

/// Countdown every campaign level starts from.
pub const BASE_TIME: Duration = Duration::from_secs(60);

struct Authored {
    name: &'static str,
    difficulty: Difficulty,
    par_moves: u32,
    layout: &'static [&'static str],
}

const CAMPAIGN: &[Authored] = &[
    Authored {
        name: "Tutorial Link",
        difficulty: Difficulty::Easy,
        par_moves: 4,
        layout: &[
            ".....",
            "..S..",
            "..|..",
            "..T..",
            ".....",
        ],
    },
    Authored {
        name: "Offset Signal",
        difficulty: Difficulty::Easy,
        par_moves: 8,
        layout: &[
            ".....",
            ".S...",
            ".L-J.",
            "...T.",
            ".....",
        ],
    },
    Authored {
        name: "Twisted Loop",
        difficulty: Difficulty::Medium,
        par_moves: 12,
        layout: &[
            "..S..",
            "..|..",
            "..L-J",
            "....|",
            "....T",
        ],
    },
    Authored {
        name: "Crossed Paths",
        difficulty: Difficulty::Medium,
        par_moves: 16,
        layout: &[
            ".S....",
            ".|....",
            ".L-J..",
            "...|..",
            "...|..",
            "...T..",
        ],
    },
    Authored {
        name: "Signal Maze",
        difficulty: Difficulty::Medium,
        par_moves: 18,
        layout: &[
            "..S...",
            "..|...",
            "..L--J",
            ".....|",
            "...R-7",
            "...T..",
        ],
    },
    Authored {
        name: "Long Circuit",
        difficulty: Difficulty::Hard,
        par_moves: 22,
        layout: &[
            "...S...",
            "...|...",
            "...L--J",
            "......|",
            "......|",
            "...R--7",
            "...T...",
        ],
    },
    Authored {
        name: "Deep Access",
        difficulty: Difficulty::Hard,
        par_moves: 26,
        layout: &[
            ".S.....",
            ".|.....",
            ".L--J..",
            "....|..",
            "....L-J",
            "......|",
            "......T",
        ],
    },
    Authored {
        name: "Twin Feed",
        difficulty: Difficulty::Hard,
        par_moves: 24,
        layout: &[
            "S...S",
            "|...|",
            "L-J.|",
            "..|.|",
            "..T.T",
        ],
    },
];

impl Authored {
    fn descriptor(&self) -> LevelDescriptor {
        LevelDescriptor {
            name: self.name.to_string(),
            difficulty: self.difficulty,
            time_budget: BASE_TIME,
            move_budget: self.par_moves,
            data: LevelBuilder::from_layout(self.layout)
                .build()
                .expect("campaign layouts are well formed"),
        }
    }
}

/// Number of campaign levels.
pub fn len() -> usize {
    CAMPAIGN.len()
}

/// Every campaign level, in play order.
pub fn campaign() -> Vec<LevelDescriptor> {
    CAMPAIGN.iter().map(Authored::descriptor).collect_vec()
}

/// Campaign level `number`, counting from 1.
pub fn level(number: usize) -> Option<LevelDescriptor> {
    number.checked_sub(1)
        .and_then(|index| CAMPAIGN.get(index))
        .map(Authored::descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_count_from_one() {
        assert_eq!(level(0), None);
        assert_eq!(level(len() + 1), None);
        assert_eq!(level(1).map(|level| level.name), Some("Tutorial Link".to_string()));
        assert_eq!(level(len()), campaign().pop());
        for number in 1..=len() {
            assert_eq!(level(number).as_ref(), campaign().get(number - 1));
        }
    }
}
