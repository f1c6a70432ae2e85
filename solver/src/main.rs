use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use solder::{generator, levels, Board, LevelDescriptor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scramble a level and let the rotation solver put it back together.
#[derive(Parser)]
struct Args {
    /// Campaign level to load, counting from 1.
    #[arg(short, long, default_value_t = 1, conflicts_with = "endless")]
    level: usize,
    /// Generate a board of this side length instead of loading a campaign level.
    #[arg(short, long)]
    endless: Option<usize>,
    /// Seed for scrambling and generation.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solder=info,solver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let level: LevelDescriptor = match args.endless {
        Some(size) => match generator::generate(size, &mut rng) {
            Ok(level) => level,
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => match levels::level(args.level) {
            Some(level) => level,
            None => {
                tracing::error!("no campaign level {}; there are {}", args.level, levels::len());
                return ExitCode::FAILURE;
            }
        },
    };

    let mut board = match Board::new(&level.data) {
        Ok(board) => board,
        Err(e) => {
            tracing::error!("{}: {e}", level.name);
            return ExitCode::FAILURE;
        }
    };

    board.scramble(&mut rng);
    tracing::info!(name = %level.name, difficulty = ?level.difficulty, par = level.move_budget, "loaded level");
    println!("{}", board);

    match board.solution() {
        Ok(rotations) => {
            board.apply_rotations(rotations);
            println!("{}", board);
            let order = board.solve_order().unwrap_or_default();
            tracing::info!(tiles = order.len(), "solved");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            tracing::error!(?failure, "no solution");
            ExitCode::FAILURE
        }
    }
}
