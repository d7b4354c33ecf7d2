//! Command-line interface for the terminal front-end.

use clap::{Parser, ValueEnum};
use noughts::{Difficulty, GameMode};

/// Noughts - play tic-tac-toe against a friend or an AI
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe in the terminal, with a language-model opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Who plays
    #[arg(short, long, value_enum, default_value_t = ModeArg::VsAi)]
    pub mode: ModeArg,

    /// AI strength (vs-ai mode only)
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Hard)]
    pub difficulty: DifficultyArg,

    /// Path to an AI config TOML file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Use the local AI strategies instead of a remote model
    #[arg(long)]
    pub local: bool,
}

/// Game mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Human against the AI
    VsAi,
    /// Two humans at one keyboard
    TwoPlayer,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::VsAi => GameMode::VsAi,
            ModeArg::TwoPlayer => GameMode::TwoPlayer,
        }
    }
}

/// Difficulty flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    /// Random moves
    Easy,
    /// Wins and blocks
    Medium,
    /// Optimal play
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(difficulty: DifficultyArg) -> Self {
        match difficulty {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}
