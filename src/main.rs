//! Noughts - terminal front-end
//!
//! Renders controller snapshots to stdout and feeds typed commands back in.
//! Everything here is presentation; the game itself lives in the library.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use noughts::{
    AiBackend, AiConfig, ControllerState, Difficulty, EventKind, GameController, GameEvent,
    GameMode,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "Commands: <row> <col> (0-2) to move, n = new game, \
mode <vs-ai|two-player>, difficulty <Easy|Medium|Hard>, q = quit";

/// A parsed line of input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Move(usize, usize),
    NewGame,
    Mode(GameMode),
    Difficulty(Difficulty),
    Quit,
    Unknown,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => AiConfig::from_file(path)?,
        None => AiConfig::default(),
    };
    if cli.local {
        config = config.with_backend(AiBackend::Local);
    }

    let provider = match config.build_provider() {
        Ok(provider) => Some(provider),
        Err(e) => {
            warn!(error = %e, "AI opponent unavailable");
            None
        }
    };

    let mut controller = GameController::new(provider)
        .with_ai_delay(config.ai_delay())
        .with_ai_mark(*config.ai_mark());
    controller.set_mode(cli.mode.into());
    controller.set_difficulty(cli.difficulty.into());

    let presenter = tokio::spawn(present(controller.subscribe()));

    println!("{}", HELP);
    start_game(&mut controller).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::NewGame => start_game(&mut controller).await,
            Command::Mode(mode) => {
                controller.set_mode(mode);
                println!("Mode set to {}. Press n to start.", mode);
            }
            Command::Difficulty(difficulty) => {
                controller.set_difficulty(difficulty);
                println!("Difficulty set to {}. Press n to start.", difficulty);
            }
            Command::Move(row, col) => {
                if controller.submit_move(row, col) {
                    drive_ai(&mut controller).await;
                }
            }
            Command::Unknown => println!("{}", HELP),
        }
    }

    info!("Shutting down");
    drop(controller);
    presenter.await?;
    Ok(())
}

/// Starts a game, reporting configuration problems to the player.
async fn start_game(controller: &mut GameController) {
    match controller.new_game() {
        Ok(()) => drive_ai(controller).await,
        Err(e) => {
            println!("Cannot start a game against the AI: {}", e);
            println!("Set the API key in .env, pass --local, or switch to two-player mode.");
        }
    }
}

/// Lets the AI move for as long as it holds the turn.
async fn drive_ai(controller: &mut GameController) {
    while controller.state() == ControllerState::AwaitingAiMove {
        controller.play_ai_turn().await;
    }
}

/// Renders every transition; stands in for sound and haptics with the terminal bell.
#[instrument(skip(events))]
async fn present(mut events: broadcast::Receiver<GameEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => render(&event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Presenter fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn render(event: &GameEvent) {
    match &event.kind {
        EventKind::AiThinking => {
            println!("{}", event.snapshot.status);
            return;
        }
        EventKind::Won(info) => {
            let cells: Vec<String> = info.line.iter().map(ToString::to_string).collect();
            println!("\x07Winning line ({:?}): {}", info.direction, cells.join(" "));
        }
        EventKind::Draw => print!("\x07"),
        EventKind::AiError(message) => println!("AI trouble: {}", message),
        EventKind::NewGame | EventKind::MoveAccepted { .. } => {}
    }
    println!("\n{}\n\n{}", event.snapshot.board, event.snapshot.status);
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "q" | "quit" | "exit" => return Command::Quit,
        "n" | "new" => return Command::NewGame,
        _ => {}
    }

    if let Some((word, arg)) = line.split_once(' ') {
        match word {
            "mode" => {
                return arg.trim().parse().map_or(Command::Unknown, Command::Mode);
            }
            "difficulty" => {
                return arg.trim().parse().map_or(Command::Unknown, Command::Difficulty);
            }
            _ => {}
        }
    }

    let numbers: Vec<usize> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    match numbers.as_slice() {
        [row, col] => Command::Move(*row, *col),
        _ => Command::Unknown,
    }
}
