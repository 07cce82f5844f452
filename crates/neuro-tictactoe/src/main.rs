//! Tic-tac-toe against Neuro
//!
//! The player is X and moves from stdin; Neuro is O and is forced to pick a cell through
//! the `move` action. Pass the agent's WebSocket URL as the first argument or set
//! `NEURO_SDK_WS_URL`.

mod board;

use anyhow::{Result, anyhow, bail};
use board::{Board, Mark, Outcome};
use neuro_sdk::{
    ActionDefinition, ActionResult, ActionsForce, ContextUpdate, CreateFlags, Message, Session,
    SessionConfig,
};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

const GAME_NAME: &str = "TicTacToe";
const MOVE_ACTION: &str = "move";
const MOVE_QUERY: &str = "Your move. Choose an empty cell index (0-8).";
const MOVE_SCHEMA: &str = r#"{"type": "integer", "minimum": 0, "maximum": 8}"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stdout)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = SessionConfig::new(GAME_NAME)
        .with_poll_interval(Duration::from_millis(1000))
        .with_flags(CreateFlags {
            debug_prints: false,
            validation_layers: true,
        });
    if let Some(url) = std::env::args().nth(1) {
        config = config.with_url(url);
    }

    let mut session = Session::create(config)
        .await
        .map_err(|e| anyhow!("Failed to create Neuro session: {}", e))?;
    info!("Connected to Neuro (neuro-sdk {})", neuro_sdk::VERSION);

    session.send(&Message::Startup)?;
    session.send(&Message::ActionsRegister(vec![
        ActionDefinition::new(MOVE_ACTION)
            .with_description(MOVE_QUERY)
            .with_schema(MOVE_SCHEMA),
    ]))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut board = Board::new();
    let mut turn = Mark::Player;

    let outcome = loop {
        println!("\n{}", board);
        match turn {
            Mark::Player => {
                print!("Your move (0-8): ");
                std::io::stdout().flush()?;
                let Some(line) = lines.next_line().await? else {
                    info!("stdin closed, leaving the game");
                    break None;
                };
                let Some(cell) = parse_move(&line) else {
                    println!("Invalid input. Try again.");
                    continue;
                };
                if !board.place(cell, Mark::Player) {
                    println!("Invalid move. Try again.");
                    continue;
                }
                session.send(&Message::Context(ContextUpdate::silent(format!(
                    "The player took cell {}.",
                    cell
                ))))?;
            }
            Mark::Neuro => neuro_turn(&mut session, &mut board).await?,
        }

        if let Some(outcome) = board.outcome() {
            break Some(outcome);
        }
        turn = match turn {
            Mark::Player => Mark::Neuro,
            Mark::Neuro => Mark::Player,
        };
    };

    if let Some(outcome) = outcome {
        println!("\n{}", board);
        let summary = match outcome {
            Outcome::Winner(Mark::Player) => "You win!",
            Outcome::Winner(Mark::Neuro) => "Neuro wins!",
            Outcome::Draw => "It's a draw!",
        };
        println!("{}", summary);
        session.send(&Message::Context(ContextUpdate::new(format!(
            "Game over: {}",
            summary
        ))))?;
    }

    session.send(&Message::ActionsUnregister(vec![MOVE_ACTION.to_string()]))?;
    session.destroy().await?;
    info!("Disconnected from Neuro");
    Ok(())
}

/// Force Neuro to move and wait until it picks a legal cell
async fn neuro_turn(session: &mut Session, board: &mut Board) -> Result<()> {
    println!("Waiting for Neuro's move...");
    let force = ActionsForce::new(MOVE_QUERY, [MOVE_ACTION]).with_state(board.describe());
    session.send(&Message::ActionsForce(force))?;

    loop {
        let batch = session.poll().await;
        if let Some(e) = batch.error {
            if !session.connected() {
                bail!("Lost connection to Neuro: {}", e);
            }
            warn!("Error polling messages: {}", e);
        }

        for action in batch.into_iter().filter_map(Message::into_action) {
            if action.name != MOVE_ACTION {
                session.send(&Message::ActionResult(ActionResult::failure(
                    action.id,
                    format!("Unknown action '{}'.", action.name),
                )))?;
                continue;
            }

            match action.data.as_deref().and_then(parse_move) {
                Some(cell) if board.place(cell, Mark::Neuro) => {
                    session.send(&Message::ActionResult(
                        ActionResult::success(action.id).with_message("Move accepted."),
                    ))?;
                    return Ok(());
                }
                _ => {
                    session.send(&Message::ActionResult(ActionResult::failure(
                        action.id,
                        format!("Invalid move. Free cells: {:?}", board.free_cells()),
                    )))?;
                }
            }
        }
    }
}

/// Parse a cell index, accepting surrounding whitespace and JSON-style quotes
fn parse_move(input: &str) -> Option<usize> {
    let cell: usize = input.trim().trim_matches('"').parse().ok()?;
    (cell < 9).then_some(cell)
}
