//! Shared helpers for integration tests.

#![allow(dead_code)]

use tictactoe_engine::{GameSession, Mark, Outcome};

/// Installs a tracing subscriber for test output; repeated calls are harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Plays the given cells in order, panicking on the first rejected move.
pub fn play(session: &mut GameSession, moves: &[usize]) -> Outcome {
    let mut outcome = session.outcome();
    for &index in moves {
        outcome = session
            .apply_move(index)
            .unwrap_or_else(|e| panic!("move {} rejected: {}", index, e));
    }
    outcome
}

/// Marks on the board as a 9-character string, `.` for empty cells.
pub fn render(session: &GameSession) -> String {
    session
        .board()
        .cells()
        .iter()
        .map(|cell| cell.mark().map_or(".", Mark::symbol))
        .collect()
}
