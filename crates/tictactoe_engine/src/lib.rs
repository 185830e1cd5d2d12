//! Tic-tac-toe game engine.
//!
//! A 3x3 tic-tac-toe engine with an optional computer opponent that plays
//! optimally. The crate is a library for a UI layer: it owns the game state
//! and the rules, the UI renders [`Snapshot`]s and forwards input.
//!
//! # Architecture
//!
//! - **Rules**: [`evaluate`] detects wins and draws on a [`Board`].
//! - **Search**: [`search`] runs a full-depth minimax to pick the computer's move.
//! - **Session**: [`GameSession`] sequences moves, restarts and the score tally.
//! - **Scheduler**: [`schedule_computer_move`] applies the computer's move after
//!   a delay and drops it if the session changed in the meantime.
//!
//! # Example
//!
//! ```
//! use tictactoe_engine::{GameSession, Mark, PlayMode};
//!
//! let mut session = GameSession::new(PlayMode::HumanVsComputer);
//! session.apply_move(0).unwrap();
//! assert!(session.is_computer_turn());
//! session.request_computer_move().unwrap();
//! assert_eq!(session.board().get(4).and_then(|c| c.mark()), Some(Mark::O));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod position;
mod rules;
mod scheduler;
mod search;
mod session;
mod types;

// Crate-level exports - Configuration
pub use config::EngineConfig;

// Crate-level exports - Errors
pub use error::{ConfigError, EngineError};

// Crate-level exports - Board types
pub use position::Position;
pub use types::{Board, CELL_COUNT, Cell, Mark};

// Crate-level exports - Rules
pub use rules::{Line, Outcome, check_winner, evaluate, is_draw, is_full};

// Crate-level exports - Search
pub use search::{DRAWN, O_WINS, SearchResult, X_WINS, search};

// Crate-level exports - Session
pub use session::{
    ComputerTurn, GameSession, PendingMove, PlayMode, Players, Score, Snapshot, Status,
};

// Crate-level exports - Scheduling
pub use scheduler::{
    ScheduledMove, SharedSession, schedule_computer_move, schedule_computer_move_after, shared,
};
