//! Error types for the engine.

use derive_more::{Display, Error};
use tracing::instrument;

/// Error returned by session operations.
///
/// No variant leaves the session in a modified state.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum EngineError {
    /// The cell is already occupied.
    #[display("Cell {} is already occupied", _0)]
    InvalidMove(usize),

    /// A move was attempted after the game ended.
    #[display("Game is already over")]
    GameOver,

    /// The index is outside 0-8.
    #[display("Cell index {} is out of range (must be 0-8)", _0)]
    IndexOutOfRange(usize),

    /// A computer move was requested when the computer may not move.
    #[display("Illegal computer move request: {}", _0)]
    IllegalComputerRequest(String),

    /// A planned computer move outlived the game it was planned for.
    #[display(
        "Computer move planned for generation {} discarded (session is at generation {})",
        planned,
        current
    )]
    StaleComputerMove {
        /// Generation the move was planned against.
        planned: u64,
        /// Generation of the session at commit time.
        current: u64,
    },

    /// A scheduled computer move was cancelled before it was applied.
    #[display("Computer move was cancelled")]
    ComputerMoveCancelled,

    /// A board string could not be parsed.
    #[display("Invalid board: {}", _0)]
    InvalidBoard(String),

    /// The engine detected an internal consistency violation.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// True for both flavours of an invalid move: occupied cell or finished game.
    pub fn is_invalid_move(&self) -> bool {
        matches!(self, EngineError::InvalidMove(_) | EngineError::GameOver)
    }

    /// True for errors a UI should swallow silently: stray clicks and
    /// computer moves dropped by a restart, a mode change or `cancel`.
    /// Everything else is a caller contract violation.
    pub fn is_recoverable(&self) -> bool {
        self.is_invalid_move()
            || matches!(
                self,
                EngineError::StaleComputerMove { .. } | EngineError::ComputerMoveCancelled
            )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
