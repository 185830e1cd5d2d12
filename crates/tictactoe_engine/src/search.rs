//! Full-depth minimax search.
//!
//! Values are absolute: an O win scores +1, an X win -1 and a draw 0. O
//! maximizes and X minimizes, so the same search picks moves for either mark.
//!
//! Children are visited in ascending cell order and a move only replaces the
//! current best on strict improvement, so ties go to the lowest index. There
//! is no pruning; the tree is small enough to walk completely.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::rules::{Outcome, evaluate};
use crate::types::{Board, Mark};

/// Value of a position won by O.
pub const O_WINS: i8 = 1;
/// Value of a position won by X.
pub const X_WINS: i8 = -1;
/// Value of a drawn position.
pub const DRAWN: i8 = 0;

/// Result of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Game-theoretic value of the position under optimal play.
    pub value: i8,
    /// Best move, `None` when the board is already terminal.
    pub best_move: Option<usize>,
}

impl SearchResult {
    fn terminal(value: i8) -> Self {
        Self {
            value,
            best_move: None,
        }
    }
}

/// Searches the position and returns its value and the best move for `to_move`.
#[instrument(skip(board), fields(empty = board.empty_cells().count()))]
pub fn search(board: &Board, to_move: Mark) -> SearchResult {
    let result = minimax(*board, to_move);
    debug!(value = result.value, best_move = ?result.best_move, "Search complete");
    result
}

fn minimax(board: Board, to_move: Mark) -> SearchResult {
    match evaluate(&board) {
        Outcome::Won { mark: Mark::O, .. } => return SearchResult::terminal(O_WINS),
        Outcome::Won { mark: Mark::X, .. } => return SearchResult::terminal(X_WINS),
        Outcome::Draw => return SearchResult::terminal(DRAWN),
        Outcome::InProgress => {}
    }

    let mut best: Option<(i8, usize)> = None;
    for index in board.empty_cells() {
        let child = minimax(board.with_mark(index, to_move), to_move.opponent()).value;
        let improves = match best {
            None => true,
            Some((value, _)) => match to_move {
                Mark::O => child > value,
                Mark::X => child < value,
            },
        };
        if improves {
            best = Some((child, index));
        }
    }

    match best {
        Some((value, index)) => SearchResult {
            value,
            best_move: Some(index),
        },
        // InProgress always has an empty cell; a board reporting otherwise
        // is scored as drawn.
        None => SearchResult::terminal(DRAWN),
    }
}
