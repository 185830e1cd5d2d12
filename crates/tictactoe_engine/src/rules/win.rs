//! Win detection logic for tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::draw::is_full;
use crate::types::{Board, Cell, Mark};

/// One of the 8 winning lines.
///
/// Lines are checked in [`Line::ALL`] order: rows, then columns, then
/// diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    /// Cells 0, 1, 2.
    TopRow,
    /// Cells 3, 4, 5.
    MiddleRow,
    /// Cells 6, 7, 8.
    BottomRow,
    /// Cells 0, 3, 6.
    LeftColumn,
    /// Cells 1, 4, 7.
    CenterColumn,
    /// Cells 2, 5, 8.
    RightColumn,
    /// Cells 0, 4, 8.
    Diagonal,
    /// Cells 2, 4, 6.
    AntiDiagonal,
}

impl Line {
    /// All lines in detection order.
    pub const ALL: [Line; 8] = [
        Line::TopRow,
        Line::MiddleRow,
        Line::BottomRow,
        Line::LeftColumn,
        Line::CenterColumn,
        Line::RightColumn,
        Line::Diagonal,
        Line::AntiDiagonal,
    ];

    /// Board indices covered by this line.
    pub fn cells(self) -> [usize; 3] {
        match self {
            Line::TopRow => [0, 1, 2],
            Line::MiddleRow => [3, 4, 5],
            Line::BottomRow => [6, 7, 8],
            Line::LeftColumn => [0, 3, 6],
            Line::CenterColumn => [1, 4, 7],
            Line::RightColumn => [2, 5, 8],
            Line::Diagonal => [0, 4, 8],
            Line::AntiDiagonal => [2, 4, 6],
        }
    }

    /// Whether the line passes through `index`.
    pub fn contains(self, index: usize) -> bool {
        self.cells().contains(&index)
    }

    /// The mark filling all three cells, if any.
    fn owner(self, board: &Board) -> Option<Mark> {
        let [a, b, c] = self.cells();
        match board.get(a)? {
            Cell::Marked(mark)
                if board.get(b) == Some(Cell::Marked(mark))
                    && board.get(c) == Some(Cell::Marked(mark)) =>
            {
                Some(mark)
            }
            _ => None,
        }
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// No line is complete and empty cells remain.
    InProgress,
    /// A line is complete.
    Won {
        /// The winning mark.
        mark: Mark,
        /// The first complete line in detection order.
        line: Line,
    },
    /// The board is full and no line is complete.
    Draw,
}

impl Outcome {
    /// Terminal outcomes accept no further moves.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// The winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::Won { mark, .. } => Some(mark),
            _ => None,
        }
    }

    /// The winning line, if any.
    pub fn winning_line(self) -> Option<Line> {
        match self {
            Outcome::Won { line, .. } => Some(line),
            _ => None,
        }
    }
}

/// Evaluates the board.
///
/// Returns `Won` for the first complete line in [`Line::ALL`] order, `Draw`
/// for a full board without a complete line, and `InProgress` otherwise.
pub fn evaluate(board: &Board) -> Outcome {
    for line in Line::ALL {
        if let Some(mark) = line.owner(board) {
            return Outcome::Won { mark, line };
        }
    }

    if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

/// Checks if there is a winner on the board.
#[instrument]
pub fn check_winner(board: &Board) -> Option<Mark> {
    evaluate(board).winner()
}
