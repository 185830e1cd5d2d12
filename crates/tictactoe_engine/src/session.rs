//! Game session state machine.
//!
//! A [`GameSession`] owns the board, the turn, the outcome and the score
//! tally. The presentation layer drives it through [`GameSession::apply_move`],
//! [`GameSession::restart`], [`GameSession::set_mode`] and the computer move
//! operations, and renders [`GameSession::snapshot`].

use std::time::Duration;

use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::rules::{Outcome, evaluate};
use crate::search::search;
use crate::types::{Board, CELL_COUNT, Mark};

/// Who plays the two marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum PlayMode {
    /// Two humans share the board.
    #[default]
    #[serde(rename = "user")]
    #[display("2 Players")]
    HumanVsHuman,
    /// One human against the computer.
    #[serde(rename = "cpu")]
    #[display("Play vs CPU")]
    HumanVsComputer,
}

/// Wins per mark. Survives restarts and mode changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    /// Games won by X.
    pub x: u32,
    /// Games won by O.
    pub o: u32,
}

impl Score {
    /// Wins recorded for `mark`.
    pub fn get(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    fn record_win(&mut self, mark: Mark) {
        match mark {
            Mark::X => self.x += 1,
            Mark::O => self.o += 1,
        }
    }
}

/// Display names of the two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    /// Name of the player holding X.
    pub x: String,
    /// Name of the player holding O.
    pub o: String,
}

/// One-line game status for display.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Status {
    /// The named player won.
    #[display("Winner: {}", _0)]
    Winner(String),
    /// The board filled up without a line.
    #[display("It's a draw!")]
    Draw,
    /// The named player moves next.
    #[display("Next player: {}", _0)]
    NextPlayer(String),
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current board.
    board: Board,
    /// Mark to move next.
    turn: Mark,
    /// Outcome of the current board.
    outcome: Outcome,
    /// Score tally.
    score: Score,
    /// Play mode.
    mode: PlayMode,
    /// Effective display names (the computer's name replaces its mark's
    /// player name in [`PlayMode::HumanVsComputer`]).
    players: Players,
    /// Session generation the snapshot was taken at.
    generation: u64,
}

/// A validated computer move request, detached from the session.
///
/// Holds an owned board snapshot so the search can run without access to the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputerTurn {
    board: Board,
    mark: Mark,
    generation: u64,
}

impl ComputerTurn {
    /// Generation the request was taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs the search and returns the move to commit.
    #[instrument(skip(self), fields(generation = self.generation, mark = %self.mark))]
    pub fn plan(self) -> Result<PendingMove, EngineError> {
        let result = search(&self.board, self.mark);
        let index = result.best_move.ok_or_else(|| {
            EngineError::InvariantViolation(
                "search found no move on an in-progress board".to_string(),
            )
        })?;
        debug!(index, value = result.value, "Computer move planned");
        Ok(PendingMove {
            index,
            mark: self.mark,
            value: result.value,
            generation: self.generation,
        })
    }
}

/// A computer move waiting to be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PendingMove {
    /// Cell to play.
    index: usize,
    /// Mark the move is for.
    mark: Mark,
    /// Search value of the position.
    value: i8,
    /// Session generation the move was planned against.
    generation: u64,
}

/// A tic-tac-toe session.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    turn: Mark,
    outcome: Outcome,
    score: Score,
    mode: PlayMode,
    players: Players,
    computer_mark: Mark,
    computer_name: String,
    computer_delay: Duration,
    generation: u64,
    history: Vec<usize>,
}

impl GameSession {
    /// Creates a session in the given mode with default settings.
    #[instrument]
    pub fn new(mode: PlayMode) -> Self {
        Self::with_config(&EngineConfig::default().with_mode(mode))
    }

    /// Creates a session from configuration.
    #[instrument(skip(config), fields(mode = ?config.mode()))]
    pub fn with_config(config: &EngineConfig) -> Self {
        info!(computer_mark = %config.computer_mark(), "Creating new game session");
        Self {
            board: Board::new(),
            turn: Mark::X,
            outcome: Outcome::InProgress,
            score: Score::default(),
            mode: *config.mode(),
            players: Players {
                x: config.player_x_name().clone(),
                o: config.player_o_name().clone(),
            },
            computer_mark: *config.computer_mark(),
            computer_name: config.computer_name().clone(),
            computer_delay: config.computer_delay(),
            generation: 0,
            history: Vec::new(),
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark to move next.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Outcome of the current board.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Score tally.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Play mode.
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Mark the computer plays in [`PlayMode::HumanVsComputer`].
    pub fn computer_mark(&self) -> Mark {
        self.computer_mark
    }

    /// Configured pause before a scheduled computer move is applied.
    pub fn computer_delay(&self) -> Duration {
        self.computer_delay
    }

    /// Version counter. Bumped by every applied move, restart and mode
    /// change; a pending computer move is only committed against the
    /// generation it was planned at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cells played since the last restart, in order.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Player names as entered, ignoring the computer's name.
    pub fn players(&self) -> &Players {
        &self.players
    }

    /// Renames both players.
    #[instrument(skip(self, x, o))]
    pub fn set_player_names(&mut self, x: impl Into<String>, o: impl Into<String>) {
        self.players = Players {
            x: x.into(),
            o: o.into(),
        };
        debug!(x = %self.players.x, o = %self.players.o, "Player names updated");
    }

    /// Name shown for `mark`.
    pub fn display_name(&self, mark: Mark) -> &str {
        if self.mode == PlayMode::HumanVsComputer && mark == self.computer_mark {
            return &self.computer_name;
        }
        match mark {
            Mark::X => &self.players.x,
            Mark::O => &self.players.o,
        }
    }

    /// Status line for the current state.
    pub fn status(&self) -> Status {
        match self.outcome {
            Outcome::Won { mark, .. } => Status::Winner(self.display_name(mark).to_string()),
            Outcome::Draw => Status::Draw,
            Outcome::InProgress => Status::NextPlayer(self.display_name(self.turn).to_string()),
        }
    }

    /// True when the computer should move next.
    pub fn is_computer_turn(&self) -> bool {
        self.mode == PlayMode::HumanVsComputer
            && self.outcome == Outcome::InProgress
            && self.turn == self.computer_mark
    }

    /// Places the current turn's mark at `index`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::IndexOutOfRange`] if `index > 8`, even after the game
    ///   has ended.
    /// - [`EngineError::GameOver`] if the game has already ended.
    /// - [`EngineError::InvalidMove`] if the cell is occupied.
    ///
    /// The session is unchanged on error.
    #[instrument(skip(self), fields(turn = %self.turn, generation = self.generation))]
    pub fn apply_move(&mut self, index: usize) -> Result<Outcome, EngineError> {
        if index >= CELL_COUNT {
            warn!("Move rejected, index out of range");
            return Err(EngineError::IndexOutOfRange(index));
        }
        if self.outcome.is_terminal() {
            debug!(outcome = ?self.outcome, "Move rejected, game is over");
            return Err(EngineError::GameOver);
        }

        let mark = self.turn;
        self.board.place(index, mark)?;
        self.history.push(index);
        self.turn = mark.opponent();
        self.generation += 1;
        debug_assert!(self.board.is_consistent(), "marks must alternate starting with X");

        let previous = self.outcome;
        self.outcome = evaluate(&self.board);
        match self.outcome {
            Outcome::Won { mark, line } if previous == Outcome::InProgress => {
                self.score.record_win(mark);
                info!(winner = %mark, ?line, score_x = self.score.x, score_o = self.score.o, "Game won");
            }
            Outcome::Draw => info!("Game drawn"),
            _ => debug!(index, %mark, "Move applied"),
        }

        Ok(self.outcome)
    }

    /// Clears the board for a new game. The score tally is kept.
    ///
    /// Invalidates any pending computer move.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn restart(&mut self) {
        self.board = Board::new();
        self.turn = Mark::X;
        self.outcome = Outcome::InProgress;
        self.history.clear();
        self.generation += 1;
        info!(generation = self.generation, "Game restarted");
    }

    /// Switches play mode and restarts.
    #[instrument(skip(self), fields(from = ?self.mode))]
    pub fn set_mode(&mut self, mode: PlayMode) {
        info!(to = ?mode, "Play mode changed");
        self.mode = mode;
        self.restart();
    }

    /// Validates a computer move request and captures the board to search.
    ///
    /// # Errors
    ///
    /// [`EngineError::IllegalComputerRequest`] unless the mode is
    /// [`PlayMode::HumanVsComputer`], the game is in progress and the
    /// computer's mark is to move.
    #[instrument(skip(self), fields(mode = ?self.mode, turn = %self.turn))]
    pub fn prepare_computer_turn(&self) -> Result<ComputerTurn, EngineError> {
        if self.mode != PlayMode::HumanVsComputer {
            warn!("Computer move requested outside computer mode");
            return Err(EngineError::IllegalComputerRequest(
                "session is not in computer mode".to_string(),
            ));
        }
        if self.outcome.is_terminal() {
            warn!(outcome = ?self.outcome, "Computer move requested after game end");
            return Err(EngineError::IllegalComputerRequest(
                "game is already over".to_string(),
            ));
        }
        if self.turn != self.computer_mark {
            warn!(computer_mark = %self.computer_mark, "Computer move requested on human turn");
            return Err(EngineError::IllegalComputerRequest(format!(
                "it is {}'s turn, the computer plays {}",
                self.turn, self.computer_mark
            )));
        }

        Ok(ComputerTurn {
            board: self.board,
            mark: self.turn,
            generation: self.generation,
        })
    }

    /// Searches for the computer's move without applying it.
    pub fn plan_computer_move(&self) -> Result<PendingMove, EngineError> {
        self.prepare_computer_turn()?.plan()
    }

    /// Applies a planned computer move if the session has not changed since.
    ///
    /// # Errors
    ///
    /// [`EngineError::StaleComputerMove`] if any move, restart or mode change
    /// happened after planning; the move is discarded.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn commit_computer_move(&mut self, pending: PendingMove) -> Result<Outcome, EngineError> {
        if pending.generation != self.generation {
            warn!(
                planned = pending.generation,
                current = self.generation,
                index = pending.index,
                "Discarding stale computer move"
            );
            return Err(EngineError::StaleComputerMove {
                planned: pending.generation,
                current: self.generation,
            });
        }
        if pending.mark != self.turn {
            return Err(EngineError::InvariantViolation(format!(
                "pending move for {} but {} is to move",
                pending.mark, self.turn
            )));
        }

        self.apply_move(pending.index)
    }

    /// Searches for and immediately applies the computer's move.
    #[instrument(skip(self))]
    pub fn request_computer_move(&mut self) -> Result<Outcome, EngineError> {
        let pending = self.plan_computer_move()?;
        self.commit_computer_move(pending)
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            turn: self.turn,
            outcome: self.outcome,
            score: self.score,
            mode: self.mode,
            players: Players {
                x: self.display_name(Mark::X).to_string(),
                o: self.display_name(Mark::O).to_string(),
            },
            generation: self.generation,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(PlayMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Line;

    fn play(session: &mut GameSession, moves: &[usize]) {
        for &index in moves {
            session.apply_move(index).unwrap();
        }
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new(PlayMode::HumanVsHuman);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.turn(), Mark::X);
        assert_eq!(session.outcome(), Outcome::InProgress);
        assert_eq!(session.score(), Score::default());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_apply_move_alternates() {
        let mut session = GameSession::default();
        assert_eq!(session.apply_move(4), Ok(Outcome::InProgress));
        assert_eq!(session.turn(), Mark::O);
        assert_eq!(session.apply_move(0), Ok(Outcome::InProgress));
        assert_eq!(session.turn(), Mark::X);
        assert_eq!(session.history(), &[4, 0]);
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut session = GameSession::default();
        session.apply_move(4).unwrap();
        let before = session.snapshot();
        assert_eq!(session.apply_move(4), Err(EngineError::InvalidMove(4)));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut session = GameSession::default();
        assert_eq!(session.apply_move(9), Err(EngineError::IndexOutOfRange(9)));
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_win_scores_once() {
        let mut session = GameSession::default();
        play(&mut session, &[0, 3, 1, 4]);
        let outcome = session.apply_move(2).unwrap();
        assert_eq!(
            outcome,
            Outcome::Won {
                mark: Mark::X,
                line: Line::TopRow
            }
        );
        assert_eq!(session.score().get(Mark::X), 1);

        assert_eq!(session.apply_move(5), Err(EngineError::GameOver));
        assert_eq!(session.score().get(Mark::X), 1);
        assert_eq!(session.score().get(Mark::O), 0);
    }

    #[test]
    fn test_draw_does_not_score() {
        let mut session = GameSession::default();
        // X O X / X O O / O X X
        play(&mut session, &[0, 1, 2, 4, 3, 5, 7, 6]);
        assert_eq!(session.apply_move(8), Ok(Outcome::Draw));
        assert_eq!(session.score(), Score::default());
        assert_eq!(session.status(), Status::Draw);
    }

    #[test]
    fn test_restart_keeps_score() {
        let mut session = GameSession::default();
        play(&mut session, &[0, 3, 1, 4, 2]);
        session.restart();
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.turn(), Mark::X);
        assert_eq!(session.outcome(), Outcome::InProgress);
        assert!(session.history().is_empty());
        assert_eq!(session.score().x, 1);
    }

    #[test]
    fn test_set_mode_restarts() {
        let mut session = GameSession::default();
        play(&mut session, &[4, 0, 8]);
        session.set_mode(PlayMode::HumanVsComputer);
        assert_eq!(session.mode(), PlayMode::HumanVsComputer);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_computer_request_preconditions() {
        let mut session = GameSession::new(PlayMode::HumanVsHuman);
        session.apply_move(0).unwrap();
        assert!(matches!(
            session.request_computer_move(),
            Err(EngineError::IllegalComputerRequest(_))
        ));

        let mut session = GameSession::new(PlayMode::HumanVsComputer);
        assert!(matches!(
            session.request_computer_move(),
            Err(EngineError::IllegalComputerRequest(_))
        ));
    }

    #[test]
    fn test_computer_answers_corner_with_center() {
        let mut session = GameSession::new(PlayMode::HumanVsComputer);
        session.apply_move(0).unwrap();
        assert!(session.is_computer_turn());
        session.request_computer_move().unwrap();
        assert_eq!(session.history(), &[0, 4]);
        assert!(!session.is_computer_turn());
    }

    #[test]
    fn test_stale_move_discarded() {
        let mut session = GameSession::new(PlayMode::HumanVsComputer);
        session.apply_move(0).unwrap();
        let pending = session.plan_computer_move().unwrap();
        session.restart();
        assert_eq!(
            session.commit_computer_move(pending),
            Err(EngineError::StaleComputerMove {
                planned: 1,
                current: 2
            })
        );
        assert_eq!(session.board(), &Board::new());
    }

    #[test]
    fn test_display_names_and_status() {
        let mut session = GameSession::new(PlayMode::HumanVsComputer);
        session.set_player_names("Ada", "Grace");
        assert_eq!(session.display_name(Mark::X), "Ada");
        assert_eq!(session.display_name(Mark::O), "CPU");
        assert_eq!(session.status().to_string(), "Next player: Ada");

        session.set_mode(PlayMode::HumanVsHuman);
        assert_eq!(session.display_name(Mark::O), "Grace");
        play(&mut session, &[0, 3, 1, 4, 2]);
        assert_eq!(session.status().to_string(), "Winner: Ada");
    }

    #[test]
    fn test_score_survives_restart_and_mode_change() {
        let mut session = GameSession::default();
        play(&mut session, &[0, 3, 1, 4, 2]);
        let won = Score { x: 1, o: 0 };
        assert_eq!(session.score(), won);

        session.restart();
        assert_eq!(session.score(), won);
        session.set_mode(PlayMode::HumanVsComputer);
        assert_eq!(session.score(), won);
        session.set_mode(PlayMode::HumanVsHuman);
        assert_eq!(session.score(), won);
    }
}
