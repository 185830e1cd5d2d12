//! Delayed computer moves.
//!
//! The computer's reply is planned right away and applied after a pause. A
//! restart, mode change or any other move during the pause bumps the
//! session generation, and the commit then discards the planned move instead
//! of applying it to a board it was not computed for.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, instrument};

use crate::error::EngineError;
use crate::rules::Outcome;
use crate::session::{GameSession, PendingMove};

/// Session handle shared between the presentation layer and scheduled moves.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Wraps a session for sharing with scheduled moves.
pub fn shared(session: GameSession) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// A computer move that will be committed after its delay.
#[derive(Debug)]
pub struct ScheduledMove {
    pending: PendingMove,
    handle: JoinHandle<Result<Outcome, EngineError>>,
}

impl ScheduledMove {
    /// Generation the move was planned against.
    pub fn generation(&self) -> u64 {
        *self.pending.generation()
    }

    /// Cell the computer will play.
    pub fn index(&self) -> usize {
        *self.pending.index()
    }

    /// Aborts the move if it has not been committed yet.
    pub fn cancel(&self) {
        debug!(generation = self.generation(), "Cancelling scheduled computer move");
        self.handle.abort();
    }

    /// Waits for the commit and returns its result.
    ///
    /// Resolves to [`EngineError::StaleComputerMove`] when the session moved
    /// on during the delay, and to [`EngineError::ComputerMoveCancelled`]
    /// after [`ScheduledMove::cancel`].
    pub async fn wait(self) -> Result<Outcome, EngineError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(EngineError::ComputerMoveCancelled),
            Err(e) => Err(EngineError::InvariantViolation(format!(
                "computer move task failed: {}",
                e
            ))),
        }
    }
}

/// Plans the computer's move now and commits it after the session's
/// configured delay.
pub async fn schedule_computer_move(session: SharedSession) -> Result<ScheduledMove, EngineError> {
    let delay = session.lock().await.computer_delay();
    schedule_computer_move_after(session, delay).await
}

/// Plans the computer's move now and commits it after `delay`.
///
/// The search runs on a blocking thread against a board snapshot; the
/// session lock is not held while it runs.
///
/// # Errors
///
/// Precondition failures from [`GameSession::prepare_computer_turn`] are
/// returned immediately and nothing is scheduled.
#[instrument(skip(session))]
pub async fn schedule_computer_move_after(
    session: SharedSession,
    delay: Duration,
) -> Result<ScheduledMove, EngineError> {
    let turn = session.lock().await.prepare_computer_turn()?;
    let generation = turn.generation();

    let pending = tokio::task::spawn_blocking(move || turn.plan())
        .await
        .map_err(|e| EngineError::InvariantViolation(format!("search task failed: {}", e)))??;

    debug!(generation, index = *pending.index(), ?delay, "Computer move scheduled");

    let span = info_span!("computer_move", generation, index = *pending.index());
    let handle = tokio::spawn(
        async move {
            tokio::time::sleep(delay).await;
            session.lock().await.commit_computer_move(pending)
        }
        .instrument(span),
    );

    Ok(ScheduledMove { pending, handle })
}
