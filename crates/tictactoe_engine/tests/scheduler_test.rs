//! Tests for delayed computer moves.

mod common;

use std::time::Duration;

use anyhow::Result;
use common::{play, render};
use tictactoe_engine::{
    EngineConfig, EngineError, GameSession, Mark, Outcome, PlayMode, schedule_computer_move,
    schedule_computer_move_after, shared,
};

fn session_after_opening() -> GameSession {
    let mut session = GameSession::new(PlayMode::HumanVsComputer);
    play(&mut session, &[0]);
    session
}

#[tokio::test]
async fn test_scheduled_move_commits_after_delay() -> Result<()> {
    common::init_tracing();
    let session = shared(session_after_opening());

    let scheduled = schedule_computer_move_after(session.clone(), Duration::from_millis(10)).await?;
    assert_eq!(scheduled.index(), 4);
    assert_eq!(scheduled.generation(), 1);

    let outcome = scheduled.wait().await?;
    assert_eq!(outcome, Outcome::InProgress);

    let guard = session.lock().await;
    assert_eq!(render(&guard), "X...O....");
    assert_eq!(guard.turn(), Mark::X);
    Ok(())
}

#[tokio::test]
async fn test_restart_discards_pending_move() -> Result<()> {
    let session = shared(session_after_opening());
    let scheduled =
        schedule_computer_move_after(session.clone(), Duration::from_millis(200)).await?;

    session.lock().await.restart();

    let err = scheduled.wait().await.unwrap_err();
    assert_eq!(
        err,
        EngineError::StaleComputerMove {
            planned: 1,
            current: 2
        }
    );
    assert!(err.is_recoverable());

    let guard = session.lock().await;
    assert_eq!(render(&guard), ".........");
    assert_eq!(guard.turn(), Mark::X);
    Ok(())
}

#[tokio::test]
async fn test_mode_change_discards_pending_move() -> Result<()> {
    let session = shared(session_after_opening());
    let scheduled =
        schedule_computer_move_after(session.clone(), Duration::from_millis(200)).await?;

    session.lock().await.set_mode(PlayMode::HumanVsHuman);

    let err = scheduled.wait().await.unwrap_err();
    assert!(matches!(err, EngineError::StaleComputerMove { .. }));

    let guard = session.lock().await;
    assert_eq!(render(&guard), ".........");
    assert_eq!(guard.mode(), PlayMode::HumanVsHuman);
    Ok(())
}

#[tokio::test]
async fn test_cancelled_move_is_never_applied() -> Result<()> {
    let session = shared(session_after_opening());
    let scheduled =
        schedule_computer_move_after(session.clone(), Duration::from_millis(200)).await?;

    scheduled.cancel();
    let err = scheduled.wait().await.unwrap_err();
    assert_eq!(err, EngineError::ComputerMoveCancelled);
    assert!(err.is_recoverable());

    let guard = session.lock().await;
    assert_eq!(render(&guard), "X........");
    assert!(guard.is_computer_turn());
    Ok(())
}

#[tokio::test]
async fn test_schedule_on_human_turn_fails_immediately() {
    let session = shared(GameSession::new(PlayMode::HumanVsComputer));
    let err = schedule_computer_move_after(session.clone(), Duration::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::IllegalComputerRequest(_)));
    assert_eq!(session.lock().await.generation(), 0);
}

#[tokio::test]
async fn test_schedule_in_two_player_mode_fails() {
    let mut two_player = GameSession::new(PlayMode::HumanVsHuman);
    play(&mut two_player, &[0]);
    let session = shared(two_player);

    let err = schedule_computer_move(session).await.unwrap_err();
    assert!(matches!(err, EngineError::IllegalComputerRequest(_)));
}

#[tokio::test]
async fn test_schedule_uses_configured_delay() -> Result<()> {
    let config = EngineConfig::default()
        .with_mode(PlayMode::HumanVsComputer)
        .with_computer_delay_ms(0u64);
    let mut game = GameSession::with_config(&config);
    play(&mut game, &[4]);
    let session = shared(game);

    let scheduled = schedule_computer_move(session.clone()).await?;
    scheduled.wait().await?;

    let guard = session.lock().await;
    assert_eq!(render(&guard), "O...X....");
    assert_eq!(guard.history(), &[4, 0]);
    Ok(())
}
