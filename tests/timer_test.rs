use std::time::Duration;
use tokio::sync::mpsc;

use interview_coach::workflow::{TickOutcome, TimerController, TimerState};

#[test]
fn test_manual_ticks_expire_exactly_once() {
    let mut timer = TimerController::new(Duration::from_secs(3));
    assert!(timer.start_full());

    assert_eq!(timer.tick(), TickOutcome::Ticked { remaining: 2 });
    assert_eq!(timer.tick(), TickOutcome::Ticked { remaining: 1 });
    assert_eq!(timer.tick(), TickOutcome::Expired);
    assert_eq!(timer.tick(), TickOutcome::Ignored);

    assert!(timer.is_expired());
    assert_eq!(timer.remaining_secs(), 0);
    assert_eq!(timer.budget_secs(), 3);
}

#[test]
fn test_second_start_is_noop() {
    let mut timer = TimerController::new(Duration::from_secs(10));
    assert!(timer.start_full());
    timer.tick();

    assert!(!timer.start(Duration::from_secs(10)));
    assert_eq!(timer.remaining_secs(), 9);
    assert_eq!(timer.state(), TimerState::Running);
    assert!(timer.snapshot().is_active());
}

#[test]
fn test_zero_duration_expires_immediately() {
    let mut timer = TimerController::new(Duration::from_secs(60));
    assert!(timer.start(Duration::ZERO));
    assert!(timer.is_expired());
    assert_eq!(timer.tick(), TickOutcome::Ignored);
}

#[test]
fn test_stop_keeps_remaining_and_ignores_ticks() {
    let mut timer = TimerController::new(Duration::from_secs(10));
    timer.start_full();
    timer.tick();
    timer.stop();

    assert_eq!(timer.state(), TimerState::Stopped);
    assert_eq!(timer.tick(), TickOutcome::Ignored);
    assert_eq!(timer.remaining_secs(), 9);
    assert!(!timer.snapshot().is_expired());
    assert!(!timer.snapshot().is_active());
}

#[test]
fn test_reset_restores_budget() {
    let mut timer = TimerController::new(Duration::from_secs(2));
    timer.start_full();
    timer.tick();
    timer.tick();
    assert!(timer.is_expired());

    timer.reset();
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.state, TimerState::Idle);
    assert_eq!(snapshot.remaining_secs, 2);
    assert_eq!(snapshot.budget_secs, 2);

    // 重置后可以重新开始
    assert!(timer.start_full());
}

#[tokio::test(start_paused = true)]
async fn test_double_start_spawns_single_ticker() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut timer = TimerController::with_ticker(Duration::from_secs(10), tx);

    assert!(timer.start_full());
    assert!(!timer.start_full());
    assert!(timer.has_ticker());

    tokio::time::sleep(Duration::from_millis(3500)).await;

    let mut ticks = Vec::new();
    while let Ok(tick) = rx.try_recv() {
        ticks.push(tick);
    }
    assert_eq!(ticks.len(), 3);

    for tick in ticks {
        timer.on_tick(tick);
    }
    assert_eq!(timer.remaining_secs(), 7);
}

#[tokio::test(start_paused = true)]
async fn test_ticker_expires_once_and_stops() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut timer = TimerController::with_ticker(Duration::from_secs(2), tx);
    timer.start_full();

    let mut expired = 0;
    for _ in 0..2 {
        let tick = rx.recv().await.unwrap();
        if timer.on_tick(tick) == TickOutcome::Expired {
            expired += 1;
        }
    }
    assert_eq!(expired, 1);
    assert!(!timer.has_ticker());

    // 过期后即使还有滴答也只会被忽略
    tokio::time::sleep(Duration::from_secs(3)).await;
    while let Ok(tick) = rx.try_recv() {
        assert_eq!(timer.on_tick(tick), TickOutcome::Ignored);
    }
    assert!(timer.is_expired());
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_ticks_from_cancelled_ticker() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut timer = TimerController::with_ticker(Duration::from_secs(30), tx);
    timer.start_full();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let stale = rx.recv().await.unwrap();

    timer.reset();
    assert!(!timer.has_ticker());
    assert_eq!(timer.on_tick(stale), TickOutcome::Ignored);
    assert_eq!(timer.remaining_secs(), 30);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(rx.try_recv().is_err());
}
