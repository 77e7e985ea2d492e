//! Lifecycle tests for the simulation host.
//!
//! # Test Categories
//!
//! 1. **Completion**: results arrive after a final progress of 100
//! 2. **Supersession**: only the newest request resolves with a result
//! 3. **Cancellation**: cancelled requests never deliver a result
//! 4. **Failure**: validation errors surface as typed failures

use stochastic_core::distributions::DistributionParams;
use stochastic_engine::{
    MarkovChainConfig, MonteCarloConfig, RandomWalkConfig, SimulationConfig, SimulationKind,
    WalkDimensions, MAX_ITERATIONS,
};
use stochastic_host::{HostConfig, HostError, HostStatus, SimulationHost};

/// Run long enough to still be in flight when the next call arrives.
fn long_run() -> SimulationConfig {
    MonteCarloConfig::new(MAX_ITERATIONS, DistributionParams::normal(0.0, 1.0)).into()
}

fn short_run() -> SimulationConfig {
    RandomWalkConfig::new(WalkDimensions::Two, 20_000, DistributionParams::normal(0.0, 1.0)).into()
}

// ============================================================================
// Completion
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_completed_run_reports_full_progress() {
    let host = SimulationHost::new(HostConfig::default()).unwrap();
    let mut progress = host.subscribe();

    let pending = host.submit_seeded(
        MonteCarloConfig::new(2_000_000, DistributionParams::exponential(1.0)).into(),
        17,
    );
    let id = pending.id();
    assert_eq!(host.current_request(), Some(id));
    assert_eq!(host.status(), HostStatus::Running);

    let collector = tokio::spawn(async move {
        let mut seen = Vec::new();
        while progress.changed().await.is_ok() {
            let update = *progress.borrow_and_update();
            if update.id == Some(id) {
                seen.push(update.percent);
                if update.percent >= 100.0 {
                    break;
                }
            }
        }
        seen
    });

    let result = pending.wait().await.unwrap();
    let seen = collector.await.unwrap();

    assert_eq!(result.kind, SimulationKind::MonteCarlo);
    assert_eq!(result.seed, 17);
    assert_eq!(seen.last().copied(), Some(100.0));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(host.status(), HostStatus::Completed);
    assert_eq!(host.current_request(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_configured_seed_is_reproducible() {
    let config = HostConfig {
        seed: Some(2024),
        ..HostConfig::default()
    };
    let host = SimulationHost::new(config).unwrap();

    let first = host.submit(short_run()).wait().await.unwrap();
    let second = host.submit(short_run()).wait().await.unwrap();

    assert_eq!(first.seed, 2024);
    assert_eq!(first.values, second.values);
    assert_eq!(first.path, second.path);
}

// ============================================================================
// Supersession
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_new_submission_supersedes_running_one() {
    let host = SimulationHost::new(HostConfig::default()).unwrap();

    let a = host.submit_seeded(long_run(), 1);
    let a_id = a.id();
    let b = host.submit_seeded(short_run(), 2);
    let b_id = b.id();

    assert_eq!(
        a.wait().await.unwrap_err(),
        HostError::Superseded { id: a_id, by: b_id }
    );

    let result = b.wait().await.unwrap();
    assert_eq!(result.kind, SimulationKind::RandomWalk);
    assert_eq!(result.seed, 2);
    assert_eq!(host.status(), HostStatus::Completed);

    // Progress now belongs to B and stays there.
    let update = *host.subscribe().borrow();
    assert_eq!(update.id, Some(b_id));
    assert_eq!(update.percent, 100.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rapid_resubmission_only_resolves_last() {
    let host = SimulationHost::new(HostConfig::default()).unwrap();

    let pending: Vec<_> = (0..5).map(|seed| host.submit_seeded(long_run(), seed)).collect();
    let last = host.submit_seeded(short_run(), 99);
    let last_id = last.id();

    for p in pending {
        let err = p.wait().await.unwrap_err();
        assert!(err.is_cancellation());
    }
    assert_eq!(last.wait().await.unwrap().seed, 99);

    let update = *host.subscribe().borrow();
    assert_eq!(update.id, Some(last_id));
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_resolves_pending_caller() {
    let host = SimulationHost::new(HostConfig::default()).unwrap();

    let pending = host.submit(long_run());
    let id = pending.id();
    assert!(host.cancel());
    assert!(!host.cancel());

    assert_eq!(pending.wait().await.unwrap_err(), HostError::Cancelled { id });
    assert_eq!(host.status(), HostStatus::Cancelled);
    assert_eq!(host.current_request(), None);

    // The host is immediately ready for the next request.
    let result = host.submit_seeded(short_run(), 5).wait().await.unwrap();
    assert_eq!(result.iterations, 20_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dropping_host_disconnects_pending_caller() {
    let host = SimulationHost::new(HostConfig::default()).unwrap();
    let pending = host.submit(long_run());
    let id = pending.id();
    drop(host);

    assert_eq!(pending.wait().await.unwrap_err(), HostError::Disconnected { id });
}

// ============================================================================
// Failure
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_matrix_fails_with_message() {
    let host = SimulationHost::new(HostConfig::default()).unwrap();
    let config = MarkovChainConfig::new(
        vec!["A".into(), "B".into()],
        vec![vec![0.6, 0.6], vec![0.5, 0.5]],
        0,
        100,
    );

    let pending = host.submit(config.into());
    let id = pending.id();
    match pending.wait().await {
        Err(HostError::Failed { id: failed, message }) => {
            assert_eq!(failed, id);
            assert!(message.contains("transition matrix"), "message: {}", message);
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(host.status(), HostStatus::Failed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failure_does_not_poison_host() {
    let host = SimulationHost::new(HostConfig::default()).unwrap();

    let bad: SimulationConfig =
        MonteCarloConfig::new(10, DistributionParams::poisson(-3.0)).into();
    assert!(matches!(
        host.submit(bad).wait().await,
        Err(HostError::Failed { .. })
    ));

    assert!(host.submit_seeded(short_run(), 1).wait().await.is_ok());
    assert_eq!(host.status(), HostStatus::Completed);
}
