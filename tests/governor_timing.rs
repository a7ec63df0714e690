//! Admission governor timing tests.
//!
//! All tests run under tokio's paused clock, so waits that would take a real
//! minute resolve instantly and grant times can be asserted exactly.

use paperlens_core::governor::AdmissionGovernor;
use paperlens_core::types::GovernorConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

fn config(window_ms: u64, max_calls: u32, gap_ms: u64) -> GovernorConfig {
    GovernorConfig {
        window: Duration::from_millis(window_ms),
        max_calls_per_window: max_calls,
        min_inter_call_gap: Duration::from_millis(gap_ms),
    }
}

/// Spawn `n` acquirers in order and collect (task index, grant offset) pairs.
async fn run_acquirers(governor: Arc<AdmissionGovernor>, n: usize) -> Vec<(usize, Duration)> {
    let start = Instant::now();
    let grants: Arc<Mutex<Vec<(usize, Duration)>>> = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for i in 0..n {
        let governor = Arc::clone(&governor);
        let grants = Arc::clone(&grants);
        handles.push(tokio::spawn(async move {
            governor.acquire_slot().await;
            grants.lock().unwrap().push((i, start.elapsed()));
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let grants = grants.lock().unwrap().clone();
    grants
}

// Three calls at t=0 against window=1000ms/max=2/gap=100ms must be granted
// at exactly t=0, t=100 and t=1000 (the third waits for the first admission
// to exit the window).
#[tokio::test(start_paused = true)]
async fn burst_of_three_is_paced_across_the_window() {
    let governor = Arc::new(AdmissionGovernor::new(config(1000, 2, 100)).unwrap());
    let grants = run_acquirers(governor, 3).await;

    assert_eq!(
        grants,
        vec![
            (0, Duration::from_millis(0)),
            (1, Duration::from_millis(100)),
            (2, Duration::from_millis(1000)),
        ]
    );
}

// Window ceiling: in any run of max_calls+1 consecutive admissions, the
// first and last grant must be at least one full window apart.
#[tokio::test(start_paused = true)]
async fn no_window_ever_holds_more_than_the_ceiling() {
    let max_calls = 3u32;
    let window = Duration::from_millis(1000);
    let governor = Arc::new(AdmissionGovernor::new(config(1000, max_calls, 0)).unwrap());

    let grants = run_acquirers(governor, 8).await;
    let times: Vec<Duration> = grants.iter().map(|&(_, t)| t).collect();

    for span in times.windows(max_calls as usize + 1) {
        let spread = span[span.len() - 1] - span[0];
        assert!(
            spread >= window,
            "{} admissions within {:?} (ceiling is {})",
            span.len(),
            spread,
            max_calls
        );
    }
}

// Minimum gap: consecutive grants are never closer than the configured gap.
#[tokio::test(start_paused = true)]
async fn consecutive_grants_respect_the_minimum_gap() {
    let gap = Duration::from_millis(250);
    let governor = Arc::new(AdmissionGovernor::new(config(60_000, 100, 250)).unwrap());

    let grants = run_acquirers(governor, 6).await;
    for pair in grants.windows(2) {
        assert!(
            pair[1].1 - pair[0].1 >= gap,
            "grants {:?} and {:?} closer than {:?}",
            pair[0],
            pair[1],
            gap
        );
    }
}

// Admission is FIFO in arrival order even when every caller has to wait.
#[tokio::test(start_paused = true)]
async fn admission_order_matches_arrival_order() {
    let governor = Arc::new(AdmissionGovernor::new(config(60_000, 100, 50)).unwrap());
    let grants = run_acquirers(governor, 5).await;

    let order: Vec<usize> = grants.iter().map(|&(i, _)| i).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
}

// A caller cancelled mid-wait must not leave a phantom admission behind.
#[tokio::test(start_paused = true)]
async fn cancelled_wait_registers_no_call() {
    let governor = Arc::new(AdmissionGovernor::new(config(1000, 1, 0)).unwrap());
    governor.acquire_slot().await;
    assert_eq!(governor.window_load().await, 1);

    let waiter = {
        let governor = Arc::clone(&governor);
        tokio::spawn(async move {
            governor.acquire_slot().await;
        })
    };
    // Let the waiter reach its suspension point, then cancel it.
    tokio::task::yield_now().await;
    waiter.abort();
    assert!(waiter.await.unwrap_err().is_cancelled());

    assert_eq!(governor.window_load().await, 1);

    // The slot frees on the original schedule, undisturbed by the cancel.
    tokio::time::advance(Duration::from_millis(1000)).await;
    assert_eq!(governor.window_load().await, 0);
}

// Back-to-back sequential acquisitions from one task: same pacing rules.
#[tokio::test(start_paused = true)]
async fn sequential_acquisitions_are_paced_too() {
    let governor = AdmissionGovernor::new(config(10_000, 100, 2000)).unwrap();

    let start = Instant::now();
    governor.acquire_slot().await;
    assert_eq!(start.elapsed(), Duration::ZERO);

    governor.acquire_slot().await;
    assert_eq!(start.elapsed(), Duration::from_millis(2000));

    governor.acquire_slot().await;
    assert_eq!(start.elapsed(), Duration::from_millis(4000));
}
