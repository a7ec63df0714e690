//! Admission governor - rate limiting and call pacing.
//!
//! Sliding-window limiter for outbound API calls with two independent
//! constraints:
//!   - a ceiling on admissions per trailing window (sustained rate)
//!   - a minimum gap between consecutive admissions (back-to-back bursts)
//!
//! Unlike a rejecting limiter, the governor never refuses a caller; it only
//! delays. `acquire_slot` suspends until a slot is free, so callers simply
//! `await` their turn.

use std::collections::VecDeque;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

use crate::types::{GovernorConfig, Result};

/// Mutable pacing state. Admission times are `tokio::time::Instant` so tests
/// can drive the governor under paused time.
#[derive(Debug, Default)]
struct GovernorState {
    /// Admission times still inside the trailing window, oldest first.
    records: VecDeque<Instant>,
    /// Most recent admission, for the inter-call gap check.
    last_call: Option<Instant>,
}

impl GovernorState {
    /// Drop records that have exited the trailing window; they no longer
    /// count against the ceiling.
    fn prune(&mut self, now: Instant, window: std::time::Duration) {
        while let Some(&oldest) = self.records.front() {
            if now.duration_since(oldest) >= window {
                self.records.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Admission governor - paces outbound calls to one rate-limited endpoint.
///
/// One instance per endpoint, shared by every concurrent caller (wrap in an
/// `Arc`). Duplicating it would double the effective call rate and trip the
/// real server-side limit.
#[derive(Debug)]
pub struct AdmissionGovernor {
    config: GovernorConfig,
    state: Mutex<GovernorState>,
}

impl AdmissionGovernor {
    /// Create a governor, rejecting degenerate pacing values up front.
    pub fn new(config: GovernorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: Mutex::new(GovernorState::default()),
        })
    }

    /// Suspend until an outbound call may be issued, then consume the slot.
    ///
    /// The state lock is held across the waits on purpose: tokio's mutex
    /// queues waiters in FIFO order, which serializes admission in arrival
    /// order and makes the prune-wait-append sequence atomic with respect to
    /// other callers. Dropping the future while suspended releases the lock
    /// with no record appended, so a cancelled wait never counts as a call.
    pub async fn acquire_slot(&self) {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        state.prune(now, self.config.window);

        // Gap check first: cheap, and the binding constraint under normal load.
        if let Some(last) = state.last_call {
            let gap_open = last + self.config.min_inter_call_gap;
            if gap_open > now {
                tracing::debug!(
                    wait_ms = gap_open.duration_since(now).as_millis() as u64,
                    "waiting out inter-call gap"
                );
                sleep_until(gap_open).await;
            }
        }

        let mut now = Instant::now();
        state.prune(now, self.config.window);

        // Window ceiling: wait for the oldest retained call to age out.
        if state.records.len() >= self.config.max_calls_per_window as usize {
            if let Some(&oldest) = state.records.front() {
                let slot_open = oldest + self.config.window;
                if slot_open > now {
                    tracing::debug!(
                        wait_ms = slot_open.duration_since(now).as_millis() as u64,
                        window_load = state.records.len(),
                        "window full, waiting for oldest call to expire"
                    );
                    sleep_until(slot_open).await;
                    now = Instant::now();
                }
                state.records.pop_front();
            }
        }

        state.records.push_back(now);
        state.last_call = Some(now);
    }

    /// Number of admissions currently inside the trailing window.
    pub async fn window_load(&self) -> usize {
        let mut state = self.state.lock().await;
        state.prune(Instant::now(), self.config.window);
        state.records.len()
    }
}
