//! Completion watcher: bounded polling until asynchronous deletions finish.
//!
//! The loop is an explicit state machine over `tokio::time`, so tests drive it
//! with a paused clock instead of real sleeps.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::provider::traits::NetworkProvider;
use crate::provider::types::{DescribeQuery, RawResource};
use crate::resources::types::ResourceKind;

/// The provider-reported state that ends the wait for an id.
pub const DELETED_STATE: &str = "deleted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            max_wait: Duration::from_secs(600),
        }
    }
}

/// How a wait ended. None of these is an error for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WaitOutcome {
    /// Every id reported `deleted`, or the batch came back empty.
    Completed { polls: u32 },
    /// The batch describe failed; the provider no longer knows the ids.
    Vanished { polls: u32 },
    TimedOut {
        pending: Vec<String>,
        polls: u32,
        waited_secs: u64,
    },
    Cancelled { pending: Vec<String>, polls: u32 },
}

impl WaitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            WaitOutcome::Completed { .. } | WaitOutcome::Vanished { .. }
        )
    }
}

enum WatchState {
    Poll,
    Sleep(Duration),
    Finished(WaitOutcome),
}

/// Result of inspecting one poll.
#[derive(Debug, PartialEq, Eq)]
enum PollVerdict {
    Done,
    Pending(Vec<String>),
}

fn classify(entries: &[RawResource]) -> PollVerdict {
    let pending: Vec<String> = entries
        .iter()
        .filter(|r| r.state.as_deref().is_some_and(|s| s != DELETED_STATE))
        .map(|r| r.id.clone())
        .collect();

    if pending.is_empty() {
        PollVerdict::Done
    } else {
        PollVerdict::Pending(pending)
    }
}

/// Poll `ids` in one batched describe until every entry is deleted, the
/// provider forgets them, `max_wait` elapses, or `cancel` fires.
pub async fn await_deletion<P: NetworkProvider>(
    provider: &P,
    kind: ResourceKind,
    ids: &[String],
    policy: &WaitPolicy,
    cancel: &CancellationToken,
) -> WaitOutcome {
    if ids.is_empty() {
        return WaitOutcome::Completed { polls: 0 };
    }

    info!(
        event = "core.watcher.wait_started",
        kind = %kind,
        count = ids.len(),
        poll_interval_secs = policy.poll_interval.as_secs(),
        max_wait_secs = policy.max_wait.as_secs()
    );

    let start = Instant::now();
    let query = DescribeQuery::Ids(ids.to_vec());
    let mut pending: Vec<String> = ids.to_vec();
    let mut polls: u32 = 0;
    let mut state = WatchState::Poll;

    loop {
        state = match state {
            WatchState::Poll => {
                if cancel.is_cancelled() {
                    WatchState::Finished(WaitOutcome::Cancelled {
                        pending: pending.clone(),
                        polls,
                    })
                } else if start.elapsed() >= policy.max_wait {
                    WatchState::Finished(WaitOutcome::TimedOut {
                        pending: pending.clone(),
                        polls,
                        waited_secs: start.elapsed().as_secs(),
                    })
                } else {
                    polls += 1;
                    match provider.describe(kind, &query).await {
                        Err(e) => {
                            debug!(
                                event = "core.watcher.describe_failed_assuming_deleted",
                                kind = %kind,
                                error = %e
                            );
                            WatchState::Finished(WaitOutcome::Vanished { polls })
                        }
                        Ok(entries) => match classify(&entries) {
                            PollVerdict::Done => {
                                WatchState::Finished(WaitOutcome::Completed { polls })
                            }
                            PollVerdict::Pending(still_pending) => {
                                debug!(
                                    event = "core.watcher.still_pending",
                                    kind = %kind,
                                    pending = still_pending.len(),
                                    poll = polls
                                );
                                pending = still_pending;
                                let remaining = policy.max_wait.saturating_sub(start.elapsed());
                                WatchState::Sleep(policy.poll_interval.min(remaining))
                            }
                        },
                    }
                }
            }
            WatchState::Sleep(duration) => {
                tokio::select! {
                    _ = cancel.cancelled() => WatchState::Finished(WaitOutcome::Cancelled {
                        pending: pending.clone(),
                        polls,
                    }),
                    _ = tokio::time::sleep(duration) => WatchState::Poll,
                }
            }
            WatchState::Finished(outcome) => {
                match &outcome {
                    WaitOutcome::TimedOut { pending, waited_secs, .. } => warn!(
                        event = "core.watcher.wait_timed_out",
                        kind = %kind,
                        pending = pending.len(),
                        waited_secs = waited_secs
                    ),
                    WaitOutcome::Cancelled { pending, .. } => info!(
                        event = "core.watcher.wait_cancelled",
                        kind = %kind,
                        pending = pending.len()
                    ),
                    WaitOutcome::Completed { polls } | WaitOutcome::Vanished { polls } => info!(
                        event = "core.watcher.wait_completed",
                        kind = %kind,
                        polls = polls
                    ),
                }
                return outcome;
            }
        };
    }
}
