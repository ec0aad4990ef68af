//! Logging and polling helpers for the scenario tests
//!
//! The dispatcher runs handlers on spawned tasks, so scenario tests observe
//! their effects by polling the manager's state or the recorded output.

use std::future::Future;
use std::time::Duration;

use nextgric_e2mgr::{E2ManagerContext, MessageType, ProcedureState};
use tokio::time::{sleep, timeout};
use tracing_subscriber::{fmt, EnvFilter};

use crate::recording_sender::RecordingRmrSender;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// How long a scenario may take to settle.
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Installs a test-writer subscriber once. `RUST_LOG` overrides the default
/// of manager logs at info and everything else at warn.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,nextgric_e2mgr=info"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// Polls `condition` until it holds or `timeout_duration` runs out.
pub async fn wait_for_condition<F, Fut>(
    mut condition: F,
    timeout_duration: Duration,
    poll_interval: Duration,
) -> TestResult
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    timeout(timeout_duration, async {
        while !condition().await {
            sleep(poll_interval).await;
        }
    })
    .await
    .map_err(|_| format!("condition not met within {:?}", timeout_duration).into())
}

/// Waits until the procedure state of `ran_name` reaches `state`.
pub async fn wait_for_procedure_state(
    context: &E2ManagerContext,
    ran_name: &str,
    state: ProcedureState,
) -> TestResult {
    wait_for_condition(
        || async move { context.procedure_states.get(ran_name).await == Some(state) },
        DEFAULT_TEST_TIMEOUT,
        DEFAULT_POLL_INTERVAL,
    )
    .await
    .map_err(|e| format!("RAN {ran_name} never reached {state:?}: {e}").into())
}

/// Waits until `count` messages of `msg_type` have been sent.
pub async fn wait_for_sent(
    sender: &RecordingRmrSender,
    msg_type: MessageType,
    count: usize,
) -> TestResult {
    wait_for_condition(
        || async move { sender.sent_of_type(msg_type).len() >= count },
        DEFAULT_TEST_TIMEOUT,
        DEFAULT_POLL_INTERVAL,
    )
    .await
    .map_err(|e| format!("expected {count} {msg_type:?} message(s): {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_wait_polls_until_condition_holds() {
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = polls.clone();

        wait_for_condition(
            || {
                let counter = counter.clone();
                async move { counter.fetch_add(1, Ordering::SeqCst) >= 3 }
            },
            Duration::from_secs(1),
            Duration::from_millis(5),
        )
        .await
        .unwrap();

        assert_eq!(polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let err = wait_for_condition(
            || async { false },
            Duration::from_millis(50),
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("not met"));
    }
}
