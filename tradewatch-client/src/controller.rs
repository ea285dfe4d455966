//! Pipeline run controller
//!
//! Mirrors the server-side pipeline run by polling the status endpoint on a
//! fixed interval. The server only exposes a boolean `is_running` plus an error
//! field; the controller layers the explicit [`RunState`] machine over that and
//! fans out immutable snapshots through a watch channel, replaced wholesale on
//! every update (last write from the server wins, no merging).
//!
//! Polling discipline: a single task drives the interval, and each tick awaits
//! the status fetch before the next is scheduled. Arming is idempotent: any
//! previous task is aborted first. Every fetch takes a sequence ticket before
//! its request goes out, and a response is applied only while no newer ticket
//! has been applied yet, so a slow response is dropped instead of applied out
//! of order, whether it comes from a superseded task or a concurrent refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use tradewatch_core::domain::pipeline::{PipelineConfig, PipelineStatus};
use tradewatch_core::domain::run::{CommandOutcome, RunOutcome, RunState};

use crate::PipelineClient;
use crate::error::Result;

/// Status-poll cadence used by the web dashboard
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The pipeline operations the controller depends on
///
/// Seam between the controller and the HTTP client so the state machine can be
/// exercised against in-memory stubs.
#[async_trait]
pub trait PipelineApi: Send + Sync + 'static {
    /// Fetch the current run snapshot
    async fn status(&self) -> Result<PipelineStatus>;
    /// Issue the start command with the given configuration
    async fn start(&self, config: &PipelineConfig) -> Result<CommandOutcome>;
    /// Issue the stop command
    async fn stop(&self) -> Result<CommandOutcome>;
    /// Issue the clear-logs command
    async fn clear_logs(&self) -> Result<CommandOutcome>;
}

#[async_trait]
impl PipelineApi for PipelineClient {
    async fn status(&self) -> Result<PipelineStatus> {
        self.pipeline_status().await
    }

    async fn start(&self, config: &PipelineConfig) -> Result<CommandOutcome> {
        self.start_pipeline(config).await
    }

    async fn stop(&self) -> Result<CommandOutcome> {
        self.stop_pipeline().await
    }

    async fn clear_logs(&self) -> Result<CommandOutcome> {
        self.clear_pipeline_logs().await
    }
}

/// Immutable controller snapshot: the derived run state plus the most recently
/// applied status document
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub state: RunState,
    pub status: PipelineStatus,
}

impl Default for ControllerSnapshot {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
            status: PipelineStatus::default(),
        }
    }
}

/// Client-side mirror of the server-side pipeline run
///
/// All mutations go through commands to the external service followed by a
/// re-fetch; the controller never edits a snapshot field directly.
pub struct RunController<A: PipelineApi> {
    api: Arc<A>,
    poll_interval: Duration,
    snapshot_tx: watch::Sender<ControllerSnapshot>,
    poll_task: std::sync::Mutex<Option<JoinHandle<()>>>,
    /// Orders snapshot application across concurrent fetches
    gate: Arc<SnapshotGate>,
}

impl<A: PipelineApi> RunController<A> {
    /// Create a controller with the default 2-second poll cadence
    pub fn new(api: A) -> Self {
        Self::with_poll_interval(api, DEFAULT_POLL_INTERVAL)
    }

    /// Create a controller with a custom poll interval
    pub fn with_poll_interval(api: A, poll_interval: Duration) -> Self {
        let (snapshot_tx, _) = watch::channel(ControllerSnapshot::default());
        Self {
            api: Arc::new(api),
            poll_interval,
            snapshot_tx,
            poll_task: std::sync::Mutex::new(None),
            gate: Arc::new(SnapshotGate::default()),
        }
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// The current snapshot
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// The current run state
    pub fn state(&self) -> RunState {
        self.snapshot_tx.borrow().state.clone()
    }

    /// Start a run with the given configuration
    ///
    /// Exactly one outbound start request is issued, and none at all while a
    /// start is already in flight or a run is active: the check and the
    /// transition to `Starting` happen atomically, so a rapid double-start is
    /// suppressed client-side. A server rejection reverts to `Idle` and returns
    /// the server's reason; there is no retry.
    pub async fn start(&self, config: &PipelineConfig) -> Result<CommandOutcome> {
        let mut suppressed = false;
        self.snapshot_tx.send_modify(|snap| {
            if snap.state.is_active() {
                suppressed = true;
            } else {
                snap.state = RunState::Starting;
            }
        });
        if suppressed {
            return Ok(CommandOutcome::Rejected("流水線已在運行中".to_string()));
        }

        match self.api.start(config).await {
            Ok(CommandOutcome::Accepted) => {
                self.arm_polling();
                Ok(CommandOutcome::Accepted)
            }
            Ok(CommandOutcome::Rejected(reason)) => {
                self.set_state(RunState::Idle);
                Ok(CommandOutcome::Rejected(reason))
            }
            Err(e) => {
                self.set_state(RunState::Idle);
                Err(e)
            }
        }
    }

    /// Request a stop
    ///
    /// Fire-and-forget: on acceptance the state flips to the optimistic
    /// `StoppingRequested` label, and the authoritative transition is observed
    /// on the next poll.
    pub async fn stop(&self) -> Result<CommandOutcome> {
        let outcome = self.api.stop().await?;
        if outcome.is_accepted() {
            self.snapshot_tx.send_modify(|snap| {
                if matches!(snap.state, RunState::Starting | RunState::Running) {
                    snap.state = RunState::StoppingRequested;
                }
            });
        }
        Ok(outcome)
    }

    /// Clear the server-side log buffer, then re-fetch status to confirm
    pub async fn clear_logs(&self) -> Result<CommandOutcome> {
        let outcome = self.api.clear_logs().await?;
        if outcome.is_accepted() {
            if let Err(e) = self.refresh().await {
                warn!("Failed to refresh status after clearing logs: {}", e);
            }
        }
        Ok(outcome)
    }

    /// Perform one status poll and apply the result
    ///
    /// If the snapshot shows the run active and no poll task is live, polling is
    /// re-armed, so a controller attaching to an already-running job catches up.
    pub async fn refresh(&self) -> Result<ControllerSnapshot> {
        let ticket = self.gate.issue();
        let status = self.api.status().await?;

        if self.gate.admit(ticket) {
            apply_status(&self.snapshot_tx, status);
        }

        if self.snapshot_tx.borrow().status.is_running && !self.is_polling() {
            self.arm_polling();
        }

        Ok(self.snapshot())
    }

    /// Tear down the controller's background polling
    pub fn shutdown(&self) {
        self.gate.invalidate_issued();
        if let Ok(mut guard) = self.poll_task.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }

    /// True while a poll task is live
    fn is_polling(&self) -> bool {
        self.poll_task
            .lock()
            .map(|guard| guard.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    fn set_state(&self, state: RunState) {
        self.snapshot_tx.send_modify(|snap| snap.state = state);
    }

    /// Arm the polling loop, cancelling any previous one first
    ///
    /// At most one poll task is live at any time. Tickets issued before the
    /// re-arm are invalidated, so responses still in flight from the previous
    /// task are dropped unapplied.
    fn arm_polling(&self) {
        let Ok(mut guard) = self.poll_task.lock() else {
            return;
        };
        if let Some(handle) = guard.take() {
            handle.abort();
        }
        self.gate.invalidate_issued();

        let api = Arc::clone(&self.api);
        let gate = Arc::clone(&self.gate);
        let tx = self.snapshot_tx.clone();
        let poll_interval = self.poll_interval;

        *guard = Some(tokio::spawn(async move {
            let mut interval = time::interval(poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let ticket = gate.issue();
                match api.status().await {
                    Ok(status) => {
                        if !gate.admit(ticket) {
                            debug!("Dropping out-of-order status snapshot");
                            continue;
                        }
                        if apply_status(&tx, status) {
                            debug!("Run finished, stopping status polling");
                            return;
                        }
                    }
                    Err(e) => {
                        // Previous snapshot retained, no state transition
                        warn!("Failed to fetch pipeline status: {}", e);
                    }
                }
            }
        }));
    }
}

impl<A: PipelineApi> Drop for RunController<A> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.poll_task.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

/// Orders snapshot application across concurrent status fetches
///
/// Every fetch takes a ticket before its request goes out; a response is
/// admitted only if no response with a newer ticket has been applied yet.
/// Invalidation moves the applied mark past every issued ticket, shutting out
/// responses still in flight at that point.
#[derive(Debug, Default)]
struct SnapshotGate {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SnapshotGate {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn admit(&self, ticket: u64) -> bool {
        let mut applied = self.applied.load(Ordering::Acquire);
        loop {
            if ticket <= applied {
                return false;
            }
            match self.applied.compare_exchange(
                applied,
                ticket,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(current) => applied = current,
            }
        }
    }

    fn invalidate_issued(&self) {
        let issued = self.issued.load(Ordering::Acquire);
        self.applied.fetch_max(issued, Ordering::AcqRel);
    }
}

/// Apply a fetched status document, returning true once the run has finished
fn apply_status(tx: &watch::Sender<ControllerSnapshot>, status: PipelineStatus) -> bool {
    let mut finished = false;
    tx.send_modify(|snap| {
        snap.state = next_state(&snap.state, &status);
        finished = matches!(snap.state, RunState::Finished(_));
        snap.status = status;
    });
    finished
}

/// State transition on an applied snapshot
///
/// `Starting` holds until `is_running = true` is observed; `Finished` requires a
/// prior active observation, so a stale `false` before the server flips the flag
/// never misclassifies a run.
fn next_state(current: &RunState, status: &PipelineStatus) -> RunState {
    if status.is_running {
        match current {
            // Keep the optimistic label until the server confirms the stop
            RunState::StoppingRequested => RunState::StoppingRequested,
            _ => RunState::Running,
        }
    } else {
        match current {
            RunState::Running | RunState::StoppingRequested => {
                RunState::Finished(RunOutcome::classify(status))
            }
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    /// Scripted in-memory pipeline API
    ///
    /// Status responses are consumed front-to-back; the last one repeats once
    /// the script is exhausted. Per-call delays let a test hold a response in
    /// flight while later ones complete.
    struct StubApi {
        statuses: Mutex<VecDeque<PipelineStatus>>,
        delays: Mutex<VecDeque<Duration>>,
        last: Mutex<PipelineStatus>,
        start_outcome: CommandOutcome,
        status_calls: AtomicUsize,
        start_calls: AtomicUsize,
        stop_calls: AtomicUsize,
        clear_calls: AtomicUsize,
    }

    impl StubApi {
        fn new(script: Vec<PipelineStatus>) -> Self {
            Self {
                statuses: Mutex::new(script.into()),
                delays: Mutex::new(VecDeque::new()),
                last: Mutex::new(PipelineStatus::default()),
                start_outcome: CommandOutcome::Accepted,
                status_calls: AtomicUsize::new(0),
                start_calls: AtomicUsize::new(0),
                stop_calls: AtomicUsize::new(0),
                clear_calls: AtomicUsize::new(0),
            }
        }

        fn rejecting(reason: &str) -> Self {
            let mut stub = Self::new(vec![]);
            stub.start_outcome = CommandOutcome::Rejected(reason.to_string());
            stub
        }

        fn delay_next_status(&self, delay: Duration) {
            self.delays.lock().unwrap().push_back(delay);
        }

        fn status_count(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PipelineApi for Arc<StubApi> {
        async fn status(&self) -> Result<PipelineStatus> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delays.lock().unwrap().pop_front();
            let status = {
                let mut last = self.last.lock().unwrap();
                if let Some(next) = self.statuses.lock().unwrap().pop_front() {
                    *last = next;
                }
                last.clone()
            };
            if let Some(delay) = delay {
                time::sleep(delay).await;
            }
            Ok(status)
        }

        async fn start(&self, _config: &PipelineConfig) -> Result<CommandOutcome> {
            self.start_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.start_outcome.clone())
        }

        async fn stop(&self) -> Result<CommandOutcome> {
            self.stop_calls.fetch_add(1, Ordering::SeqCst);
            Ok(CommandOutcome::Accepted)
        }

        async fn clear_logs(&self) -> Result<CommandOutcome> {
            self.clear_calls.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .lock()
                .unwrap()
                .push_front(PipelineStatus::default());
            Ok(CommandOutcome::Accepted)
        }
    }

    fn running(completed: u32, total: u32, progress: f64) -> PipelineStatus {
        PipelineStatus {
            is_running: true,
            completed_steps: completed,
            total_steps: total,
            progress,
            ..Default::default()
        }
    }

    fn finished(error: Option<&str>, duration: i64) -> PipelineStatus {
        PipelineStatus {
            is_running: false,
            duration: Some(duration),
            error: error.map(String::from),
            ..Default::default()
        }
    }

    async fn wait_for_finished(
        rx: &mut watch::Receiver<ControllerSnapshot>,
    ) -> ControllerSnapshot {
        rx.wait_for(|snap| matches!(snap.state, RunState::Finished(_)))
            .await
            .unwrap()
            .clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_run_classifies_success_and_stops_polling() {
        let stub = Arc::new(StubApi::new(vec![
            running(2, 5, 40.0),
            running(4, 5, 80.0),
            finished(None, 125),
        ]));
        let controller = RunController::new(Arc::clone(&stub));
        let mut rx = controller.subscribe();

        let outcome = controller.start(&PipelineConfig::default()).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Accepted);

        let snap = wait_for_finished(&mut rx).await;
        assert_eq!(snap.state, RunState::Finished(RunOutcome::Success));
        assert_eq!(snap.status.duration, Some(125));

        // No further poll requests once the run has finished
        let polls = stub.status_count();
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(stub.status_count(), polls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_exposes_error_text_unchanged() {
        let stub = Arc::new(StubApi::new(vec![
            running(1, 5, 20.0),
            finished(Some("流水線執行失敗: boom"), 37),
        ]));
        let controller = RunController::new(Arc::clone(&stub));
        let mut rx = controller.subscribe();

        controller.start(&PipelineConfig::default()).await.unwrap();

        let snap = wait_for_finished(&mut rx).await;
        assert_eq!(
            snap.state,
            RunState::Finished(RunOutcome::Error("流水線執行失敗: boom".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_start_stays_idle_without_polling() {
        let stub = Arc::new(StubApi::rejecting("invalid config"));
        let controller = RunController::new(Arc::clone(&stub));

        let outcome = controller.start(&PipelineConfig::default()).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Rejected("invalid config".to_string()));
        assert_eq!(controller.state(), RunState::Idle);

        // No polling timer was armed
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(stub.status_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_suppressed_while_running() {
        let stub = Arc::new(StubApi::new(vec![running(1, 5, 20.0)]));
        let controller = RunController::new(Arc::clone(&stub));
        let mut rx = controller.subscribe();

        controller.start(&PipelineConfig::default()).await.unwrap();
        rx.wait_for(|snap| snap.state == RunState::Running)
            .await
            .unwrap();

        // Second start must not produce an outbound start request
        let outcome = controller.start(&PipelineConfig::default()).await.unwrap();
        assert!(matches!(outcome, CommandOutcome::Rejected(_)));
        assert_eq!(stub.start_calls.load(Ordering::SeqCst), 1);

        controller.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_cadence_single_loop() {
        let stub = Arc::new(StubApi::new(vec![running(1, 5, 20.0)]));
        let controller = RunController::new(Arc::clone(&stub));

        controller.start(&PipelineConfig::default()).await.unwrap();

        // Ticks at 0s, 2s, ..., 10s inside an 11s window: 6 polls, +-1 tolerance
        time::sleep(Duration::from_millis(10_900)).await;
        let polls = stub.status_count();
        assert!((5..=7).contains(&polls), "unexpected poll count {}", polls);

        controller.shutdown();
        let after_shutdown = stub.status_count();
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(stub.status_count(), after_shutdown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_requests_optimistic_label_then_server_confirms() {
        let stub = Arc::new(StubApi::new(vec![
            running(1, 5, 20.0),
            finished(Some("用戶手動停止"), 12),
        ]));
        let controller = RunController::new(Arc::clone(&stub));
        let mut rx = controller.subscribe();

        controller.start(&PipelineConfig::default()).await.unwrap();
        rx.wait_for(|snap| snap.state == RunState::Running)
            .await
            .unwrap();

        let outcome = controller.stop().await.unwrap();
        assert_eq!(outcome, CommandOutcome::Accepted);
        assert_eq!(controller.state(), RunState::StoppingRequested);

        // The authoritative transition arrives with the next poll
        let snap = wait_for_finished(&mut rx).await;
        assert_eq!(
            snap.state,
            RunState::Finished(RunOutcome::Error("用戶手動停止".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_logs_refetches_and_applies_empty_logs() {
        use tradewatch_core::domain::log::{LogEntry, LogLevel};

        let with_logs = PipelineStatus {
            logs: vec![LogEntry {
                timestamp: chrono::Utc::now(),
                level: LogLevel::Info,
                message: "開始執行".to_string(),
            }],
            ..Default::default()
        };
        let stub = Arc::new(StubApi::new(vec![with_logs]));
        let controller = RunController::new(Arc::clone(&stub));

        let snap = controller.refresh().await.unwrap();
        assert_eq!(snap.status.logs.len(), 1);

        // Stub empties its log buffer on clear; the follow-up fetch confirms
        let outcome = controller.clear_logs().await.unwrap();
        assert_eq!(outcome, CommandOutcome::Accepted);
        assert_eq!(stub.clear_calls.load(Ordering::SeqCst), 1);
        assert!(controller.snapshot().status.logs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_arms_polling_when_run_already_active() {
        let stub = Arc::new(StubApi::new(vec![
            running(3, 5, 60.0),
            finished(None, 90),
        ]));
        let controller = RunController::new(Arc::clone(&stub));
        let mut rx = controller.subscribe();

        // Catching up with a run started elsewhere
        let snap = controller.refresh().await.unwrap();
        assert_eq!(snap.state, RunState::Running);

        let snap = wait_for_finished(&mut rx).await;
        assert_eq!(snap.state, RunState::Finished(RunOutcome::Success));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_response_loses_to_newer_apply() {
        let stale = PipelineStatus {
            progress: 20.0,
            ..Default::default()
        };
        let fresh = PipelineStatus {
            progress: 80.0,
            ..Default::default()
        };
        let stub = Arc::new(StubApi::new(vec![stale, fresh]));
        stub.delay_next_status(Duration::from_millis(100));

        let controller = Arc::new(RunController::new(Arc::clone(&stub)));

        // First refresh is held in flight while a second one completes
        let racer = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.refresh().await.unwrap() })
        };
        time::sleep(Duration::from_millis(1)).await;

        let snap = controller.refresh().await.unwrap();
        assert_eq!(snap.status.progress, 80.0);

        racer.await.unwrap();
        assert_eq!(controller.snapshot().status.progress, 80.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_finished_run() {
        let stub = Arc::new(StubApi::new(vec![
            running(5, 5, 100.0),
            finished(None, 60),
            running(1, 5, 20.0),
            finished(None, 45),
        ]));
        let controller = RunController::new(Arc::clone(&stub));
        let mut rx = controller.subscribe();

        controller.start(&PipelineConfig::default()).await.unwrap();
        wait_for_finished(&mut rx).await;
        assert_eq!(stub.start_calls.load(Ordering::SeqCst), 1);

        // Finished is not an active state: a new start goes out
        let outcome = controller.start(&PipelineConfig::default()).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Accepted);
        assert_eq!(stub.start_calls.load(Ordering::SeqCst), 2);

        // The channel still holds the first Finished snapshot; key on the
        // second run's duration instead of the state alone
        let snap = rx
            .wait_for(|snap| snap.status.duration == Some(45))
            .await
            .unwrap()
            .clone();
        assert_eq!(snap.state, RunState::Finished(RunOutcome::Success));
    }
}
