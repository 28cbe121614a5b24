//! # Reconciliation Loop
//!
//! Background worker running [`SubmissionReconciler::run_pass`] on a fixed
//! interval.
//!
//! ```text
//! Stopped ──start()──► Running ──stop()──► Stopped
//! ```
//!
//! `start` on a running loop and `stop` on a stopped loop are no-ops. The
//! first pass runs as soon as the loop starts. Passes never overlap. A pass
//! longer than the interval delays the next tick instead of queueing extra
//! ones. `stop` lets the current pass finish before returning.
//!
//! The loop owns its cancellation token; only `stop` cancels it.

use crate::application::services::submission_reconciler::SubmissionReconciler;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest accepted interval; `tokio::time::interval` rejects zero.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug)]
enum LoopState {
    Stopped,
    Running {
        token: CancellationToken,
        handle: JoinHandle<()>,
    },
}

/// Singleton reconciliation worker.
#[derive(Debug)]
pub struct ReconciliationLoop {
    reconciler: Arc<SubmissionReconciler>,
    interval: Duration,
    state: Mutex<LoopState>,
    passes: Arc<AtomicU64>,
}

impl ReconciliationLoop {
    /// Creates a stopped loop. Intervals below [`MIN_INTERVAL`] are raised to it.
    #[must_use]
    pub fn new(reconciler: Arc<SubmissionReconciler>, interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            tracing::warn!(?interval, minimum = ?MIN_INTERVAL, "reconciliation interval raised to minimum");
        }
        let interval = interval.max(MIN_INTERVAL);
        Self {
            reconciler,
            interval,
            state: Mutex::new(LoopState::Stopped),
            passes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts the loop. Returns false if it was already running.
    pub async fn start(&self) -> bool {
        let mut state = self.state.lock().await;
        if matches!(*state, LoopState::Running { .. }) {
            tracing::debug!("reconciliation loop already running");
            return false;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(run(
            Arc::clone(&self.reconciler),
            self.interval,
            token.clone(),
            Arc::clone(&self.passes),
        ));
        *state = LoopState::Running { token, handle };

        tracing::info!(interval_ms = self.interval.as_millis(), "reconciliation loop started");
        true
    }

    /// Stops the loop and waits for the current pass. Returns false if it was
    /// not running.
    pub async fn stop(&self) -> bool {
        let mut state = self.state.lock().await;
        let LoopState::Running { token, handle } =
            std::mem::replace(&mut *state, LoopState::Stopped)
        else {
            return false;
        };

        token.cancel();
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "reconciliation loop task failed");
        }

        tracing::info!("reconciliation loop stopped");
        true
    }

    /// Returns true while the loop is running.
    pub async fn is_running(&self) -> bool {
        matches!(*self.state.lock().await, LoopState::Running { .. })
    }

    /// Returns the number of passes finished since creation.
    #[must_use]
    pub fn passes_completed(&self) -> u64 {
        self.passes.load(Ordering::Acquire)
    }

    /// Returns the pass interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

async fn run(
    reconciler: Arc<SubmissionReconciler>,
    interval: Duration,
    token: CancellationToken,
    passes: Arc<AtomicU64>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {
                let report = reconciler.run_pass().await;
                passes.fetch_add(1, Ordering::Release);
                tracing::trace!(?report, "reconciliation pass");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{MockBankClient, customer, registry};
    use crate::domain::entities::{Application, BankSubmission};
    use crate::domain::value_objects::{ApplicationId, ApplicationStatus, BankName};
    use crate::infrastructure::banks::BankVerdict;
    use crate::infrastructure::persistence::{
        ApplicationRepository, BankSubmissionRepository, InMemoryStore,
    };

    fn reconciliation_loop(
        store: &InMemoryStore,
        banks: &[Arc<MockBankClient>],
        interval: Duration,
    ) -> ReconciliationLoop {
        let reconciler = SubmissionReconciler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            registry(banks),
        );
        ReconciliationLoop::new(Arc::new(reconciler), interval)
    }

    async fn seed_draft(store: &InMemoryStore, bank: &str) -> ApplicationId {
        let mut application = Application::new(customer());
        ApplicationRepository::create(store, &application).await.unwrap();
        application.start_processing().unwrap();
        ApplicationRepository::update(store, &application).await.unwrap();
        let draft = BankSubmission::draft(application.id(), BankName::new(bank), "ext-1");
        BankSubmissionRepository::create(store, &draft).await.unwrap();
        application.id()
    }

    #[tokio::test]
    async fn stop_before_start_is_noop() {
        let store = InMemoryStore::new();
        let worker = reconciliation_loop(&store, &[], Duration::from_secs(60));

        let stopped = tokio::time::timeout(Duration::from_millis(100), worker.stop())
            .await
            .expect("stop must not block");
        assert!(!stopped);
        assert!(!worker.is_running().await);
    }

    #[tokio::test]
    async fn double_start_runs_one_instance() {
        let store = InMemoryStore::new();
        let bank = Arc::new(MockBankClient::accepting("FastBank", "ext-1"));
        seed_draft(&store, "FastBank").await;
        let worker = reconciliation_loop(&store, &[Arc::clone(&bank)], Duration::from_secs(60));

        assert!(worker.start().await);
        assert!(!worker.start().await);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(bank.poll_calls(), 1);
        assert_eq!(worker.passes_completed(), 1);
        assert!(worker.stop().await);
    }

    #[tokio::test]
    async fn runs_on_interval_until_stopped() {
        let store = InMemoryStore::new();
        let bank = Arc::new(MockBankClient::accepting("FastBank", "ext-1"));
        seed_draft(&store, "FastBank").await;
        let worker = reconciliation_loop(&store, &[Arc::clone(&bank)], Duration::from_millis(20));

        worker.start().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(worker.stop().await);

        let passes = worker.passes_completed();
        assert!(passes >= 2, "expected several passes, got {passes}");
        assert!(!worker.is_running().await);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(worker.passes_completed(), passes);
        assert!(!worker.stop().await);
    }

    #[tokio::test]
    async fn restart_after_stop() {
        let store = InMemoryStore::new();
        let worker = reconciliation_loop(&store, &[], Duration::from_secs(60));

        assert!(worker.start().await);
        assert!(worker.stop().await);
        assert!(worker.start().await);
        assert!(worker.is_running().await);
        assert!(worker.stop().await);
    }

    #[tokio::test]
    async fn stop_waits_for_pass_in_flight() {
        let store = InMemoryStore::new();
        let bank = Arc::new(
            MockBankClient::accepting("FastBank", "ext-1")
                .with_polls(vec![Ok(Some(BankVerdict::Rejected))])
                .with_poll_delay(300),
        );
        let id = seed_draft(&store, "FastBank").await;
        let worker = reconciliation_loop(&store, &[Arc::clone(&bank)], Duration::from_secs(60));

        worker.start().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(worker.passes_completed(), 0);

        assert!(worker.stop().await);

        assert_eq!(bank.poll_calls(), 1);
        assert_eq!(worker.passes_completed(), 1);
        let application = ApplicationRepository::get(&store, &id).await.unwrap().unwrap();
        assert_eq!(application.status(), ApplicationStatus::Completed);
    }

    #[tokio::test]
    async fn zero_interval_is_raised_to_minimum() {
        let store = InMemoryStore::new();
        let worker = reconciliation_loop(&store, &[], Duration::ZERO);
        assert_eq!(worker.interval(), MIN_INTERVAL);

        assert!(worker.start().await);
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(worker.stop().await);
        assert!(worker.passes_completed() >= 2);
    }
}
