use crate::domain::ports::SharedTransactionRepository;
use crate::domain::transaction::Transaction;
use crate::domain::validation::{RuleChain, ValidationResult};
use crate::error::{PaymentError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Counters reported by the worker once it stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub received: u64,
    pub forwarded: u64,
    pub declined: u64,
    pub persistence_failures: u64,
}

struct Endpoints {
    inbound: mpsc::Receiver<Transaction>,
    outbound: mpsc::Sender<Transaction>,
}

enum WorkerState {
    Idle(Endpoints),
    Running(JoinHandle<PipelineStats>),
    Joined,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Validates transactions and routes them to the downstream channel or the repository.
///
/// `validate` can be called from anywhere, concurrently. `run` hands the
/// channel endpoints to a single background worker; the endpoints can only
/// be taken once, so a second `run` never starts a second worker. The
/// endpoints and the worker handle sit behind one lock, so `join` never
/// observes a worker that is half started.
pub struct ValidationService {
    rules: Arc<RuleChain>,
    repository: SharedTransactionRepository,
    state: Mutex<WorkerState>,
    shutdown: Arc<Notify>,
}

impl ValidationService {
    /// Creates a new `ValidationService`.
    ///
    /// # Arguments
    ///
    /// * `rules` - The rule chain applied to every transaction.
    /// * `repository` - Where declined transactions are persisted.
    /// * `inbound` - Receiving end of the channel fed by the producer.
    /// * `outbound` - Sending end of the channel read by the downstream stage.
    pub fn new(
        rules: RuleChain,
        repository: SharedTransactionRepository,
        inbound: mpsc::Receiver<Transaction>,
        outbound: mpsc::Sender<Transaction>,
    ) -> Self {
        Self {
            rules: Arc::new(rules),
            repository,
            state: Mutex::new(WorkerState::Idle(Endpoints { inbound, outbound })),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn validate(&self, transaction: &Transaction) -> ValidationResult {
        self.rules.validate(transaction)
    }

    /// Starts the worker on the current Tokio runtime.
    ///
    /// Returns `Ok(true)` when this call started the worker and `Ok(false)`
    /// when it had already been started.
    pub fn run(&self) -> Result<bool> {
        let runtime = Handle::try_current().map_err(|_| PaymentError::NoRuntime)?;

        let mut state = lock(&self.state);
        let Endpoints { inbound, outbound } = match std::mem::replace(&mut *state, WorkerState::Joined) {
            WorkerState::Idle(endpoints) => endpoints,
            other => {
                *state = other;
                debug!("Validation worker already started");
                return Ok(false);
            }
        };

        let worker = Worker {
            rules: Arc::clone(&self.rules),
            repository: Arc::clone(&self.repository),
            inbound,
            outbound,
            shutdown: Arc::clone(&self.shutdown),
        };
        *state = WorkerState::Running(runtime.spawn(worker.run()));
        Ok(true)
    }

    pub fn is_running(&self) -> bool {
        matches!(&*lock(&self.state), WorkerState::Running(handle) if !handle.is_finished())
    }

    /// Asks the worker to stop after the transaction it is currently handling.
    ///
    /// Transactions still queued in the inbound channel are left there. A
    /// `close` issued before `run` is kept: the worker stops as soon as it
    /// starts, without receiving anything.
    pub fn close(&self) {
        self.shutdown.notify_one();
    }

    /// Waits for the worker to stop and returns its counters.
    ///
    /// Fails with `WorkerNotRunning` if `run` has not started a worker or
    /// the worker has already been joined.
    pub async fn join(&self) -> Result<PipelineStats> {
        let handle = {
            let mut state = lock(&self.state);
            match std::mem::replace(&mut *state, WorkerState::Joined) {
                WorkerState::Running(handle) => handle,
                other => {
                    *state = other;
                    return Err(PaymentError::WorkerNotRunning);
                }
            }
        };
        Ok(handle.await?)
    }
}

struct Worker {
    rules: Arc<RuleChain>,
    repository: SharedTransactionRepository,
    inbound: mpsc::Receiver<Transaction>,
    outbound: mpsc::Sender<Transaction>,
    shutdown: Arc<Notify>,
}

impl Worker {
    async fn run(mut self) -> PipelineStats {
        info!(rules = ?self.rules.rule_names(), "Validation worker started");
        let mut stats = PipelineStats::default();

        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.notified() => {
                    info!("Validation worker shutdown requested");
                    None
                }
                tx = self.inbound.recv() => tx,
            };
            let Some(tx) = next else {
                break;
            };

            stats.received += 1;
            if !self.process(tx, &mut stats).await {
                break;
            }
        }

        info!(
            received = stats.received,
            forwarded = stats.forwarded,
            declined = stats.declined,
            persistence_failures = stats.persistence_failures,
            "Validation worker stopped"
        );
        stats
    }

    /// Returns `false` once nothing can be forwarded any more.
    async fn process(&self, mut tx: Transaction, stats: &mut PipelineStats) -> bool {
        let transaction_id = tx.id;
        debug!(transaction_id, invoice = tx.invoice, "Got transaction to validate");

        // Only this worker assigns an outcome; anything the producer set is discarded.
        if tx.clear_outcome() {
            warn!(transaction_id, "Discarding status and errors carried by inbound transaction");
        }

        let result = self.rules.validate(&tx);
        if result.is_valid() {
            if self.outbound.send(tx).await.is_err() {
                error!(transaction_id, "Downstream channel closed, stopping validation worker");
                return false;
            }
            stats.forwarded += 1;
            debug!(transaction_id, "Transaction forwarded");
            return true;
        }

        let error_count = result.len();
        tx.decline(result);
        stats.declined += 1;
        warn!(transaction_id, error_count, errors = ?tx.errors, "Transaction declined");

        if let Err(e) = self.repository.save(tx).await {
            stats.persistence_failures += 1;
            error!(transaction_id, error = %e, "Failed to persist declined transaction");
        }
        true
    }
}
