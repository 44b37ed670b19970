use super::validation_service::ValidationService;
use crate::domain::ports::SharedTransactionRepository;
use crate::domain::transaction::Transaction;
use crate::domain::validation::RuleChain;
use crate::error::Result;
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;
use tracing::info;

/// Holder for one shared `ValidationService`.
///
/// The first caller's arguments build the service; later callers get the
/// same instance back and their arguments are dropped.
#[derive(Default)]
pub struct ValidationServiceCell {
    cell: OnceLock<Arc<ValidationService>>,
}

impl ValidationServiceCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the shared service, building it and starting its worker on first use.
    ///
    /// Concurrent first callers race on construction but only one service is
    /// ever stored, and `run` starts at most one worker for it.
    pub fn get_or_init<F>(
        &self,
        inbound: mpsc::Receiver<Transaction>,
        outbound: mpsc::Sender<Transaction>,
        build: F,
    ) -> Result<Arc<ValidationService>>
    where
        F: FnOnce() -> (RuleChain, SharedTransactionRepository),
    {
        let service = self.cell.get_or_init(|| {
            let (rules, repository) = build();
            info!(rules = rules.len(), "Validation service created");
            Arc::new(ValidationService::new(rules, repository, inbound, outbound))
        });
        service.run()?;
        Ok(Arc::clone(service))
    }

    pub fn get(&self) -> Option<Arc<ValidationService>> {
        self.cell.get().cloned()
    }
}

static VALIDATION_SERVICE: ValidationServiceCell = ValidationServiceCell::new();

/// Process-wide accessor for the validation service.
///
/// The channels and repository passed by the first caller are bound for the
/// lifetime of the process. Must be called from within a Tokio runtime.
pub fn get_validation_service(
    inbound: mpsc::Receiver<Transaction>,
    outbound: mpsc::Sender<Transaction>,
    repository: SharedTransactionRepository,
) -> Result<Arc<ValidationService>> {
    VALIDATION_SERVICE.get_or_init(inbound, outbound, || (RuleChain::default(), repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryTransactionRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn repository() -> SharedTransactionRepository {
        Arc::new(InMemoryTransactionRepository::new())
    }

    #[tokio::test]
    async fn test_repeated_access_returns_same_instance() {
        let cell = ValidationServiceCell::new();
        assert!(cell.get().is_none());

        let (_in_tx, in_rx) = mpsc::channel(1);
        let (out_tx, _out_rx) = mpsc::channel(1);
        let first = cell
            .get_or_init(in_rx, out_tx, || (RuleChain::default(), repository()))
            .unwrap();

        let (_in_tx2, in_rx2) = mpsc::channel(1);
        let (out_tx2, _out_rx2) = mpsc::channel(1);
        let second = cell
            .get_or_init(in_rx2, out_tx2, || panic!("service must not be rebuilt"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &cell.get().unwrap()));
        assert!(first.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_builds_one_service() {
        let cell = Arc::new(ValidationServiceCell::new());
        let builds = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        let mut producers = Vec::new();
        for _ in 0..16 {
            let (in_tx, in_rx) = mpsc::channel(1);
            let (out_tx, out_rx) = mpsc::channel(1);
            producers.push((in_tx, out_rx));

            let cell = Arc::clone(&cell);
            let builds = Arc::clone(&builds);
            handles.push(tokio::spawn(async move {
                cell.get_or_init(in_rx, out_tx, || {
                    builds.fetch_add(1, Ordering::SeqCst);
                    (RuleChain::default(), repository())
                })
                .unwrap()
            }));
        }

        let mut services = Vec::new();
        for handle in handles {
            services.push(handle.await.unwrap());
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(services.iter().all(|s| Arc::ptr_eq(s, &services[0])));
        assert!(!services[0].run().unwrap(), "worker must already be running");
    }
}
