use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    Closed,
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Fixed number of slots shared by every offloaded fetch.
///
/// Submissions beyond the slot count wait for a permit instead of failing.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            slots: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Run `job` on the runtime once a slot is free and wait for its output.
    pub async fn run<F, T>(&self, job: F) -> Result<T, PoolError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;
        let handle = tokio::spawn(async move {
            let _permit = permit;
            job.await
        });
        Ok(handle.await?)
    }
}
