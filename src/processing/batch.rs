//! Bounded, order-preserving batch execution
//!
//! Every input gets its own slot in the output. Work runs on tokio tasks
//! gated by a semaphore; results are collected by awaiting the handles in
//! input order, so completion order never leaks into the output.

use crate::config::BatchConfig;
use crate::error::{AtsError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum ItemOutcome<R> {
    Completed(R),
    Failed { reason: String },
    Cancelled,
}

impl<R> ItemOutcome<R> {
    pub fn completed(&self) -> Option<&R> {
        match self {
            ItemOutcome::Completed(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ItemOutcome::Completed(_))
    }

    pub fn status(&self) -> &'static str {
        match self {
            ItemOutcome::Completed(_) => "completed",
            ItemOutcome::Failed { .. } => "failed",
            ItemOutcome::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRunner {
    max_concurrent: usize,
    timeout: Option<Duration>,
}

impl BatchRunner {
    pub fn new(max_concurrent: usize) -> Result<Self> {
        if max_concurrent == 0 {
            return Err(AtsError::Batch(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_concurrent,
            timeout: None,
        })
    }

    pub fn from_config(config: &BatchConfig) -> Result<Self> {
        Ok(Self::new(config.max_concurrent)?
            .with_timeout(config.timeout_ms.map(Duration::from_millis)))
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `work` over every item and return one outcome per item, in input order.
    ///
    /// Once the deadline passes, handles that already finished are still
    /// collected; the rest are aborted and reported as cancelled. A task that
    /// panics is reported as failed.
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, work: F) -> Vec<ItemOutcome<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        let work = Arc::new(work);
        let sem = Arc::new(Semaphore::new(self.max_concurrent));
        let deadline = self.timeout.map(|t| Instant::now() + t);

        debug!(
            "Starting batch of {} item(s), max_concurrent={}, timeout={:?}",
            items.len(),
            self.max_concurrent,
            self.timeout
        );

        let handles: Vec<JoinHandle<Result<R>>> = items
            .into_iter()
            .map(|item| {
                let work = Arc::clone(&work);
                let sem = Arc::clone(&sem);
                tokio::spawn(async move {
                    let _permit = sem
                        .acquire_owned()
                        .await
                        .map_err(|e| AtsError::Batch(e.to_string()))?;
                    work(item).await
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (index, mut handle) in handles.into_iter().enumerate() {
            let joined = match deadline {
                Some(deadline) => match timeout_at(deadline, &mut handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        handle.abort();
                        warn!("Batch item {} cancelled at deadline", index);
                        outcomes.push(ItemOutcome::Cancelled);
                        continue;
                    }
                },
                None => handle.await,
            };

            let outcome = match joined {
                Ok(Ok(result)) => ItemOutcome::Completed(result),
                Ok(Err(e)) => {
                    warn!("Batch item {} failed: {}", index, e);
                    ItemOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
                Err(e) if e.is_cancelled() => ItemOutcome::Cancelled,
                Err(e) => {
                    warn!("Batch item {} panicked: {}", index, e);
                    ItemOutcome::Failed {
                        reason: format!("task panicked: {}", e),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_order_preserved_with_failing_middle_item() {
        let runner = BatchRunner::new(4).unwrap();
        // Later items finish first
        let items = vec![(0u64, 60u64), (1, 40), (2, 20), (3, 0)];
        let outcomes = runner
            .run(items, |(index, delay)| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                if index == 1 {
                    Err(AtsError::InvalidInput("bad resume".to_string()))
                } else {
                    Ok(index * 10)
                }
            })
            .await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0], ItemOutcome::Completed(0));
        assert!(matches!(&outcomes[1], ItemOutcome::Failed { reason } if reason.contains("bad resume")));
        assert_eq!(outcomes[2], ItemOutcome::Completed(20));
        assert_eq!(outcomes[3], ItemOutcome::Completed(30));
    }

    #[tokio::test]
    async fn test_panic_becomes_failed() {
        let runner = BatchRunner::new(2).unwrap();
        let outcomes = runner
            .run(vec![1u32, 2, 3], |n| async move {
                if n == 2 {
                    panic!("boom");
                }
                Ok(n)
            })
            .await;

        assert_eq!(outcomes[0], ItemOutcome::Completed(1));
        assert_eq!(outcomes[1].status(), "failed");
        assert_eq!(outcomes[2], ItemOutcome::Completed(3));
    }

    #[tokio::test]
    async fn test_deadline_cancels_unfinished() {
        let runner = BatchRunner::new(3)
            .unwrap()
            .with_timeout(Some(Duration::from_millis(300)));
        let outcomes = runner
            .run(vec![0u64, 5_000, 10], |delay| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(delay)
            })
            .await;

        assert_eq!(outcomes[0], ItemOutcome::Completed(0));
        assert_eq!(outcomes[1], ItemOutcome::Cancelled);
        // Finished before the deadline, collected after it
        assert_eq!(outcomes[2], ItemOutcome::Completed(10));
    }

    #[tokio::test]
    async fn test_concurrency_bound() {
        let runner = BatchRunner::new(2).unwrap();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (a, p) = (Arc::clone(&active), Arc::clone(&peak));
        let outcomes = runner
            .run((0..8).collect::<Vec<u32>>(), move |n| {
                let active = Arc::clone(&a);
                let peak = Arc::clone(&p);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok(n)
                }
            })
            .await;

        assert!(outcomes.iter().all(ItemOutcome::is_completed));
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let runner = BatchRunner::new(1).unwrap();
        let outcomes: Vec<ItemOutcome<u32>> =
            runner.run(Vec::<u32>::new(), |n| async move { Ok(n) }).await;
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(matches!(BatchRunner::new(0), Err(AtsError::Batch(_))));
    }

    #[test]
    fn test_outcome_serialization() {
        let done: ItemOutcome<u32> = ItemOutcome::Completed(7);
        let json = serde_json::to_value(&done).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["result"], 7);

        let failed: ItemOutcome<u32> = ItemOutcome::Failed {
            reason: "x".to_string(),
        };
        assert_eq!(serde_json::to_value(&failed).unwrap()["result"]["reason"], "x");
        assert_eq!(
            serde_json::to_value(&ItemOutcome::<u32>::Cancelled).unwrap()["status"],
            "cancelled"
        );
    }
}
