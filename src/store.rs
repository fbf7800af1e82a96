//! Shared plumbing for the in-memory stores.
//!
//! A [`Table`] is an ordered collection behind a tokio `RwLock`. Every
//! mutation runs start to finish under the write lock, so an existence check
//! and the change it guards can never be split by another writer. Reads clone
//! under the read lock and never see half of a write.
//!
//! [`StoreRuntime`] bundles what every operation needs besides the rows: the
//! latency to simulate, the clock, and an optional request timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::latency::{self, Latency, NoLatency, StoreOp};

/// A row addressable by a string id.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

#[derive(Debug)]
pub struct Table<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<T: Record> Table<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub async fn snapshot(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    pub async fn find(&self, id: &str) -> Option<T> {
        self.rows.read().await.iter().find(|row| row.id() == id).cloned()
    }

    pub async fn contains_where<F>(&self, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        self.rows.read().await.iter().any(predicate)
    }

    /// Build a row from the current contents and insert it, all under one write lock.
    pub async fn insert_with<F>(&self, position: Position, build: F) -> T
    where
        F: FnOnce(&[T]) -> T,
    {
        let mut rows = self.rows.write().await;
        let row = build(rows.as_slice());
        match position {
            Position::Front => rows.insert(0, row.clone()),
            Position::Back => rows.push(row.clone()),
        }
        row
    }

    /// Apply `change` to the row with `id` in place and return the result.
    pub async fn modify<F>(&self, id: &str, change: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().await;
        let row = rows.iter_mut().find(|row| row.id() == id)?;
        change(row);
        Some(row.clone())
    }

    pub async fn remove(&self, id: &str) -> Option<T> {
        let mut rows = self.rows.write().await;
        let index = rows.iter().position(|row| row.id() == id)?;
        Some(rows.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

/// Where a newly created row lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Front,
    Back,
}

#[derive(Debug, Clone)]
pub struct StoreRuntime {
    latency: Arc<dyn Latency>,
    clock: Arc<dyn Clock>,
    timeout: Option<Duration>,
}

impl Default for StoreRuntime {
    fn default() -> Self {
        Self::immediate()
    }
}

impl StoreRuntime {
    pub fn new(latency: Arc<dyn Latency>, clock: Arc<dyn Clock>) -> Self {
        Self {
            latency,
            clock,
            timeout: None,
        }
    }

    /// No latency, real clock, no timeout.
    pub fn immediate() -> Self {
        Self::new(Arc::new(NoLatency), Arc::new(SystemClock))
    }

    pub fn from_config(config: &StoreConfig, clock: Arc<dyn Clock>) -> Self {
        let runtime = Self::new(latency::from_config(&config.latency), clock);
        match config.request_timeout_ms {
            0 => runtime,
            ms => runtime.with_timeout(Duration::from_millis(ms)),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Wait out the simulated latency for `op`, then drive `work`.
    ///
    /// When a timeout is configured and expires, `work` is dropped. Work that
    /// has not yet taken its lock has applied nothing.
    pub async fn run<T, F>(&self, op: StoreOp, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let request = async {
            self.latency.wait(op).await;
            work.await
        };
        match self.timeout {
            None => request.await,
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(result) => result,
                Err(_) => {
                    let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                    warn!(op = %op, timeout_ms, "store operation timed out");
                    Err(Error::Timeout {
                        op: op.as_str(),
                        timeout_ms,
                    })
                }
            },
        }
    }
}
