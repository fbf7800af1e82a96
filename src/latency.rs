//! Simulated round-trip latency for the in-memory stores.
//!
//! Every store operation awaits [`Latency::wait`] before touching its
//! collection. Production wiring sleeps on tokio timers with the per-operation
//! delays from `[store.latency]`; tests inject [`NoLatency`].

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::config::LatencyConfig;

/// Store operations that carry their own delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    TaskGetAll,
    TaskGetById,
    TaskCreate,
    TaskUpdate,
    TaskDelete,
    CategoryGetAll,
    CategoryGetById,
    CategoryCreate,
    CategoryUpdate,
    CategoryDelete,
}

impl StoreOp {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreOp::TaskGetAll => "task.get_all",
            StoreOp::TaskGetById => "task.get_by_id",
            StoreOp::TaskCreate => "task.create",
            StoreOp::TaskUpdate => "task.update",
            StoreOp::TaskDelete => "task.delete",
            StoreOp::CategoryGetAll => "category.get_all",
            StoreOp::CategoryGetById => "category.get_by_id",
            StoreOp::CategoryCreate => "category.create",
            StoreOp::CategoryUpdate => "category.update",
            StoreOp::CategoryDelete => "category.delete",
        }
    }
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Injectable delay applied before each store operation.
#[async_trait]
pub trait Latency: Send + Sync + Debug {
    async fn wait(&self, op: StoreOp);
}

/// Zero delay, for tests and batch tooling.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn wait(&self, _op: StoreOp) {}
}

/// Timer-backed delay with a fixed duration per operation.
#[derive(Debug, Clone)]
pub struct SimulatedLatency {
    config: LatencyConfig,
}

impl SimulatedLatency {
    pub fn new(config: LatencyConfig) -> Self {
        Self { config }
    }

    pub fn duration_for(&self, op: StoreOp) -> Duration {
        let c = &self.config;
        let ms = match op {
            StoreOp::TaskGetAll => c.task_get_all_ms,
            StoreOp::TaskGetById => c.task_get_by_id_ms,
            StoreOp::TaskCreate => c.task_create_ms,
            StoreOp::TaskUpdate => c.task_update_ms,
            StoreOp::TaskDelete => c.task_delete_ms,
            StoreOp::CategoryGetAll => c.category_get_all_ms,
            StoreOp::CategoryGetById => c.category_get_by_id_ms,
            StoreOp::CategoryCreate => c.category_create_ms,
            StoreOp::CategoryUpdate => c.category_update_ms,
            StoreOp::CategoryDelete => c.category_delete_ms,
        };
        Duration::from_millis(ms)
    }
}

#[async_trait]
impl Latency for SimulatedLatency {
    async fn wait(&self, op: StoreOp) {
        let delay = self.duration_for(op);
        if delay.is_zero() {
            return;
        }
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        trace!(op = %op, delay_ms, "simulating latency");
        tokio::time::sleep(delay).await;
    }
}

/// Pick the latency implementation described by `[store.latency]`.
pub fn from_config(config: &LatencyConfig) -> Arc<dyn Latency> {
    if config.enabled {
        Arc::new(SimulatedLatency::new(config.clone()))
    } else {
        Arc::new(NoLatency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_follow_config() {
        let latency = SimulatedLatency::new(LatencyConfig::default());
        assert_eq!(
            latency.duration_for(StoreOp::TaskCreate),
            Duration::from_millis(400)
        );
        assert_eq!(
            latency.duration_for(StoreOp::CategoryGetById),
            Duration::from_millis(150)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_wait_sleeps_for_configured_delay() {
        let latency = SimulatedLatency::new(LatencyConfig::default());
        let start = tokio::time::Instant::now();
        latency.wait(StoreOp::TaskDelete).await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_config_means_no_wait() {
        let config = LatencyConfig {
            enabled: false,
            ..LatencyConfig::default()
        };
        let latency = from_config(&config);
        let start = tokio::time::Instant::now();
        latency.wait(StoreOp::TaskGetAll).await;
        assert!(start.elapsed().is_zero());
    }
}
