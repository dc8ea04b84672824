//! Execution of translated plans against a property graph.

pub mod cancel;
pub mod errors;
pub mod memory;

pub use cancel::Cancellation;
pub use errors::StoreError;
pub use memory::{GraphFixture, GraphNode, GraphRelationship, InMemoryGraph};

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::ExecutablePlan;

/// One root entity returned by a data query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRow {
    pub id: String,
    pub labels: Vec<String>,
    pub properties: Map<String, Value>,
}

impl EntityRow {
    /// Properties plus `id`, as one JSON object for typed deserialisation.
    pub fn to_json(&self) -> Value {
        let mut object = self.properties.clone();
        object.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(object)
    }
}

/// Rows of the requested window plus the total over the whole filtered set,
/// both read from the same snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPage {
    pub rows: Vec<EntityRow>,
    pub total: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphExecutor: Send + Sync {
    /// Runs both queries of `plan` inside one read-consistency boundary.
    async fn execute(&self, plan: &ExecutablePlan) -> Result<RawPage, StoreError>;

    /// Runs only the count query.
    async fn count(&self, plan: &ExecutablePlan) -> Result<u64, StoreError> {
        Ok(self.execute(plan).await?.total)
    }
}

#[async_trait]
impl<E: GraphExecutor + ?Sized> GraphExecutor for std::sync::Arc<E> {
    async fn execute(&self, plan: &ExecutablePlan) -> Result<RawPage, StoreError> {
        (**self).execute(plan).await
    }

    async fn count(&self, plan: &ExecutablePlan) -> Result<u64, StoreError> {
        (**self).count(plan).await
    }
}

/// Retries `StoreError::Unavailable` on read-only plans with a fixed backoff.
#[derive(Debug, Clone)]
pub struct RetryingExecutor<E> {
    inner: E,
    max_attempts: u32,
    backoff: Duration,
}

impl<E: GraphExecutor> RetryingExecutor<E> {
    pub fn new(inner: E, max_attempts: u32, backoff: Duration) -> Self {
        RetryingExecutor {
            inner,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    async fn with_retries<T, F, Fut>(&self, plan: &ExecutablePlan, mut call: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, StoreError>> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Err(err) if err.is_transient() && plan.is_read_only() && attempt < self.max_attempts => {
                    log::warn!(
                        "{} query failed (attempt {}/{}): {}; retrying in {:?}",
                        plan.table_id,
                        attempt,
                        self.max_attempts,
                        err,
                        self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl<E: GraphExecutor> GraphExecutor for RetryingExecutor<E> {
    async fn execute(&self, plan: &ExecutablePlan) -> Result<RawPage, StoreError> {
        self.with_retries(plan, || self.inner.execute(plan)).await
    }

    async fn count(&self, plan: &ExecutablePlan) -> Result<u64, StoreError> {
        self.with_retries(plan, || self.inner.count(plan)).await
    }
}
