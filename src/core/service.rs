//! Service traits for persistence and analysis collaborators

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// A stored record with a stable identifier
pub trait Record: Clone + Send + Sync + 'static {
    /// Singular type name used in errors (e.g. "user")
    const TYPE_NAME: &'static str;

    fn id(&self) -> Uuid;
}

/// Service trait for managing records of one type
///
/// Implementations provide CRUD operations. Handlers are agnostic to the
/// underlying storage mechanism.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Create a new record
    async fn create(&self, record: T) -> Result<T>;

    /// Create a record unless an existing one satisfies `conflicts`
    ///
    /// Returns `None` when a conflicting record exists. Implementations
    /// should check and insert atomically.
    async fn create_unless(
        &self,
        record: T,
        conflicts: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Option<T>> {
        if self.list().await?.iter().any(conflicts) {
            return Ok(None);
        }
        self.create(record).await.map(Some)
    }

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all records
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing record, returning `None` if it does not exist
    async fn update(&self, id: &Uuid, record: T) -> Result<Option<T>>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, id: &Uuid) -> Result<bool>;

    /// Count all records
    async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}

/// Outcome reported by a symptom analyzer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub completed: bool,
    pub result: Option<Value>,
}

/// AI symptom analysis collaborator
#[async_trait]
pub trait SymptomAnalyzer: Send + Sync {
    async fn analyze(&self, symptoms: &str) -> Result<AnalysisOutcome>;
}

/// Analyzer that records submissions for later processing
#[derive(Debug, Clone, Default)]
pub struct DeferredAnalyzer;

#[async_trait]
impl SymptomAnalyzer for DeferredAnalyzer {
    async fn analyze(&self, _symptoms: &str) -> Result<AnalysisOutcome> {
        Ok(AnalysisOutcome {
            completed: false,
            result: None,
        })
    }
}
