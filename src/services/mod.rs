/// Request-scoped service dependencies
///
/// Stages reach external systems only through the traits defined here,
/// so pipelines stay decoupled from any concrete backend. Implementations
/// can be mocked for testing or swapped per deployment.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::pipeline::PipelineError;

/// Trait for data lookups performed by fetch stages
///
/// `find` may suspend the calling task (network, disk). Errors are
/// reported as `PipelineError` so a stage can propagate them directly.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Find documents in a collection matching a simple equality filter
    async fn find(
        &self,
        collection: &str,
        filter: &HashMap<String, Value>,
    ) -> Result<Vec<Value>, PipelineError>;
}

/// Handle to the dependencies resolved for one pipeline invocation
///
/// Each invocation gets its own `Services` value; the handle is cheap to
/// clone and is carried by the context rather than shared globally.
#[derive(Clone)]
pub struct Services {
    repository: Arc<dyn Repository>,
}

impl Services {
    /// Create a services handle around a repository
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// The repository for this invocation
    pub fn repository(&self) -> &dyn Repository {
        self.repository.as_ref()
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("repository", &"<repository>")
            .finish()
    }
}

// Mock implementations for testing

use std::sync::Mutex;

/// In-memory repository for tests and examples
///
/// Collections are plain lists of JSON documents; `find` applies a
/// simple equality filter where all fields must match (implicit AND).
#[derive(Clone, Default)]
pub struct MockRepository {
    collections: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collection with initial documents
    pub fn with_collection(self, name: &str, documents: Vec<Value>) -> Self {
        let mut collections = self.collections.lock().unwrap();
        collections.insert(name.to_string(), documents);
        drop(collections);
        self
    }

    /// Helper: Check if a document matches a simple equality filter
    fn matches_filter(doc: &Value, filter: &HashMap<String, Value>) -> bool {
        let obj = match doc.as_object() {
            Some(o) => o,
            None => return false,
        };

        // All filter fields must match (implicit AND)
        for (key, filter_value) in filter {
            let doc_value = obj.get(key);
            match (doc_value, filter_value) {
                (Some(dv), fv) if dv == fv => continue,
                (None, Value::Null) => continue, // null matches missing field
                _ => return false,
            }
        }
        true
    }
}

impl std::fmt::Debug for MockRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRepository")
            .field("collections", &self.collections)
            .finish()
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn find(
        &self,
        collection: &str,
        filter: &HashMap<String, Value>,
    ) -> Result<Vec<Value>, PipelineError> {
        let collections = self.collections.lock().unwrap();

        // Missing collection behaves as empty, not as an error
        let docs = match collections.get(collection) {
            Some(d) => d.clone(),
            None => return Ok(vec![]),
        };
        drop(collections);

        Ok(docs
            .into_iter()
            .filter(|doc| Self::matches_filter(doc, filter))
            .collect())
    }
}
