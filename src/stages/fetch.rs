use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::pipeline::{Context, Next, Outcome, PipelineError, Stage};

/// Reference to a context path inside a filter
///
/// Config form: `{"$get": "request.id"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathRef {
    #[serde(rename = "$get")]
    pub path: String,
}

/// A filter value: either a context path reference or a literal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Path(PathRef),
    Literal(Value),
}

/// Stage that looks up documents through the invocation's repository
///
/// The filter is resolved against the context first, so values can reference
/// request fields or variables written by earlier stages. Matching documents
/// are stored under the `assign` variable and the stage delegates; an empty
/// result short-circuits with NotFound.
///
/// Config form:
/// ```json
/// {
///   "fetch": {
///     "collection": "posts",
///     "filter": {"id": {"$get": "request.id"}},
///     "assign": "posts"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchStage {
    /// Collection to query
    pub collection: String,

    /// Equality filter; values may be path references or literals
    #[serde(default)]
    pub filter: HashMap<String, FilterValue>,

    /// Variable name the results are stored under
    pub assign: String,
}

impl FetchStage {
    pub fn new(collection: impl Into<String>, assign: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: HashMap::new(),
            assign: assign.into(),
        }
    }

    /// Add a filter field resolved from a context path at invocation time
    pub fn with_path_filter(mut self, field: &str, path: &str) -> Self {
        self.filter.insert(
            field.to_string(),
            FilterValue::Path(PathRef {
                path: path.to_string(),
            }),
        );
        self
    }

    /// Add a filter field with a literal value
    pub fn with_literal_filter(mut self, field: &str, value: Value) -> Self {
        self.filter.insert(field.to_string(), FilterValue::Literal(value));
        self
    }
}

#[async_trait]
impl Stage for FetchStage {
    async fn handle(&self, context: Context, next: Next) -> Outcome {
        if context.is_cancelled() {
            return Outcome::error(PipelineError::cancelled("fetch"));
        }

        // Resolve path references before touching the repository
        let mut filter = HashMap::new();
        for (field, value) in &self.filter {
            let resolved = match value {
                FilterValue::Path(reference) => match context.get_path(&reference.path) {
                    Some(v) => v.clone(),
                    None => {
                        return Outcome::error(PipelineError::path_not_found(
                            reference.path.as_str(),
                        ));
                    }
                },
                FilterValue::Literal(v) => v.clone(),
            };
            filter.insert(field.clone(), resolved);
        }

        let records = match context
            .services()
            .repository()
            .find(&self.collection, &filter)
            .await
        {
            Ok(records) => records,
            Err(error) => return Outcome::error(error),
        };

        if records.is_empty() {
            return Outcome::error(PipelineError::not_found(format!(
                "No data found in '{}'",
                self.collection
            )));
        }

        next.run(context.with_var(self.assign.clone(), Value::Array(records)))
            .await
    }
}
