use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::{Context, Next, Outcome, PipelineError, Stage};

/// Stage that validates the request payload against a JSON Schema
///
/// On success the context is passed downstream unchanged. On failure the
/// stage short-circuits with one Validation error per schema violation.
///
/// Config form:
/// ```json
/// {
///   "validate": {
///     "schema": {
///       "type": "object",
///       "properties": {"id": {"type": "string", "minLength": 1}},
///       "required": ["id"]
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateStage {
    /// JSON Schema the request payload must satisfy
    pub schema: Value,
}

impl ValidateStage {
    pub fn new(schema: Value) -> Self {
        Self { schema }
    }
}

#[async_trait]
impl Stage for ValidateStage {
    async fn handle(&self, context: Context, next: Next) -> Outcome {
        if context.is_cancelled() {
            return Outcome::error(PipelineError::cancelled("validate"));
        }

        let validator = match jsonschema::validator_for(&self.schema) {
            Ok(v) => v,
            Err(e) => {
                return Outcome::error(PipelineError::custom(
                    "invalid_schema",
                    format!("Failed to compile schema: {}", e),
                ));
            }
        };

        let violations: Vec<String> = validator
            .iter_errors(context.request())
            .map(|e| e.to_string())
            .collect();

        if violations.is_empty() {
            next.run(context).await
        } else {
            Outcome::errors(
                violations
                    .into_iter()
                    .map(PipelineError::validation)
                    .collect(),
            )
        }
    }
}
