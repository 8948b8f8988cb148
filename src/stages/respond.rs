use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::pipeline::{Context, Next, Outcome, PipelineError, Stage};

/// Stage that builds the response from a context value, then delegates
///
/// The body is read from `bodyFrom`, a dot path into the context, so this
/// stage usually follows a fetch stage that assigned the data.
///
/// Config form:
/// ```json
/// {
///   "respond": {
///     "status": 200,
///     "headers": {"Content-Type": "application/json"},
///     "bodyFrom": "posts.0"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondStage {
    /// Status code recorded on the response
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, Value>,

    /// Context path supplying the response body
    pub body_from: String,
}

impl RespondStage {
    pub fn new(status: u16, body_from: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body_from: body_from.into(),
        }
    }

    /// Add a response header
    pub fn with_header(mut self, name: &str, value: Value) -> Self {
        self.headers.insert(name.to_string(), value);
        self
    }
}

#[async_trait]
impl Stage for RespondStage {
    async fn handle(&self, context: Context, next: Next) -> Outcome {
        if context.is_cancelled() {
            return Outcome::error(PipelineError::cancelled("respond"));
        }

        let body = match context.get_path(&self.body_from) {
            Some(value) => value.clone(),
            None => {
                return Outcome::error(PipelineError::path_not_found(self.body_from.as_str()));
            }
        };

        let response = json!({
            "status": self.status,
            "headers": self.headers,
            "body": body,
        });

        next.run(context.with_response(response)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::services::{MockRepository, Services};
    use std::sync::Arc;

    fn seed(request: Value) -> Context {
        Context::new(request, Services::new(Arc::new(MockRepository::new())))
    }

    #[tokio::test]
    async fn test_populates_response_from_path() {
        let pipeline = Pipeline::compose(vec![Arc::new(RespondStage::new(200, "posts.0"))]);

        let context = seed(json!({}))
            .with_var("posts", json!([{"id": "1", "title": "First"}]));
        let result = pipeline.run(context).await.into_result().unwrap();

        assert_eq!(
            result.response(),
            Some(&json!({
                "status": 200,
                "headers": {},
                "body": {"id": "1", "title": "First"}
            }))
        );
    }

    #[tokio::test]
    async fn test_headers_included() {
        let stage = RespondStage::new(201, "request")
            .with_header("Content-Type", json!("application/json"));
        let pipeline = Pipeline::compose(vec![Arc::new(stage)]);

        let result = pipeline
            .run(seed(json!({"ok": true})))
            .await
            .into_result()
            .unwrap();
        assert_eq!(
            result.response().unwrap()["headers"]["Content-Type"],
            json!("application/json")
        );
    }

    #[tokio::test]
    async fn test_missing_body_path_short_circuits() {
        let pipeline = Pipeline::compose(vec![Arc::new(RespondStage::new(200, "posts.0"))]);

        let errors = pipeline
            .run(seed(json!({})))
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(errors, vec![PipelineError::path_not_found("posts.0")]);
    }
}
