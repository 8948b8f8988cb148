use serde_json::Value;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

use crate::pipeline::PipelineError;
use crate::services::Services;

/// In-flight state threaded through every stage of a pipeline
///
/// The context is immutable - methods that modify it return a new Context.
/// A stage that wants to pass data downstream builds a structural copy with
/// `with_var` or `with_response` and hands that to `next`; the value it was
/// given is never changed underneath it.
///
/// Each invocation seeds its own context, so concurrent invocations of the
/// same pipeline never share one.
#[derive(Debug, Clone)]
pub struct Context {
    /// The original request payload, fixed at seeding time
    request: Value,
    /// Values computed by earlier stages
    variables: HashMap<String, Value>,
    /// The response, once a stage has produced one
    response: Option<Value>,
    /// Request-scoped dependency handle
    services: Services,
    /// Advisory cancellation signal; stages check it and abort promptly
    cancellation: CancellationToken,
}

impl Context {
    /// Seed a context for one invocation
    ///
    /// # Example
    /// ```
    /// use conveyor::{Context, MockRepository, Services};
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// let services = Services::new(Arc::new(MockRepository::new()));
    /// let ctx = Context::new(json!({"id": "123"}), services);
    /// assert_eq!(ctx.request(), &json!({"id": "123"}));
    /// ```
    pub fn new(request: Value, services: Services) -> Self {
        Self {
            request,
            variables: HashMap::new(),
            response: None,
            services,
            cancellation: CancellationToken::new(),
        }
    }

    /// Attach an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Create a copy of this context with a variable set
    pub fn with_var(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Create a copy of this context with the response set
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    /// The original request payload
    pub fn request(&self) -> &Value {
        &self.request
    }

    /// The response, if a stage has produced one
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    /// The request-scoped dependencies for this invocation
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// The cancellation token threaded through this invocation
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether cancellation has been requested for this invocation
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Get a variable by name (top-level only)
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Get a value using a dot path (e.g., "request.id" or "posts.0.title")
    ///
    /// The first path segment selects the root: `request`, `response`, or
    /// the name of a variable. Remaining segments traverse nested objects
    /// and array indices.
    ///
    /// # Example
    /// ```
    /// use conveyor::{Context, MockRepository, Services};
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// let services = Services::new(Arc::new(MockRepository::new()));
    /// let ctx = Context::new(json!({"user": {"email": "user@example.com"}}), services);
    ///
    /// assert_eq!(
    ///     ctx.get_path("request.user.email").unwrap(),
    ///     &json!("user@example.com")
    /// );
    /// ```
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');

        let mut current = match parts.next()? {
            "request" => &self.request,
            "response" => self.response.as_ref()?,
            name => self.variables.get(name)?,
        };

        // Traverse the remaining segments
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => {
                    // Try to parse as array index
                    let index: usize = part.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Query the context with a JSONPath expression
    ///
    /// The query runs over a single object whose fields are every variable
    /// plus `request` and (when present) `response`. Results come back as an
    /// array, which may be empty when nothing matched.
    pub fn select(&self, path: &str) -> Result<Value, PipelineError> {
        use jsonpath_rust::JsonPath;

        let mut root = serde_json::Map::new();
        for (name, value) in &self.variables {
            root.insert(name.clone(), value.clone());
        }
        // Fixed roots win over identically named variables
        root.insert("request".to_string(), self.request.clone());
        if let Some(response) = &self.response {
            root.insert("response".to_string(), response.clone());
        }
        let root = Value::Object(root);

        let results = root.query(path).map_err(|e| {
            PipelineError::custom(
                "invalid_query",
                format!("JSONPath query failed for '{}': {}", path, e),
            )
        })?;

        Ok(Value::Array(results.into_iter().cloned().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockRepository;
    use serde_json::json;
    use std::sync::Arc;

    fn seed(request: Value) -> Context {
        Context::new(request, Services::new(Arc::new(MockRepository::new())))
    }

    #[test]
    fn test_new_context() {
        let ctx = seed(json!({"id": "1"}));
        assert_eq!(ctx.request(), &json!({"id": "1"}));
        assert!(ctx.response().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn test_with_var() {
        let ctx = seed(json!({}))
            .with_var("name", json!("Alice"))
            .with_var("age", json!(30));

        assert_eq!(ctx.get("name"), Some(&json!("Alice")));
        assert_eq!(ctx.get("age"), Some(&json!(30)));
    }

    #[test]
    fn test_with_var_leaves_original_untouched() {
        let original = seed(json!({}));
        let copy = original.clone().with_var("name", json!("Bob"));

        assert_eq!(original.get("name"), None);
        assert_eq!(copy.get("name"), Some(&json!("Bob")));
    }

    #[test]
    fn test_with_response() {
        let ctx = seed(json!({})).with_response(json!({"status": 200}));
        assert_eq!(ctx.response(), Some(&json!({"status": 200})));
    }

    #[test]
    fn test_get_path_request_root() {
        let ctx = seed(json!({
            "user": {
                "id": "123",
                "profile": {"name": "Alice"}
            }
        }));

        assert_eq!(ctx.get_path("request.user.id"), Some(&json!("123")));
        assert_eq!(
            ctx.get_path("request.user.profile.name"),
            Some(&json!("Alice"))
        );
        assert_eq!(ctx.get_path("request.user.missing"), None);
    }

    #[test]
    fn test_get_path_variable_root() {
        let ctx = seed(json!({})).with_var(
            "posts",
            json!([
                {"title": "First"},
                {"title": "Second"}
            ]),
        );

        assert_eq!(ctx.get_path("posts.0.title"), Some(&json!("First")));
        assert_eq!(ctx.get_path("posts.1.title"), Some(&json!("Second")));
        assert_eq!(ctx.get_path("posts.99"), None);
    }

    #[test]
    fn test_get_path_response_root() {
        let ctx = seed(json!({})).with_response(json!({"status": 404}));

        assert_eq!(ctx.get_path("response.status"), Some(&json!(404)));

        let no_response = seed(json!({}));
        assert_eq!(no_response.get_path("response.status"), None);
    }

    #[test]
    fn test_get_path_invalid_on_non_object() {
        let ctx = seed(json!({})).with_var("count", json!(42));

        assert_eq!(ctx.get_path("count"), Some(&json!(42)));
        assert_eq!(ctx.get_path("count.something"), None);
    }

    #[test]
    fn test_select_jsonpath() {
        let ctx = seed(json!({})).with_var(
            "posts",
            json!([
                {"title": "First", "views": 10},
                {"title": "Second", "views": 50}
            ]),
        );

        let titles = ctx.select("$.posts[*].title").unwrap();
        assert_eq!(titles, json!(["First", "Second"]));
    }

    #[test]
    fn test_select_invalid_query() {
        let ctx = seed(json!({}));
        let err = ctx.select("$[").unwrap_err();
        assert_eq!(err.code(), "invalid_query");
    }

    #[test]
    fn test_cancellation_token() {
        let token = CancellationToken::new();
        let ctx = seed(json!({})).with_cancellation(token.clone());

        assert!(!ctx.is_cancelled());
        token.cancel();
        assert!(ctx.is_cancelled());
    }
}
