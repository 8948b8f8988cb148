use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::PipelineConfig;

/// Top-level configuration holding named pipeline definitions
///
/// Example:
/// ```json
/// {
///   "pipelines": {
///     "getPost": {
///       "stages": [
///         {"validate": {"schema": {"type": "object", "required": ["id"]}}},
///         {"fetch": {"collection": "posts", "filter": {"id": {"$get": "request.id"}}, "assign": "posts"}},
///         {"respond": {"status": 200, "bodyFrom": "posts.0"}}
///       ]
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConveyorConfig {
    /// Named pipeline definitions
    #[serde(default)]
    pub pipelines: HashMap<String, PipelineConfig>,
}
