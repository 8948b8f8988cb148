use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::pipeline::{Pipeline, Stage};
use crate::stages::{FetchStage, RespondStage, ValidateStage};

/// Ordered stage list for one pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Stages in execution order
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

impl PipelineConfig {
    /// Compose the declared stages into a runnable pipeline
    ///
    /// Declaration order is execution order, and building never fails.
    pub fn build(&self) -> Pipeline {
        Pipeline::compose(self.stages.iter().map(StageConfig::to_stage).collect())
    }
}

/// One declared stage
///
/// Uses external tagging, so the stage kind is the JSON key:
/// `{"fetch": {...}}`, `{"validate": {...}}`, `{"respond": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageConfig {
    #[serde(rename = "validate")]
    Validate(ValidateStage),
    #[serde(rename = "fetch")]
    Fetch(FetchStage),
    #[serde(rename = "respond")]
    Respond(RespondStage),
}

impl StageConfig {
    /// The declared stage as a composable trait object
    pub fn to_stage(&self) -> Arc<dyn Stage> {
        match self {
            StageConfig::Validate(stage) => Arc::new(stage.clone()),
            StageConfig::Fetch(stage) => Arc::new(stage.clone()),
            StageConfig::Respond(stage) => Arc::new(stage.clone()),
        }
    }
}
