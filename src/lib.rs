/// conveyor - a composable request-pipeline library
///
/// This library provides a short-circuiting middleware pipeline: an ordered
/// list of stages is folded into a single callable, each stage wrapping the
/// next. A stage can transform the immutable context and delegate, or stop
/// the chain with one or more errors. Pipelines can be composed in code or
/// declared in JSON configuration.

pub mod config;
pub mod pipeline;
pub mod services;
pub mod stages;

// Re-export commonly used types
pub use config::{ConveyorConfig, PipelineConfig, StageConfig};
pub use pipeline::{Context, Next, Outcome, Pipeline, PipelineError, Stage};
pub use services::{MockRepository, Repository, Services};
pub use stages::{FetchStage, RespondStage, ValidateStage};
