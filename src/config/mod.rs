/// Configuration types for conveyor
///
/// This module contains types for parsing and representing declarative
/// pipeline definitions in JSON, and for building runnable pipelines
/// from them.

mod pipeline;
mod root;

pub use pipeline::{PipelineConfig, StageConfig};
pub use root::ConveyorConfig;
