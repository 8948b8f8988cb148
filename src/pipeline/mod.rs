/// Pipeline composition and execution types
///
/// This module contains the context threaded between stages, the outcome
/// union, the stage contract, and the composer that folds stages into one
/// callable pipeline.

mod compose;
mod context;
mod error;
mod outcome;
mod stage;

pub use compose::Pipeline;
pub use context::Context;
pub use error::PipelineError;
pub use outcome::Outcome;
pub use stage::{Next, OutcomeFuture, Stage};
