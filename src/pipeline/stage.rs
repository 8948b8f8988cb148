use std::fmt;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use super::context::Context;
use super::outcome::Outcome;

/// Boxed future produced by pipeline functions and continuations
pub type OutcomeFuture = Pin<Box<dyn Future<Output = Outcome> + Send>>;

/// The continuation handed to a stage
///
/// Wraps the rest of the pipeline as a one-shot callable: `run` consumes the
/// value, so a stage can delegate at most once and cannot delegate again
/// after returning. A stage that drops its `Next` without calling it has
/// short-circuited.
pub struct Next {
    inner: Box<dyn FnOnce(Context) -> OutcomeFuture + Send>,
}

impl Next {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: FnOnce(Context) -> OutcomeFuture + Send + 'static,
    {
        Self { inner: Box::new(f) }
    }

    /// Delegate to the rest of the pipeline with the given context
    ///
    /// Returns whatever the downstream stages return, success or error,
    /// unchanged.
    pub async fn run(self, context: Context) -> Outcome {
        (self.inner)(context).await
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// One unit of processing in a pipeline
///
/// A stage receives the in-flight context and the continuation for the rest
/// of the pipeline. It may:
/// - inspect the context and delegate unchanged: `next.run(context).await`
/// - produce a new context and delegate with that
/// - return an error outcome without touching `next` (short-circuit)
///
/// Work done before `next.run` is pre-processing; work done on its returned
/// outcome is post-processing.
#[async_trait]
pub trait Stage: Send + Sync {
    async fn handle(&self, context: Context, next: Next) -> Outcome;
}
