use std::fmt;
use std::sync::Arc;

use super::context::Context;
use super::outcome::Outcome;
use super::stage::{Next, OutcomeFuture, Stage};

/// The composed, reentrant pipeline function
type PipelineFn = Arc<dyn Fn(Context) -> OutcomeFuture + Send + Sync>;

/// A composed pipeline: one callable built from an ordered list of stages
///
/// Composition folds the stage list from last to first around a terminal
/// stage that returns `Ok(context)` unchanged, so the first stage supplied
/// is the outermost wrapper and runs first. Stage order is fixed at
/// composition time.
///
/// The composed function holds no per-invocation state: `run` may be called
/// from any number of tasks concurrently, as long as each call gets its own
/// seeded context.
///
/// # Example
/// ```
/// use conveyor::{Context, MockRepository, Pipeline, Services};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # async fn demo() {
/// let pipeline = Pipeline::compose(vec![]);
/// let services = Services::new(Arc::new(MockRepository::new()));
/// let outcome = pipeline.run(Context::new(json!({}), services)).await;
/// assert!(outcome.is_ok());
/// # }
/// ```
#[derive(Clone)]
pub struct Pipeline {
    func: PipelineFn,
    /// Number of stages composed in, for diagnostics
    len: usize,
}

impl Pipeline {
    /// Build one pipeline function from an ordered list of stages
    ///
    /// Composition cannot fail; only invocation produces errors. Composing
    /// zero stages yields the terminal stage alone.
    pub fn compose(stages: Vec<Arc<dyn Stage>>) -> Self {
        let len = stages.len();

        // Terminal stage: always succeeds, delegates to nothing
        let mut composed: PipelineFn =
            Arc::new(|context| Box::pin(async move { Outcome::ok(context) }));

        // Fold last to first so the first supplied stage is outermost
        for stage in stages.into_iter().rev() {
            let inner = composed;
            composed = Arc::new(move |context: Context| {
                let stage = Arc::clone(&stage);
                let inner = Arc::clone(&inner);
                Box::pin(async move {
                    let next = Next::new(move |ctx| (inner.as_ref())(ctx));
                    stage.handle(context, next).await
                })
            });
        }

        Self {
            func: composed,
            len,
        }
    }

    /// Number of stages this pipeline was composed from
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Run the pipeline against a freshly seeded context
    ///
    /// Returns `Ok(final context)` if every stage delegated through to the
    /// terminal stage, or the error set from whichever stage short-circuited
    /// first.
    pub async fn run(&self, seed: Context) -> Outcome {
        (self.func.as_ref())(seed).await
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("len", &self.len).finish()
    }
}
