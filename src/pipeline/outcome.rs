use super::context::Context;
use super::error::PipelineError;

/// Result of running a pipeline or a single stage
///
/// Exactly one variant is populated: either every stage delegated through to
/// the terminal stage (`Ok`), or some stage short-circuited with one or more
/// errors (`Error`). The pipeline never panics or throws; all failure travels
/// through this value.
#[derive(Debug)]
pub enum Outcome {
    /// Every stage delegated; the final context
    Ok(Context),
    /// A stage short-circuited with one or more error descriptors
    Error(Vec<PipelineError>),
}

impl Outcome {
    /// Successful outcome carrying the final context
    pub fn ok(context: Context) -> Self {
        Self::Ok(context)
    }

    /// Error outcome with a single descriptor
    pub fn error(error: PipelineError) -> Self {
        Self::Error(vec![error])
    }

    /// Error outcome with one or more descriptors
    pub fn errors(errors: Vec<PipelineError>) -> Self {
        Self::Error(errors)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// The final context, if this outcome is successful
    pub fn context(&self) -> Option<&Context> {
        match self {
            Outcome::Ok(context) => Some(context),
            Outcome::Error(_) => None,
        }
    }

    /// Branch on the outcome, calling exactly one of the two handlers
    ///
    /// # Example
    /// ```
    /// use conveyor::{Context, MockRepository, Outcome, Services};
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// let services = Services::new(Arc::new(MockRepository::new()));
    /// let outcome = Outcome::ok(Context::new(json!({}), services));
    ///
    /// let status = outcome.resolve(
    ///     |_context| 200,
    ///     |_errors| 500,
    /// );
    /// assert_eq!(status, 200);
    /// ```
    pub fn resolve<T>(
        self,
        on_ok: impl FnOnce(Context) -> T,
        on_error: impl FnOnce(Vec<PipelineError>) -> T,
    ) -> T {
        match self {
            Outcome::Ok(context) => on_ok(context),
            Outcome::Error(errors) => on_error(errors),
        }
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<Context, Vec<PipelineError>> {
        match self {
            Outcome::Ok(context) => Ok(context),
            Outcome::Error(errors) => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockRepository, Services};
    use serde_json::json;
    use std::sync::Arc;

    fn seed() -> Context {
        Context::new(json!({}), Services::new(Arc::new(MockRepository::new())))
    }

    #[test]
    fn test_resolve_calls_ok_handler() {
        let outcome = Outcome::ok(seed().with_var("n", json!(1)));

        let value = outcome.resolve(
            |context| context.get("n").cloned(),
            |_errors| panic!("error handler must not run"),
        );
        assert_eq!(value, Some(json!(1)));
    }

    #[test]
    fn test_resolve_calls_error_handler() {
        let outcome = Outcome::error(PipelineError::not_found("nothing here"));

        let codes = outcome.resolve(
            |_context| panic!("ok handler must not run"),
            |errors| errors.iter().map(|e| e.code().to_string()).collect::<Vec<_>>(),
        );
        assert_eq!(codes, vec!["not_found"]);
    }

    #[test]
    fn test_errors_keeps_all_descriptors() {
        let outcome = Outcome::errors(vec![
            PipelineError::validation("title missing"),
            PipelineError::validation("id missing"),
        ]);

        assert!(outcome.is_error());
        let errors = outcome.into_result().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_into_result_ok() {
        let context = seed();
        assert!(Outcome::ok(context).into_result().is_ok());
    }

    #[test]
    fn test_accessors() {
        let ok = Outcome::ok(seed());
        assert!(ok.is_ok());
        assert!(ok.context().is_some());

        let err = Outcome::error(PipelineError::service("down"));
        assert!(err.is_error());
        assert!(err.context().is_none());
    }
}
