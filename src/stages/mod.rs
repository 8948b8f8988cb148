/// Concrete stages for request pipelines
///
/// These realize the common validate / fetch / respond shape: check the
/// request, look data up through the request-scoped repository, then build
/// a response. Each stage is also a serde type so whole pipelines can be
/// declared in JSON configuration.

mod fetch;
mod respond;
mod validate;

pub use fetch::{FetchStage, FilterValue, PathRef};
pub use respond::RespondStage;
pub use validate::ValidateStage;
