//! Domain-level error types.

use thiserror::Error;

use crate::domain::PostId;

/// Errors raised by the post and user stores.
///
/// The HTTP layer owns the mapping from these kinds to status codes; no
/// store implementation decides a status itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("post not found: {0}")]
    NotFound(PostId),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("persistence failure: {0}")]
    Persistence(String),
}
