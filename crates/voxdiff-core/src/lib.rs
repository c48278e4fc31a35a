//! Shared HTTP plumbing for the VoxDiff crates

mod error;
mod payload;

pub use error::{ErrorBody, ErrorDetails, HttpError, error_response};
pub use payload::{BODY_LIMIT_BYTES, ExtractPayload};
