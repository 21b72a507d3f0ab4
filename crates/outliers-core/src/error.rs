use thiserror::Error;

/// Detection errors.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The response indexes entries with `int32`, so inputs past that range
    /// cannot be addressed and are rejected rather than truncated.
    #[error("{0} metrics exceed the int32 index space of the response")]
    TooManyMetrics(usize),
}
