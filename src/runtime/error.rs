use thiserror::Error;

/// Failure raised by the output sink while a `printLine` statement runs.
///
/// This is the only way executing a well-formed program can fail; it is
/// propagated to the caller as-is.
#[derive(Debug, Error)]
#[error("output sink failure: {source}")]
pub struct OutputSinkError {
    #[from]
    source: std::io::Error,
}
