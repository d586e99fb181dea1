use thiserror::Error;

/// Failure to turn a collaborator datagram into a canonical record.
/// Malformed records are logged and dropped; they never reach the core.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("malformed intake record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("intake record is not valid UTF-8")]
    Encoding,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("hand pipeline disconnected")]
    Disconnected,
    #[error("hand pipeline unavailable: {0}")]
    Unavailable(String),
}
