/// Errors produced by the `scriptgate-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// An envelope could not be encoded as JSON.
    #[error("failed to serialize envelope: {0}")]
    Serialize(#[source] serde_json::Error),
}
