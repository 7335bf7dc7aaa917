use thiserror::Error;

/// Failures the core can report to its host.
///
/// None of these are fatal to the surrounding page: an unsupported device
/// disables the effect, a bad asset drops one image slot, a bad config falls
/// back to defaults at the call site.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("image slot {slot} could not be decoded: {reason}")]
    AssetDecode { slot: usize, reason: String },
    #[error("rendering capability unsupported: {0}")]
    Unsupported(String),
}
