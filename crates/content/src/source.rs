use async_trait::async_trait;
use thiserror::Error;

use practice_core::model::PracticeSet;

/// Errors surfaced by content sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("content request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("content payload could not be decoded: {0}")]
    Decode(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Read-only supplier of practice sets.
///
/// Sets are handed to the session engine as completed, immutable values; a
/// source is never consulted again during a running session.
#[async_trait]
pub trait PracticeSetSource: Send + Sync {
    async fn load_practice_sets(&self) -> Result<Vec<PracticeSet>, ContentError>;
}

/// Fixture-backed source for tests and the demo binary.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    sets: Vec<PracticeSet>,
}

impl InMemorySource {
    #[must_use]
    pub fn new(sets: Vec<PracticeSet>) -> Self {
        Self { sets }
    }

    /// Build a source by decoding the same JSON document the HTTP source
    /// would receive.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Decode` for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let dtos: Vec<crate::mapping::PracticeSetDto> =
            serde_json::from_str(raw).map_err(|err| ContentError::Decode(err.to_string()))?;
        Ok(Self::new(crate::mapping::sets_from_dtos(dtos)))
    }
}

#[async_trait]
impl PracticeSetSource for InMemorySource {
    async fn load_practice_sets(&self) -> Result<Vec<PracticeSet>, ContentError> {
        Ok(self.sets.clone())
    }
}
