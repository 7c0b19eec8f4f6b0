use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use practice_core::model::PracticeSet;

use crate::mapping::{sets_from_dtos, PracticeSetDto};
use crate::source::{ContentError, PracticeSetSource};

/// Configuration for the remote content endpoint.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
}

impl RemoteConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// HTTP-backed practice set source.
///
/// Fetches the full catalog in one request; retry and backoff policy belongs
/// to the caller.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    config: RemoteConfig,
}

impl HttpSource {
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn sets_url(&self) -> String {
        format!("{}/practice-sets", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PracticeSetSource for HttpSource {
    async fn load_practice_sets(&self) -> Result<Vec<PracticeSet>, ContentError> {
        let url = self.sets_url();
        debug!(%url, "loading practice sets");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ContentError::Status(response.status()));
        }

        let dtos: Vec<PracticeSetDto> = response.json().await?;
        let sets = sets_from_dtos(dtos);
        debug!(count = sets.len(), "practice sets loaded");
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_join_handles_trailing_slash() {
        let source = HttpSource::new(RemoteConfig::new("https://api.example.com/v1/"));
        assert_eq!(source.sets_url(), "https://api.example.com/v1/practice-sets");
    }
}
