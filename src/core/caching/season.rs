use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{FetchCache, FetchResult};
use crate::core::api::season_information::{get_season, SeasonRequestKey, SeasonWithEpisodes};
use crate::core::api::{ApiClient, ApiError};
use crate::core::settings_config::CacheSettings;

pub type SeasonResult = FetchResult<SeasonWithEpisodes, ApiError>;

/// Season reads shared by every view of the program
///
/// Clones share the same cache, so handing a clone to each view keeps a
/// single request in flight per season.
#[derive(Clone)]
pub struct SeasonService {
    client: ApiClient,
    cache: FetchCache<SeasonRequestKey, SeasonWithEpisodes, ApiError>,
}

impl SeasonService {
    pub fn new(client: ApiClient, settings: &CacheSettings) -> Self {
        let ttl = (settings.ttl_secs > 0).then(|| Duration::from_secs(settings.ttl_secs));
        info!(
            "season cache for '{}' with ttl {:?}",
            client.base_url(),
            ttl
        );
        Self {
            client,
            cache: FetchCache::new(ttl),
        }
    }

    pub async fn season(&self, key: SeasonRequestKey) -> SeasonResult {
        let client = &self.client;
        self.cache
            .get_or_fetch(key, || get_season(client, key))
            .await
    }

    /// The season if it has been fetched and is still fresh
    pub fn cached(&self, key: &SeasonRequestKey) -> Option<Arc<SeasonWithEpisodes>> {
        self.cache.cached(key)
    }

    pub fn invalidate(&self, key: &SeasonRequestKey) {
        self.cache.invalidate(key)
    }
}

impl std::fmt::Debug for SeasonService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeasonService")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings_config::ApiSettings;

    fn service(base_url: String) -> SeasonService {
        let client = ApiClient::new(&ApiSettings {
            base_url,
            max_retries: 0,
            ..ApiSettings::default()
        })
        .unwrap();
        SeasonService::new(client, &CacheSettings::default())
    }

    #[tokio::test]
    async fn one_request_per_season() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/tv/42/season/3")
            .with_status(200)
            .with_body(r#"{"seasonNumber": 3, "episodes": []}"#)
            .expect(1)
            .create_async()
            .await;

        let service = service(format!("{}/api", server.url()));
        let key = SeasonRequestKey::new(42, 3);

        let other_view = service.clone();
        let (first, second) = tokio::join!(service.season(key), other_view.season(key));
        let third = service.season(key).await;

        mock.assert_async().await;
        assert_eq!(first.unwrap().season_number, 3);
        assert!(second.is_ok());
        assert!(third.is_ok());
        assert!(service.cached(&key).is_some());
    }

    #[tokio::test]
    async fn invalidated_season_is_requested_again() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/tv/42/season/1")
            .with_status(200)
            .with_body(r#"{"seasonNumber": 1}"#)
            .expect(2)
            .create_async()
            .await;

        let service = service(format!("{}/api", server.url()));
        let key = SeasonRequestKey::new(42, 1);

        service.season(key).await.unwrap();
        service.invalidate(&key);
        service.season(key).await.unwrap();

        mock.assert_async().await;
    }
}
