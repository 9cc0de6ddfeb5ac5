use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{deserialize_json, ApiClient, ApiError};

const SEASON_ADDRESS: &str = "/v1/tv/SHOW-ID/season/SEASON";

/// Identifies one season of one show on the server
///
/// This is also the key under which a season is cached and the key that
/// decides whether a view has to reset and refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeasonRequestKey {
    pub show_id: u32,
    pub season_number: u32,
}

impl SeasonRequestKey {
    pub fn new(show_id: u32, season_number: u32) -> Self {
        Self {
            show_id,
            season_number,
        }
    }

    /// The api path of the season this key refers to
    pub fn path(&self) -> String {
        SEASON_ADDRESS
            .replace("SHOW-ID", &self.show_id.to_string())
            .replace("SEASON", &self.season_number.to_string())
    }

    /// The key of the following season of the same show
    pub fn next(&self) -> Self {
        Self::new(self.show_id, self.season_number.saturating_add(1))
    }

    /// The key of the preceding season of the same show, if any
    ///
    /// Seasons are numbered from 1, so there is nothing before season 1.
    pub fn previous(&self) -> Option<Self> {
        (self.season_number > 1).then(|| Self::new(self.show_id, self.season_number - 1))
    }
}

impl std::fmt::Display for SeasonRequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tv/{}/season/{}", self.show_id, self.season_number)
    }
}

/// # An `Episode` as the server describes it
///
/// Only `id`, `episode_number` and `name` are guaranteed, everything else may
/// be missing for episodes that have not been fully documented yet.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: u32,
    pub episode_number: u32,
    pub name: String,
    #[serde(default)]
    pub air_date: Option<NaiveDate>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonWithEpisodes {
    #[serde(default)]
    pub id: Option<u32>,
    pub season_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<NaiveDate>,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Kept in the exact order the server sent them
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

pub async fn get_season(
    client: &ApiClient,
    key: SeasonRequestKey,
) -> Result<SeasonWithEpisodes, ApiError> {
    let prettified_json = client.get_pretty_json(&key.path()).await?;
    deserialize_json(&prettified_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings_config::ApiSettings;

    const SEASON_JSON: &str = r#"{
        "id": 3572,
        "seasonNumber": 1,
        "name": "Season 1",
        "airDate": "2008-01-20",
        "episodes": [
            {"id": 1, "episodeNumber": 1, "name": "Pilot", "airDate": null, "voteAverage": 8.1},
            {"id": 2, "episodeNumber": 2, "name": "Second", "airDate": "2020-01-02", "showId": 1396}
        ]
    }"#;

    fn client(base_url: String) -> ApiClient {
        ApiClient::new(&ApiSettings {
            base_url,
            api_key: Some("secret".to_owned()),
            max_retries: 0,
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn key_builds_season_path() {
        assert_eq!(SeasonRequestKey::new(1396, 2).path(), "/v1/tv/1396/season/2");
        assert_eq!(SeasonRequestKey::new(1396, 2).to_string(), "tv/1396/season/2");
    }

    #[test]
    fn key_navigation_stays_positive() {
        let first = SeasonRequestKey::new(7, 1);
        assert_eq!(first.previous(), None);
        assert_eq!(first.next(), SeasonRequestKey::new(7, 2));
        assert_eq!(first.next().previous(), Some(first));
    }

    #[test]
    fn season_keeps_server_episode_order() {
        let season: SeasonWithEpisodes = serde_json::from_str(SEASON_JSON).unwrap();

        assert_eq!(season.season_number, 1);
        let names: Vec<&str> = season.episodes.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Pilot", "Second"]);
        assert_eq!(season.episodes[0].air_date, None);
        assert_eq!(
            season.episodes[1].air_date,
            NaiveDate::from_ymd_opt(2020, 1, 2)
        );
    }

    #[test]
    fn missing_episodes_decode_as_empty() {
        let season: SeasonWithEpisodes = serde_json::from_str(r#"{"seasonNumber": 4}"#).unwrap();
        assert!(season.episodes.is_empty());
    }

    #[tokio::test]
    async fn fetches_season_with_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/tv/1396/season/1")
            .match_header("x-api-key", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SEASON_JSON)
            .create_async()
            .await;

        let client = client(format!("{}/api", server.url()));
        let season = get_season(&client, SeasonRequestKey::new(1396, 1))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(season.episodes.len(), 2);
        assert_eq!(season.name.as_deref(), Some("Season 1"));
    }

    #[tokio::test]
    async fn not_found_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/tv/1/season/99")
            .with_status(404)
            .with_body(r#"{"message":"Season not found."}"#)
            .create_async()
            .await;

        let client = client(format!("{}/api", server.url()));
        match get_season(&client, SeasonRequestKey::new(1, 99)).await {
            Err(ApiError::BadResponse { status, message }) => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(message, "Season not found.");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_without_body_is_a_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/tv/1/season/1")
            .with_status(500)
            .create_async()
            .await;

        let client = client(format!("{}/api", server.url()));
        assert!(matches!(
            get_season(&client, SeasonRequestKey::new(1, 1)).await,
            Err(ApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
        ));
    }

    #[tokio::test]
    async fn malformed_bodies_fail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/tv/1/season/1")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/tv/1/season/2")
            .with_status(200)
            .with_body(r#"{"seasonNumber": 2, "episodes": [{"id": 1}]}"#)
            .create_async()
            .await;

        let client = client(format!("{}/api", server.url()));
        assert!(matches!(
            get_season(&client, SeasonRequestKey::new(1, 1)).await,
            Err(ApiError::InvalidJson(_))
        ));
        assert!(matches!(
            get_season(&client, SeasonRequestKey::new(1, 2)).await,
            Err(ApiError::Deserialization(_, _))
        ));
    }
}
