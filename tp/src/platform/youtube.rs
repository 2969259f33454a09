//! YouTube Data API v3 client implementation
//!
//! Implements the VideoPlatform trait over the REST API with bearer-token
//! auth. Listing endpoints paginate with `pageToken` at the API's page size
//! of 50; video metadata is fetched in batches of at most 50 ids per call.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{LengthHint, PlatformError, PlaylistItem, PlaylistRef, Privacy, VideoPlatform, VideoRef};
use crate::config::PlatformConfig;

/// API page size for listing endpoints
const PAGE_SIZE: u32 = 50;

/// Maximum ids per videos.list call
const DETAILS_BATCH: usize = 50;

/// YouTube Data API client
pub struct YouTubeClient {
    base_url: String,
    access_token: String,
    http: Client,
}

impl YouTubeClient {
    /// Create a new client from configuration
    ///
    /// The access token must already be valid; acquisition and refresh are
    /// the surrounding application's concern.
    pub fn from_config(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let access_token = config
            .access_token()
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(PlatformError::Network)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            access_token,
            http,
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, PlatformError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T, PlatformError> {
        let response = self
            .http
            .get(self.url(resource))
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        Ok(Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?)
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search_videos(&self, query: &str, count: u32, length: LengthHint) -> Result<Vec<String>, PlatformError> {
        debug!(%query, count, "search_videos: called");
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("type", "video".to_string()),
            ("videoDefinition", "high".to_string()),
            ("maxResults", count.to_string()),
        ];
        if let Some(duration) = length.as_param() {
            params.push(("videoDuration", duration.to_string()));
        }

        let page: SearchPage = self.get_json("search", &params).await?;
        let ids: Vec<String> = page.items.into_iter().filter_map(|item| item.id.video_id).collect();
        debug!(found = ids.len(), "search_videos: done");
        Ok(ids)
    }

    async fn search_top_video(&self, query: &str) -> Result<Option<String>, PlatformError> {
        debug!(%query, "search_top_video: called");
        let ids = self.search_videos(query, 1, LengthHint::Any).await?;
        Ok(ids.into_iter().next())
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<PlaylistRef, PlatformError> {
        info!(%name, %privacy, "create_playlist: called");
        let body = serde_json::json!({
            "snippet": { "title": name, "description": description },
            "status": { "privacyStatus": privacy.to_string() },
        });

        let response = self
            .http
            .post(self.url("playlists"))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet,status")])
            .json(&body)
            .send()
            .await?;

        let created: PlaylistResource = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(e.to_string()))?;

        debug!(id = %created.id, "create_playlist: created");
        Ok(map_playlist(created))
    }

    async fn delete_playlist(&self, playlist_id: &str) -> Result<(), PlatformError> {
        info!(%playlist_id, "delete_playlist: called");
        let response = self
            .http
            .delete(self.url("playlists"))
            .bearer_auth(&self.access_token)
            .query(&[("id", playlist_id)])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn list_playlists(&self) -> Result<Vec<PlaylistRef>, PlatformError> {
        debug!("list_playlists: called");
        let mut playlists = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("part", "snippet,contentDetails".to_string()),
                ("mine", "true".to_string()),
                ("maxResults", PAGE_SIZE.to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: PlaylistPage = self.get_json("playlists", &params).await?;
            playlists.extend(page.items.into_iter().map(map_playlist));

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!(found = playlists.len(), "list_playlists: done");
        Ok(playlists)
    }

    async fn list_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>, PlatformError> {
        debug!(%playlist_id, "list_items: called");
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("part", "snippet".to_string()),
                ("playlistId", playlist_id.to_string()),
                ("maxResults", PAGE_SIZE.to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: ItemPage = self.get_json("playlistItems", &params).await?;
            items.extend(page.items.into_iter().map(|item| PlaylistItem {
                item_id: item.id,
                video_id: item.snippet.resource_id.video_id,
                title: item.snippet.title,
            }));

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!(found = items.len(), "list_items: done");
        Ok(items)
    }

    async fn add_video(&self, playlist_id: &str, video_id: &str) -> Result<(), PlatformError> {
        debug!(%playlist_id, %video_id, "add_video: called");
        let body = serde_json::json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": { "kind": "youtube#video", "videoId": video_id },
            },
        });

        let response = self
            .http
            .post(self.url("playlistItems"))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet")])
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn remove_item(&self, item_id: &str) -> Result<(), PlatformError> {
        debug!(%item_id, "remove_item: called");
        let response = self
            .http
            .delete(self.url("playlistItems"))
            .bearer_auth(&self.access_token)
            .query(&[("id", item_id)])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn rename_playlist(&self, playlist_id: &str, new_name: &str) -> Result<(), PlatformError> {
        info!(%playlist_id, %new_name, "rename_playlist: called");
        let body = serde_json::json!({
            "id": playlist_id,
            "snippet": { "title": new_name },
        });

        let response = self
            .http
            .put(self.url("playlists"))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet")])
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoRef>, PlatformError> {
        debug!(count = video_ids.len(), "video_details: called");
        let mut videos = Vec::new();

        for chunk in video_ids.chunks(DETAILS_BATCH) {
            let params = vec![
                ("part", "snippet,contentDetails".to_string()),
                ("id", chunk.join(",")),
            ];
            let page: VideoPage = self.get_json("videos", &params).await?;
            videos.extend(page.items.into_iter().map(map_video));
        }

        Ok(videos)
    }
}

fn map_playlist(resource: PlaylistResource) -> PlaylistRef {
    PlaylistRef {
        id: resource.id,
        name: resource.snippet.title,
        description: resource.snippet.description,
        video_count: resource.content_details.map(|d| d.item_count),
    }
}

fn map_video(resource: VideoResource) -> VideoRef {
    let watch_url = format!("https://www.youtube.com/watch?v={}", resource.id);
    VideoRef {
        id: resource.id,
        title: resource.snippet.title,
        thumbnail_url: resource
            .snippet
            .thumbnails
            .and_then(|t| t.default)
            .map(|t| t.url)
            .unwrap_or_default(),
        duration: resource.content_details.duration,
        watch_url,
    }
}

// YouTube API response types

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
struct SearchResultId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<PlaylistResource>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    id: String,
    snippet: PlaylistSnippet,
    #[serde(rename = "contentDetails")]
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    title: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistContentDetails {
    #[serde(rename = "itemCount")]
    item_count: u32,
}

#[derive(Debug, Deserialize)]
struct ItemPage {
    #[serde(default)]
    items: Vec<ItemResource>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemResource {
    id: String,
    snippet: ItemSnippet,
}

#[derive(Debug, Deserialize)]
struct ItemSnippet {
    title: String,
    #[serde(rename = "resourceId")]
    resource_id: ItemResourceId,
}

#[derive(Debug, Deserialize)]
struct ItemResourceId {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoPage {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
    snippet: VideoSnippet,
    #[serde(rename = "contentDetails")]
    content_details: VideoContentDetails,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: String,
}
