//! Video platform client
//!
//! The [`VideoPlatform`] trait is the seam between the pipeline and the
//! hosting platform's API. Playlist and video records are read snapshots
//! owned by the platform; the pipeline never caches them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod youtube;

pub use youtube::YouTubeClient;

/// Errors from platform API calls
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Playlist visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    #[default]
    Private,
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// Desired video length for search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthHint {
    Short,
    Medium,
    Long,
    #[default]
    Any,
}

impl LengthHint {
    /// Platform search parameter value, if this hint constrains the search
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Self::Short => Some("short"),
            Self::Medium => Some("medium"),
            Self::Long => Some("long"),
            Self::Any => None,
        }
    }
}

/// A read snapshot of a playlist owned by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_count: Option<u32>,
}

impl PlaylistRef {
    /// Public URL of the playlist
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/playlist?list={}", self.id)
    }
}

/// One entry of a playlist
///
/// `item_id` is the platform-internal membership id; deleting an entry
/// requires it, not the video id.
#[derive(Debug, Clone)]
pub struct PlaylistItem {
    pub item_id: String,
    pub video_id: String,
    pub title: String,
}

/// Full metadata of a video, as needed for playback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    /// ISO-8601 duration as reported by the platform (e.g. "PT4M13S")
    pub duration: String,
    pub watch_url: String,
}

/// Operations the pipeline performs against the hosting platform
///
/// Listing calls paginate to completion transparently; metadata fetches are
/// batched under the platform's per-call id limit.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Search for up to `count` videos, returning their ids
    async fn search_videos(&self, query: &str, count: u32, length: LengthHint) -> Result<Vec<String>, PlatformError>;

    /// Search for the single best video for a query
    async fn search_top_video(&self, query: &str) -> Result<Option<String>, PlatformError>;

    /// Create an empty playlist
    async fn create_playlist(&self, name: &str, description: &str, privacy: Privacy)
    -> Result<PlaylistRef, PlatformError>;

    /// Delete a playlist by id
    async fn delete_playlist(&self, playlist_id: &str) -> Result<(), PlatformError>;

    /// List the caller's playlists
    async fn list_playlists(&self) -> Result<Vec<PlaylistRef>, PlatformError>;

    /// List every item of a playlist
    async fn list_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>, PlatformError>;

    /// Add one video to a playlist
    async fn add_video(&self, playlist_id: &str, video_id: &str) -> Result<(), PlatformError>;

    /// Remove one playlist entry by its item id
    async fn remove_item(&self, item_id: &str) -> Result<(), PlatformError>;

    /// Change a playlist's title
    async fn rename_playlist(&self, playlist_id: &str, new_name: &str) -> Result<(), PlatformError>;

    /// Fetch full metadata for a set of video ids
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoRef>, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privacy_display() {
        assert_eq!(Privacy::Public.to_string(), "public");
        assert_eq!(Privacy::Private.to_string(), "private");
        assert_eq!(Privacy::default(), Privacy::Private);
    }

    #[test]
    fn test_length_hint_param() {
        assert_eq!(LengthHint::Short.as_param(), Some("short"));
        assert_eq!(LengthHint::Any.as_param(), None);
        assert_eq!(LengthHint::default(), LengthHint::Any);
    }

    #[test]
    fn test_playlist_url() {
        let playlist = PlaylistRef {
            id: "PL123".to_string(),
            name: "Test".to_string(),
            description: None,
            video_count: None,
        };
        assert_eq!(playlist.url(), "https://www.youtube.com/playlist?list=PL123");
    }
}
