//! Action execution
//!
//! Turns a validated [`PlannedAction`] into platform operations. Every
//! branch produces a uniform [`ActionOutcome`]; platform failures surface as
//! unsuccessful outcomes, never as errors. There is no retry and no rollback
//! of earlier side effects: a playlist created before a later step fails
//! stays behind, and its URL is returned so the caller knows about it.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::{CacheInvalidator, playlist_items_key, playlists_key};
use crate::extract::{ExtractionError, MakePlaylistParams, ManageOp, NeedRoadmap, PlannedAction, PlayVideoParams};
use crate::llm::{LanguageModel, parse_json};
use crate::platform::{PlaylistRef, VideoPlatform, VideoRef};
use crate::prompts;
use crate::roadmap::RoadmapPlanner;

/// Videos fetched for an immediate playback request
const PLAY_QUEUE_COUNT: u32 = 1;

/// Uniform result of executing one action
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    /// Audit text; present only on success and only for mutating actions
    pub action_message: Option<String>,
    /// Set whenever a playlist was created, including on partial failures
    pub playlist_url: Option<String>,
    /// Videos for immediate playback
    pub videos: Option<Vec<VideoRef>>,
    /// Whether the caller should start playback
    pub play: bool,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            action_message: None,
            playlist_url: None,
            videos: None,
            play: false,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            action_message: None,
            playlist_url: None,
            videos: None,
            play: false,
        }
    }

    pub fn with_playlist_url(mut self, url: String) -> Self {
        self.playlist_url = Some(url);
        self
    }

    pub fn with_action_message(mut self, message: String) -> Self {
        self.action_message = Some(message);
        self
    }
}

/// Result of a per-item bulk operation
///
/// Per-item failures are collected, not swallowed; callers can tell exactly
/// which ids did not make it.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

/// Add videos to a playlist one by one, collecting per-item results
pub(crate) async fn bulk_add(platform: &dyn VideoPlatform, playlist_id: &str, video_ids: &[String]) -> BulkReport {
    let mut report = BulkReport::default();
    for video_id in video_ids {
        match platform.add_video(playlist_id, video_id).await {
            Ok(()) => report.succeeded.push(video_id.clone()),
            Err(e) => {
                warn!(%video_id, %playlist_id, error = %e, "bulk_add: failed to add video");
                report.failed.push(video_id.clone());
            }
        }
    }
    report
}

#[derive(Debug, Deserialize)]
struct QueryOutput {
    query: Option<String>,
}

/// Dispatches validated actions to the platform
pub struct ActionExecutor {
    llm: Arc<dyn LanguageModel>,
    platform: Arc<dyn VideoPlatform>,
    cache: Arc<dyn CacheInvalidator>,
    roadmap: RoadmapPlanner,
}

impl ActionExecutor {
    pub fn new(llm: Arc<dyn LanguageModel>, platform: Arc<dyn VideoPlatform>, cache: Arc<dyn CacheInvalidator>) -> Self {
        let roadmap = RoadmapPlanner::new(llm.clone(), platform.clone(), cache.clone());
        Self {
            llm,
            platform,
            cache,
            roadmap,
        }
    }

    /// Execute one validated action for one user
    pub async fn execute(&self, user_id: &str, action: PlannedAction) -> ActionOutcome {
        match action {
            PlannedAction::MakePlaylist(params) => match params.need_roadmap {
                NeedRoadmap::Yes => self.roadmap.build(user_id, &params).await,
                NeedRoadmap::No => self.make_simple(user_id, &params).await,
            },
            PlannedAction::RemovePlaylist { playlist } => self.remove(user_id, &playlist).await,
            PlannedAction::ManagePlaylist { playlist, op } => match op {
                ManageOp::AddVideos { query, count } => self.add_videos(user_id, &playlist, &query, count).await,
                ManageOp::RemoveVideos { video_ids } => self.remove_videos(user_id, &playlist, &video_ids).await,
                ManageOp::Rename { new_name } => self.rename(user_id, &playlist, &new_name).await,
            },
            PlannedAction::PlayVideo(params) => self.play(&params).await,
        }
    }

    /// Ask the model to turn prompt parameters into one search query
    async fn synthesize_query(&self, prompt: String) -> Result<String, ExtractionError> {
        let raw = self.llm.generate(&prompt).await?;
        let output: QueryOutput = parse_json(&raw)?;
        output
            .query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ExtractionError::Schema(crate::llm::SchemaError::Invalid("missing 'query' key".to_string())))
    }

    /// Create a playlist, search with one synthesized query, add the results
    async fn make_simple(&self, user_id: &str, params: &MakePlaylistParams) -> ActionOutcome {
        let query = match self
            .synthesize_query(prompts::playlist_query(
                params.content_type.as_deref().unwrap_or("not specified"),
                params.content_creator.as_deref().unwrap_or("not specified"),
                params.description.as_deref().unwrap_or("not specified"),
            ))
            .await
        {
            Ok(q) => q,
            Err(e) => {
                warn!(error = %e, "make_simple: query synthesis failed");
                return ActionOutcome::failure("Could not generate a search query.");
            }
        };
        info!(%query, "make_simple: search query synthesized");

        let name = params
            .playlist_name
            .as_deref()
            .or(params.description.as_deref())
            .unwrap_or("New Playlist");
        let description = params.description.as_deref().unwrap_or_default();

        // Creation failure is fatal for the whole action
        let playlist = match self.platform.create_playlist(name, description, params.privacy).await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "make_simple: playlist creation failed");
                return ActionOutcome::failure("Failed to create the playlist.");
            }
        };
        self.cache.invalidate(&[playlists_key(user_id)]).await;

        let count = params.vid_count.unwrap_or(15);
        let video_ids = match self.platform.search_videos(&query, count, Default::default()).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "make_simple: video search failed");
                return ActionOutcome::failure("Video search failed.").with_playlist_url(playlist.url());
            }
        };

        if video_ids.is_empty() {
            // The empty playlist stays behind; hand back its URL
            return ActionOutcome::failure("Could not find any videos for the generated query.")
                .with_playlist_url(playlist.url());
        }

        let report = bulk_add(self.platform.as_ref(), &playlist.id, &video_ids).await;
        self.cache
            .invalidate(&[playlist_items_key(&playlist.id), playlists_key(user_id)])
            .await;

        let added = report.succeeded.len();
        info!(added, "make_simple: playlist complete");

        let mut message = format!("Successfully created playlist and added {added} videos.");
        if !report.failed.is_empty() {
            message.push_str(&format!(
                " {} video(s) could not be added: {}.",
                report.failed.len(),
                report.failed.join(", ")
            ));
        }

        let action_message = format!(
            "Agent action: Created new playlist named \"{name}\" and added {added} videos. Playlist is available at {}.",
            playlist.url()
        );

        ActionOutcome::success(message)
            .with_playlist_url(playlist.url())
            .with_action_message(action_message)
    }

    async fn remove(&self, user_id: &str, playlist: &PlaylistRef) -> ActionOutcome {
        if let Err(e) = self.platform.delete_playlist(&playlist.id).await {
            warn!(error = %e, id = %playlist.id, "remove: deletion failed");
            return ActionOutcome::failure("Failed to delete playlist.");
        }
        self.cache
            .invalidate(&[playlists_key(user_id), playlist_items_key(&playlist.id)])
            .await;

        info!(id = %playlist.id, name = %playlist.name, "remove: playlist deleted");
        ActionOutcome::success(format!("Successfully deleted the playlist \"{}\".", playlist.name)).with_action_message(
            format!(
                "Agent action: Deleted the playlist named \"{}\" (ID: {}).",
                playlist.name, playlist.id
            ),
        )
    }

    async fn add_videos(&self, user_id: &str, playlist: &PlaylistRef, query: &str, count: u32) -> ActionOutcome {
        let video_ids = match self.platform.search_videos(query, count, Default::default()).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "add_videos: search failed");
                return ActionOutcome::failure("Video search failed.");
            }
        };

        if video_ids.is_empty() {
            // No results means no mutation at all
            return ActionOutcome::failure(format!("Could not find videos for \"{query}\"."));
        }

        let report = bulk_add(self.platform.as_ref(), &playlist.id, &video_ids).await;
        self.cache
            .invalidate(&[playlist_items_key(&playlist.id), playlists_key(user_id)])
            .await;

        let added = report.succeeded.len();
        let mut message = format!("Added {added} videos to \"{}\".", playlist.name);
        if !report.failed.is_empty() {
            message.push_str(&format!(
                " {} video(s) could not be added: {}.",
                report.failed.len(),
                report.failed.join(", ")
            ));
        }

        ActionOutcome::success(message).with_action_message(format!(
            "Agent action: Added {added} videos to playlist \"{}\".",
            playlist.name
        ))
    }

    async fn remove_videos(&self, user_id: &str, playlist: &PlaylistRef, video_ids: &[String]) -> ActionOutcome {
        let items = match self.platform.list_items(&playlist.id).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "remove_videos: item listing failed");
                return ActionOutcome::failure("Could not read the playlist's current items.");
            }
        };

        let by_video: HashMap<&str, &str> = items
            .iter()
            .map(|item| (item.video_id.as_str(), item.item_id.as_str()))
            .collect();

        // Removals are independent; one missing or failing video does not
        // abort the rest
        let mut report = BulkReport::default();
        for video_id in video_ids {
            match by_video.get(video_id.as_str()) {
                Some(item_id) => match self.platform.remove_item(item_id).await {
                    Ok(()) => report.succeeded.push(video_id.clone()),
                    Err(e) => {
                        warn!(%video_id, error = %e, "remove_videos: removal failed");
                        report.failed.push(video_id.clone());
                    }
                },
                None => {
                    warn!(%video_id, "remove_videos: video not found in playlist");
                    report.failed.push(video_id.clone());
                }
            }
        }

        if !report.succeeded.is_empty() {
            self.cache
                .invalidate(&[playlist_items_key(&playlist.id), playlists_key(user_id)])
                .await;
        }

        let removed = report.succeeded.len();
        if removed == 0 {
            return ActionOutcome::failure(format!(
                "Could not remove any of the requested videos from \"{}\".",
                playlist.name
            ));
        }

        let mut message = format!("Removed {removed} videos from \"{}\".", playlist.name);
        if !report.failed.is_empty() {
            message.push_str(&format!(
                " Could not remove {} video(s): {}.",
                report.failed.len(),
                report.failed.join(", ")
            ));
        }

        ActionOutcome::success(message).with_action_message(format!(
            "Agent action: Removed {removed} videos from playlist \"{}\".",
            playlist.name
        ))
    }

    async fn rename(&self, user_id: &str, playlist: &PlaylistRef, new_name: &str) -> ActionOutcome {
        if let Err(e) = self.platform.rename_playlist(&playlist.id, new_name).await {
            warn!(error = %e, id = %playlist.id, "rename: update failed");
            return ActionOutcome::failure("Failed to rename playlist.");
        }
        self.cache.invalidate(&[playlists_key(user_id)]).await;

        ActionOutcome::success(format!("Renamed playlist to \"{new_name}\".")).with_action_message(format!(
            "Agent action: Renamed playlist \"{}\" to \"{new_name}\".",
            playlist.name
        ))
    }

    /// No playlist is created here; the found videos go straight to playback
    async fn play(&self, params: &PlayVideoParams) -> ActionOutcome {
        let query = match self
            .synthesize_query(prompts::play_query(
                params.topic.as_deref().unwrap_or("not specified"),
                params.creator.as_deref().unwrap_or("not specified"),
                params.genre.as_deref().unwrap_or("not specified"),
            ))
            .await
        {
            Ok(q) => q,
            Err(e) => {
                warn!(error = %e, "play: query synthesis failed");
                return ActionOutcome::failure("Sorry, I couldn't formulate a search query for that.");
            }
        };
        info!(%query, "play: search query synthesized");

        let video_ids = match self
            .platform
            .search_videos(&query, PLAY_QUEUE_COUNT, params.video_length)
            .await
        {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "play: search failed");
                return ActionOutcome::failure("Video search failed.");
            }
        };

        if video_ids.is_empty() {
            return ActionOutcome::failure(format!("I couldn't find any videos for \"{query}\"."));
        }

        let videos = match self.platform.video_details(&video_ids).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!(error = %e, "play: metadata fetch failed");
                return ActionOutcome::failure("Failed to fetch video details.");
            }
        };

        let mut outcome = ActionOutcome::success(format!("Now playing videos about {query}."));
        outcome.videos = Some(videos);
        outcome.play = true;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_builders() {
        let outcome = ActionOutcome::success("done")
            .with_playlist_url("https://example.com/pl".to_string())
            .with_action_message("Agent action: something".to_string());

        assert!(outcome.success);
        assert_eq!(outcome.playlist_url.as_deref(), Some("https://example.com/pl"));
        assert!(outcome.action_message.is_some());
        assert!(!outcome.play);

        let failure = ActionOutcome::failure("nope");
        assert!(!failure.success);
        assert!(failure.action_message.is_none());
    }
}
