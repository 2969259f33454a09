//! Extraction strategy for playlist management
//!
//! An explicit two-stage pipeline. The triage stage identifies the target
//! playlist and the kind of modification; the action-specific stage derives
//! the operation's own parameters. Removing videos needs the playlist's
//! current items (ids and titles) fetched first so the model can match the
//! user's description against real entries.

use serde::Deserialize;
use tracing::debug;

use super::{Clarification, Extraction, ExtractionError, ManageOp, PlannedAction, PlaylistChoice, resolve_choice};
use crate::llm::{LanguageModel, parse_json};
use crate::platform::{PlaylistRef, VideoPlatform};
use crate::prompts;

/// Default number of videos to add when the user gave no count
const DEFAULT_ADD_COUNT: u32 = 5;

/// The modification kinds the triage stage can confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TriageAction {
    AddVideos,
    RemoveVideos,
    RenamePlaylist,
}

#[derive(Debug, Deserialize)]
struct TriageOutput {
    playlist: Option<PlaylistChoice>,
    action: Option<TriageAction>,
}

#[derive(Debug, Deserialize)]
struct AddVideosOutput {
    search_query: Option<String>,
    video_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RemoveVideosOutput {
    #[serde(default)]
    video_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RenameOutput {
    new_name: Option<String>,
}

/// Extract a manage-playlist operation from one utterance
///
/// Triage failure (null playlist or null action) is not ready regardless of
/// which action-specific stage would have run.
pub async fn extract(
    llm: &dyn LanguageModel,
    platform: &dyn VideoPlatform,
    utterance: &str,
    playlists: &[PlaylistRef],
) -> Result<Extraction, ExtractionError> {
    let listing: Vec<serde_json::Value> = playlists
        .iter()
        .map(|p| serde_json::json!({ "id": p.id, "name": p.name }))
        .collect();
    let listing_json = serde_json::to_string_pretty(&listing).unwrap_or_default();

    let raw = llm.generate(&prompts::manage_triage(utterance, &listing_json)).await?;
    let triage: TriageOutput = parse_json(&raw)?;

    let resolved = triage
        .playlist
        .as_ref()
        .and_then(|choice| resolve_choice(choice, playlists));

    let (playlist, action) = match (resolved, triage.action) {
        (Some(playlist), Some(action)) => (playlist, action),
        (playlist, action) => {
            debug!(playlist_found = playlist.is_some(), ?action, "extract: triage incomplete");
            let mut missing = Vec::new();
            if playlist.is_none() {
                missing.push("playlist".to_string());
            }
            if action.is_none() {
                missing.push("action".to_string());
            }
            return Ok(Extraction::NeedsInfo(Clarification::new(
                "Sorry, I couldn't figure out which playlist to modify or how. Please be more specific.",
                missing,
                serde_json::json!({ "playlist": triage.playlist }),
            )));
        }
    };

    debug!(playlist = %playlist.name, ?action, "extract: triage resolved");
    match action {
        TriageAction::AddVideos => extract_add(llm, utterance, playlist).await,
        TriageAction::RemoveVideos => extract_remove(llm, platform, utterance, playlist).await,
        TriageAction::RenamePlaylist => extract_rename(llm, utterance, playlist).await,
    }
}

async fn extract_add(
    llm: &dyn LanguageModel,
    utterance: &str,
    playlist: PlaylistRef,
) -> Result<Extraction, ExtractionError> {
    let raw = llm.generate(&prompts::manage_add_videos(utterance)).await?;
    let output: AddVideosOutput = parse_json(&raw)?;

    let Some(query) = output.search_query.filter(|q| !q.trim().is_empty()) else {
        return Ok(Extraction::NeedsInfo(Clarification::new(
            "What should I add to the playlist?",
            vec!["search_query".to_string()],
            serde_json::json!({ "playlist": playlist.name }),
        )));
    };

    Ok(Extraction::Ready(PlannedAction::ManagePlaylist {
        playlist,
        op: ManageOp::AddVideos {
            query,
            count: output.video_count.unwrap_or(DEFAULT_ADD_COUNT),
        },
    }))
}

async fn extract_remove(
    llm: &dyn LanguageModel,
    platform: &dyn VideoPlatform,
    utterance: &str,
    playlist: PlaylistRef,
) -> Result<Extraction, ExtractionError> {
    let items = platform.list_items(&playlist.id).await?;
    let listing: Vec<serde_json::Value> = items
        .iter()
        .map(|i| serde_json::json!({ "video_id": i.video_id, "title": i.title }))
        .collect();
    let listing_json = serde_json::to_string_pretty(&listing).unwrap_or_default();

    let raw = llm
        .generate(&prompts::manage_remove_videos(utterance, &listing_json))
        .await?;
    let output: RemoveVideosOutput = parse_json(&raw)?;

    // Keep only ids that actually exist in the playlist
    let video_ids: Vec<String> = output
        .video_ids
        .into_iter()
        .filter(|id| items.iter().any(|i| &i.video_id == id))
        .collect();

    if video_ids.is_empty() {
        return Ok(Extraction::NeedsInfo(Clarification::new(
            "I couldn't match any videos in that playlist to your description. Which ones should go?",
            vec!["video_ids".to_string()],
            serde_json::json!({ "playlist": playlist.name }),
        )));
    }

    debug!(count = video_ids.len(), "extract_remove: matched targets");
    Ok(Extraction::Ready(PlannedAction::ManagePlaylist {
        playlist,
        op: ManageOp::RemoveVideos { video_ids },
    }))
}

async fn extract_rename(
    llm: &dyn LanguageModel,
    utterance: &str,
    playlist: PlaylistRef,
) -> Result<Extraction, ExtractionError> {
    let raw = llm.generate(&prompts::manage_rename(utterance)).await?;
    let output: RenameOutput = parse_json(&raw)?;

    let Some(new_name) = output.new_name.filter(|n| !n.trim().is_empty()) else {
        return Ok(Extraction::NeedsInfo(Clarification::new(
            "What should the playlist be renamed to?",
            vec!["new_name".to_string()],
            serde_json::json!({ "playlist": playlist.name }),
        )));
    };

    Ok(Extraction::Ready(PlannedAction::ManagePlaylist {
        playlist,
        op: ManageOp::Rename { new_name },
    }))
}
