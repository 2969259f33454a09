//! Per-intent parameter extraction
//!
//! One strategy per intent turns an utterance (plus intent-dependent
//! collaborator data) into a validated [`PlannedAction`], or into a
//! [`Clarification`] when not enough information is present. The readiness
//! gate is encoded in the [`Extraction`] enum: a ready extraction carries an
//! executable action, a not-ready one always names its missing fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{LlmError, SchemaError};
use crate::platform::{LengthHint, PlatformError, PlaylistRef, Privacy};

pub mod make_playlist;
pub mod manage_playlist;
pub mod play_video;
pub mod remove_playlist;

/// Errors during parameter extraction
///
/// Unlike classification these propagate: there is no sensible default for a
/// half-understood mutating request. The pipeline surfaces them as a generic
/// failure response.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Model output did not match the expected schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Platform lookup failed: {0}")]
    Platform(#[from] PlatformError),
}

/// Outcome of one extraction strategy
#[derive(Debug)]
pub enum Extraction {
    /// Enough information to execute now
    Ready(PlannedAction),
    /// Ask the user for more information
    NeedsInfo(Clarification),
}

impl Extraction {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// What to ask the user when extraction is not ready
#[derive(Debug, Clone)]
pub struct Clarification {
    /// Human-readable re-prompt
    pub message: String,
    /// Field names still needed
    pub missing: Vec<String>,
    /// Partially-filled parameters, so the caller can re-prompt with context
    pub partial: serde_json::Value,
}

impl Clarification {
    pub fn new(message: impl Into<String>, missing: Vec<String>, partial: serde_json::Value) -> Self {
        let missing = if missing.is_empty() {
            // A clarification must name what it is asking for
            vec!["details".to_string()]
        } else {
            missing
        };
        Self {
            message: message.into(),
            missing,
            partial,
        }
    }
}

/// A fully-validated action, ready for the executor
#[derive(Debug, Clone)]
pub enum PlannedAction {
    MakePlaylist(MakePlaylistParams),
    RemovePlaylist { playlist: PlaylistRef },
    ManagePlaylist { playlist: PlaylistRef, op: ManageOp },
    PlayVideo(PlayVideoParams),
}

/// The confirmed sub-action of a manage-playlist request
#[derive(Debug, Clone)]
pub enum ManageOp {
    AddVideos { query: String, count: u32 },
    RemoveVideos { video_ids: Vec<String> },
    Rename { new_name: String },
}

/// Whether playlist creation should go through the roadmap planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NeedRoadmap {
    Yes,
    #[default]
    No,
}

/// Parameters for creating a playlist
///
/// `vid_count` is `None` only on the roadmap path, where the curriculum
/// length bounds the playlist instead of a user-specified count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakePlaylistParams {
    pub playlist_name: Option<String>,
    pub content_type: Option<String>,
    pub content_creator: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Privacy,
    pub vid_count: Option<u32>,
    #[serde(default)]
    pub need_roadmap: NeedRoadmap,
}

/// Parameters for immediate playback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayVideoParams {
    pub topic: Option<String>,
    pub creator: Option<String>,
    pub genre: Option<String>,
    #[serde(default)]
    pub video_length: LengthHint,
}

/// A playlist chosen by the model from a supplied list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistChoice {
    pub id: String,
    pub name: String,
}

/// Resolve a model-chosen playlist against the list it was chosen from
///
/// Guards against the model inventing an id: only a choice whose id appears
/// in the supplied list resolves.
pub(crate) fn resolve_choice(choice: &PlaylistChoice, playlists: &[PlaylistRef]) -> Option<PlaylistRef> {
    playlists.iter().find(|p| p.id == choice.id).cloned()
}
