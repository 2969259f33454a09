//! Intent classification
//!
//! Maps a raw user utterance to one of the known intents. This is a
//! fail-soft boundary: any model, parse, or validation failure downgrades
//! the result to [`Intent::Unknown`] instead of propagating an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::{LanguageModel, parse_json};
use crate::prompts;

/// What the user wants done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    MakePlaylist,
    RemovePlaylist,
    ManagePlaylist,
    PlayVideo,
    Unknown,
}

impl Intent {
    fn from_action(action: &str) -> Option<Self> {
        match action {
            "make_playlist" => Some(Self::MakePlaylist),
            "remove_playlist" => Some(Self::RemovePlaylist),
            "manage_playlist" => Some(Self::ManagePlaylist),
            "play_video" => Some(Self::PlayVideo),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MakePlaylist => write!(f, "make_playlist"),
            Self::RemovePlaylist => write!(f, "remove_playlist"),
            Self::ManagePlaylist => write!(f, "manage_playlist"),
            Self::PlayVideo => write!(f, "play_video"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of classifying one utterance
///
/// `confidence` is only meaningful when `intent` is not `Unknown`.
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f64,
    pub reasoning: String,
    /// Cause of a fail-soft downgrade to `Unknown`, when one happened
    pub error: Option<String>,
}

impl Classification {
    fn failed(cause: impl std::fmt::Display) -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
            reasoning: "Failed to classify the task.".to_string(),
            error: Some(cause.to_string()),
        }
    }
}

/// Raw model output for one classification call
#[derive(Debug, Deserialize)]
struct RawClassification {
    action: String,
    confidence: f64,
    reasoning: String,
}

/// Classifies utterances with a single model call each
pub struct IntentClassifier<M: LanguageModel + ?Sized> {
    llm: std::sync::Arc<M>,
}

impl<M: LanguageModel + ?Sized> IntentClassifier<M> {
    pub fn new(llm: std::sync::Arc<M>) -> Self {
        Self { llm }
    }

    /// Classify one utterance
    ///
    /// Never fails: anything that goes wrong produces an `Unknown`
    /// classification carrying the cause.
    pub async fn classify(&self, utterance: &str) -> Classification {
        let prompt = prompts::classification(utterance);

        let raw = match self.llm.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "classify: model call failed");
                return Classification::failed(e);
            }
        };

        let parsed: RawClassification = match parse_json(&raw) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "classify: could not parse model output");
                return Classification::failed(e);
            }
        };

        let Some(intent) = Intent::from_action(&parsed.action) else {
            warn!(action = %parsed.action, "classify: unknown action name");
            return Classification::failed(format!("Unknown action '{}'", parsed.action));
        };

        if !(0.0..=1.0).contains(&parsed.confidence) {
            warn!(confidence = parsed.confidence, "classify: confidence out of range");
            return Classification::failed(format!("Confidence {} out of range", parsed.confidence));
        }

        if parsed.reasoning.trim().is_empty() {
            return Classification::failed("Empty reasoning");
        }

        debug!(%intent, confidence = parsed.confidence, "classify: done");
        Classification {
            intent,
            confidence: parsed.confidence,
            reasoning: parsed.reasoning,
            error: None,
        }
    }
}
