//! Chat pipeline
//!
//! Classification strictly precedes extraction, extraction strictly precedes
//! execution, all within one request; nothing is shared between concurrent
//! requests. The response shape here is what a web layer would serialize as
//! its HTTP body.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::audit::AuditSink;
use crate::cache::CacheInvalidator;
use crate::executor::{ActionExecutor, ActionOutcome};
use crate::extract::{self, Clarification, Extraction, ExtractionError};
use crate::intent::{Intent, IntentClassifier};
use crate::llm::LanguageModel;
use crate::platform::{VideoPlatform, VideoRef};

/// Response to one chat prompt
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_more_info: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_parameters: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoRef>>,
}

impl ChatResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            needs_more_info: None,
            current_parameters: None,
            playlist_url: None,
            action: None,
            videos: None,
        }
    }

    fn clarification(c: Clarification) -> Self {
        Self {
            success: false,
            message: c.message,
            needs_more_info: Some(true),
            current_parameters: Some(c.partial),
            playlist_url: None,
            action: None,
            videos: None,
        }
    }

    fn from_outcome(outcome: ActionOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
            needs_more_info: None,
            current_parameters: None,
            playlist_url: outcome.playlist_url,
            action: outcome.play.then(|| "play".to_string()),
            videos: outcome.videos,
        }
    }
}

/// The full intent-to-action pipeline
///
/// Collaborator handles are injected once and reused across requests.
pub struct ChatPipeline {
    llm: Arc<dyn LanguageModel>,
    platform: Arc<dyn VideoPlatform>,
    audit: Arc<dyn AuditSink>,
    classifier: IntentClassifier<dyn LanguageModel>,
    executor: ActionExecutor,
}

impl ChatPipeline {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        platform: Arc<dyn VideoPlatform>,
        audit: Arc<dyn AuditSink>,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        let classifier = IntentClassifier::new(llm.clone());
        let executor = ActionExecutor::new(llm.clone(), platform.clone(), cache);
        Self {
            llm,
            platform,
            audit,
            classifier,
            executor,
        }
    }

    /// Handle one chat prompt for one user
    pub async fn handle(&self, user_id: &str, prompt: &str) -> ChatResponse {
        let classification = self.classifier.classify(prompt).await;
        info!(
            intent = %classification.intent,
            confidence = classification.confidence,
            "handle: classified"
        );

        if classification.intent == Intent::Unknown {
            return ChatResponse::failure("Sorry, I couldn't understand that request.");
        }

        let extraction = match self.extract(classification.intent, prompt).await {
            Ok(extraction) => extraction,
            Err(e) => {
                error!(error = %e, intent = %classification.intent, "handle: extraction failed");
                return ChatResponse::failure("An unexpected error occurred while interpreting your request.");
            }
        };

        let action = match extraction {
            Extraction::Ready(action) => action,
            Extraction::NeedsInfo(clarification) => {
                info!(missing = ?clarification.missing, "handle: needs more information");
                return ChatResponse::clarification(clarification);
            }
        };

        let outcome = self.executor.execute(user_id, action).await;

        // Playback is not a mutating action and is never audited
        if outcome.success
            && !outcome.play
            && let Some(action_message) = &outcome.action_message
            && let Err(e) = self.audit.append(user_id, action_message).await
        {
            warn!(error = %e, "handle: audit append failed");
        }

        ChatResponse::from_outcome(outcome)
    }

    async fn extract(&self, intent: Intent, prompt: &str) -> Result<Extraction, ExtractionError> {
        match intent {
            Intent::MakePlaylist => extract::make_playlist::extract(self.llm.as_ref(), prompt).await,
            Intent::RemovePlaylist => {
                let playlists = self.platform.list_playlists().await?;
                extract::remove_playlist::extract(self.llm.as_ref(), prompt, &playlists).await
            }
            Intent::ManagePlaylist => {
                let playlists = self.platform.list_playlists().await?;
                extract::manage_playlist::extract(self.llm.as_ref(), self.platform.as_ref(), prompt, &playlists).await
            }
            Intent::PlayVideo => extract::play_video::extract(self.llm.as_ref(), prompt).await,
            Intent::Unknown => unreachable!("unknown intent is handled before extraction"),
        }
    }
}
