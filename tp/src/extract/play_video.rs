//! Extraction strategy for immediate playback

use serde::Deserialize;
use tracing::debug;

use super::{Clarification, Extraction, ExtractionError, PlannedAction, PlayVideoParams};
use crate::llm::{LanguageModel, parse_json};
use crate::prompts;

#[derive(Debug, Deserialize)]
struct PlayVideoOutput {
    parameters: PlayVideoParams,
    #[allow(dead_code)]
    ready_to_execute: bool,
}

/// Extract playback parameters from one utterance
///
/// Ready iff at least one of topic, creator, or genre came out; the length
/// preference alone is not enough to search on.
pub async fn extract(llm: &dyn LanguageModel, utterance: &str) -> Result<Extraction, ExtractionError> {
    let raw = llm.generate(&prompts::play_video(utterance)).await?;
    let output: PlayVideoOutput = parse_json(&raw)?;
    let params = output.parameters;

    let ready = params.topic.is_some() || params.creator.is_some() || params.genre.is_some();
    if !ready {
        return Ok(Extraction::NeedsInfo(Clarification::new(
            "I'm sorry, I couldn't understand what you want to watch. Could you be more specific?",
            vec!["topic".to_string(), "creator".to_string(), "genre".to_string()],
            serde_json::to_value(&params).unwrap_or_default(),
        )));
    }

    debug!(?params.video_length, "extract: ready");
    Ok(Extraction::Ready(PlannedAction::PlayVideo(params)))
}
