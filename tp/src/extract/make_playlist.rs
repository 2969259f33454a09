//! Extraction strategy for playlist creation

use serde::Deserialize;
use tracing::debug;

use super::{Clarification, Extraction, ExtractionError, MakePlaylistParams, NeedRoadmap, PlannedAction};
use crate::llm::{LanguageModel, parse_json};
use crate::prompts;

/// Default number of videos when the user gave no count
const DEFAULT_VID_COUNT: u32 = 15;

#[derive(Debug, Deserialize)]
struct MakePlaylistOutput {
    parameters: MakePlaylistParams,
    ready_to_execute: bool,
}

/// Extract playlist-creation parameters from one utterance
///
/// Readiness is enforced here, not trusted from the model: ready iff a name
/// or a description is present AND a content type is present. `vid_count`
/// defaults to 15 on the non-roadmap path and stays `None` on the roadmap
/// path.
pub async fn extract(llm: &dyn LanguageModel, utterance: &str) -> Result<Extraction, ExtractionError> {
    let raw = llm.generate(&prompts::make_playlist(utterance)).await?;
    let output: MakePlaylistOutput = parse_json(&raw)?;
    let mut params = output.parameters;

    let has_identity = params.playlist_name.is_some() || params.description.is_some();
    let has_type = params.content_type.is_some();

    if output.ready_to_execute != (has_identity && has_type) {
        debug!(
            model_ready = output.ready_to_execute,
            has_identity, has_type, "extract: model readiness disagrees with structural rule"
        );
    }

    if !(has_identity && has_type) {
        let mut missing = Vec::new();
        if !has_identity {
            missing.push("playlist_name".to_string());
            missing.push("description".to_string());
        }
        if !has_type {
            missing.push("content_type".to_string());
        }
        return Ok(Extraction::NeedsInfo(Clarification::new(
            "Not enough information to create playlist. Please provide more details.",
            missing,
            serde_json::to_value(&params).unwrap_or_default(),
        )));
    }

    if params.need_roadmap == NeedRoadmap::No && params.vid_count.is_none() {
        params.vid_count = Some(DEFAULT_VID_COUNT);
    }

    debug!(?params.need_roadmap, ?params.vid_count, "extract: ready");
    Ok(Extraction::Ready(PlannedAction::MakePlaylist(params)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockModel;
    use crate::platform::Privacy;

    #[tokio::test]
    async fn test_ready_extraction() {
        let llm = MockModel::new(vec![
            r#"{
                "parameters": {
                    "playlist_name": "Study Beats",
                    "content_type": "music",
                    "content_creator": null,
                    "description": "lofi music for studying",
                    "privacy": "private",
                    "vid_count": 10,
                    "need_roadmap": "no"
                },
                "ready_to_execute": true
            }"#,
        ]);

        let extraction = extract(&llm, "Create a private playlist called Study Beats with lofi music, 10 videos")
            .await
            .unwrap();

        let Extraction::Ready(PlannedAction::MakePlaylist(params)) = extraction else {
            panic!("expected ready make-playlist extraction");
        };
        assert_eq!(params.playlist_name.as_deref(), Some("Study Beats"));
        assert_eq!(params.privacy, Privacy::Private);
        assert_eq!(params.vid_count, Some(10));
        assert_eq!(params.need_roadmap, NeedRoadmap::No);
    }

    #[tokio::test]
    async fn test_vid_count_defaults_without_roadmap() {
        let llm = MockModel::new(vec![
            r#"{
                "parameters": {
                    "playlist_name": "Jazz Hour",
                    "content_type": "music",
                    "content_creator": null,
                    "description": null,
                    "privacy": "private",
                    "vid_count": null,
                    "need_roadmap": "no"
                },
                "ready_to_execute": true
            }"#,
        ]);

        let extraction = extract(&llm, "make me a jazz playlist").await.unwrap();
        let Extraction::Ready(PlannedAction::MakePlaylist(params)) = extraction else {
            panic!("expected ready extraction");
        };
        assert_eq!(params.vid_count, Some(15));
    }

    #[tokio::test]
    async fn test_vid_count_stays_null_on_roadmap_path() {
        let llm = MockModel::new(vec![
            r#"{
                "parameters": {
                    "playlist_name": "Learn Machine Learning",
                    "content_type": "education",
                    "content_creator": null,
                    "description": "a structured path through machine learning",
                    "privacy": "private",
                    "vid_count": null,
                    "need_roadmap": "yes"
                },
                "ready_to_execute": true
            }"#,
        ]);

        let extraction = extract(&llm, "I want to learn machine learning").await.unwrap();
        let Extraction::Ready(PlannedAction::MakePlaylist(params)) = extraction else {
            panic!("expected ready extraction");
        };
        assert_eq!(params.need_roadmap, NeedRoadmap::Yes);
        assert_eq!(params.vid_count, None);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_not_ready() {
        let llm = MockModel::new(vec![
            r#"{
                "parameters": {
                    "playlist_name": "Stuff",
                    "content_type": null,
                    "content_creator": null,
                    "description": null,
                    "privacy": "private",
                    "vid_count": 15,
                    "need_roadmap": "no"
                },
                "ready_to_execute": true
            }"#,
        ]);

        let extraction = extract(&llm, "make a playlist").await.unwrap();
        let Extraction::NeedsInfo(clarification) = extraction else {
            panic!("expected not-ready extraction");
        };
        assert!(clarification.missing.contains(&"content_type".to_string()));
        assert_eq!(clarification.partial["playlist_name"], "Stuff");
    }

    #[tokio::test]
    async fn test_malformed_output_is_an_error() {
        let llm = MockModel::new(vec!["no json here at all"]);
        assert!(extract(&llm, "make a playlist").await.is_err());
    }
}
