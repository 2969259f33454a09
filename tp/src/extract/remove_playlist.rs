//! Extraction strategy for playlist deletion

use serde::Deserialize;
use tracing::debug;

use super::{Clarification, Extraction, ExtractionError, PlannedAction, PlaylistChoice, resolve_choice};
use crate::llm::{LanguageModel, parse_json};
use crate::platform::PlaylistRef;
use crate::prompts;

#[derive(Debug, Deserialize)]
struct RemovePlaylistOutput {
    parameters: RemoveParameters,
    ready_to_execute: bool,
}

#[derive(Debug, Deserialize)]
struct RemoveParameters {
    playlist_to_delete: Option<PlaylistChoice>,
}

/// Identify which of the caller's playlists should be deleted
///
/// With no playlists to choose from this short-circuits without a model
/// call. Otherwise the model must pick exactly one entry of the supplied
/// list; an ambiguous answer, a null, or an id not in the list is not ready.
pub async fn extract(
    llm: &dyn LanguageModel,
    utterance: &str,
    playlists: &[PlaylistRef],
) -> Result<Extraction, ExtractionError> {
    if playlists.is_empty() {
        debug!("extract: no playlists, skipping model call");
        return Ok(Extraction::NeedsInfo(Clarification::new(
            "You don't have any playlists to delete.",
            vec!["playlist_to_delete".to_string()],
            serde_json::json!({}),
        )));
    }

    let listing: Vec<serde_json::Value> = playlists
        .iter()
        .map(|p| serde_json::json!({ "id": p.id, "name": p.name }))
        .collect();
    let listing_json = serde_json::to_string_pretty(&listing).unwrap_or_default();

    let raw = llm.generate(&prompts::remove_playlist(utterance, &listing_json)).await?;
    let output: RemovePlaylistOutput = parse_json(&raw)?;

    let resolved = output
        .parameters
        .playlist_to_delete
        .as_ref()
        .filter(|_| output.ready_to_execute)
        .and_then(|choice| resolve_choice(choice, playlists));

    match resolved {
        Some(playlist) => {
            debug!(id = %playlist.id, name = %playlist.name, "extract: resolved target");
            Ok(Extraction::Ready(PlannedAction::RemovePlaylist { playlist }))
        }
        None => Ok(Extraction::NeedsInfo(Clarification::new(
            "Sorry, I couldn't figure out which playlist you want to delete. Please be more specific.",
            vec!["playlist_to_delete".to_string()],
            serde_json::to_value(&output.parameters.playlist_to_delete).unwrap_or_default(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockModel;

    fn playlists() -> Vec<PlaylistRef> {
        ["Gym Mix", "Study Beats", "Road Trip"]
            .iter()
            .enumerate()
            .map(|(i, name)| PlaylistRef {
                id: format!("PL{i}"),
                name: name.to_string(),
                description: None,
                video_count: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_empty_playlist_list_skips_model_call() {
        let llm = MockModel::new(vec![]);
        let extraction = extract(&llm, "delete my workout playlist", &[]).await.unwrap();

        assert_eq!(llm.call_count(), 0);
        let Extraction::NeedsInfo(clarification) = extraction else {
            panic!("expected not-ready extraction");
        };
        assert_eq!(clarification.message, "You don't have any playlists to delete.");
    }

    #[tokio::test]
    async fn test_resolves_selected_playlist() {
        let llm = MockModel::new(vec![
            r#"{
                "parameters": { "playlist_to_delete": { "id": "PL0", "name": "Gym Mix" } },
                "ready_to_execute": true
            }"#,
        ]);

        let extraction = extract(&llm, "remove my gym playlist", &playlists()).await.unwrap();
        let Extraction::Ready(PlannedAction::RemovePlaylist { playlist }) = extraction else {
            panic!("expected ready extraction");
        };
        assert_eq!(playlist.id, "PL0");
        assert_eq!(playlist.name, "Gym Mix");
    }

    #[tokio::test]
    async fn test_null_selection_is_not_ready() {
        let llm = MockModel::new(vec![
            r#"{
                "parameters": { "playlist_to_delete": null },
                "ready_to_execute": false
            }"#,
        ]);

        let extraction = extract(&llm, "remove that one", &playlists()).await.unwrap();
        let Extraction::NeedsInfo(clarification) = extraction else {
            panic!("expected not-ready extraction");
        };
        assert!(clarification.message.contains("be more specific"));
        assert_eq!(clarification.missing, vec!["playlist_to_delete".to_string()]);
    }

    #[tokio::test]
    async fn test_invented_id_is_not_ready() {
        let llm = MockModel::new(vec![
            r#"{
                "parameters": { "playlist_to_delete": { "id": "PL999", "name": "Gym Mix" } },
                "ready_to_execute": true
            }"#,
        ]);

        let extraction = extract(&llm, "remove my gym playlist", &playlists()).await.unwrap();
        assert!(!extraction.is_ready());
    }
}
