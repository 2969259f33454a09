//! Learning-roadmap playlist planner
//!
//! Expands a topic into an ordered curriculum, one search query per step,
//! then builds the destination playlist with exactly one video per step.
//! The curriculum length bounds the playlist size, which is why a
//! user-specified video count is irrelevant on this path.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::{CacheInvalidator, playlist_items_key, playlists_key};
use crate::executor::{ActionOutcome, bulk_add};
use crate::extract::{ExtractionError, MakePlaylistParams};
use crate::llm::{LanguageModel, parse_json};
use crate::platform::VideoPlatform;
use crate::prompts;

/// Upper bound on curriculum length; longer model output is truncated
const MAX_STEPS: usize = 15;

/// One step of a learning roadmap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapStep {
    #[serde(rename = "step")]
    pub order: u32,
    pub title: String,
    #[serde(rename = "query")]
    pub search_query: String,
}

#[derive(Debug, Deserialize)]
struct RoadmapOutput {
    #[serde(default)]
    roadmap: Vec<RoadmapStep>,
}

/// Plans and builds roadmap playlists
pub struct RoadmapPlanner {
    llm: Arc<dyn LanguageModel>,
    platform: Arc<dyn VideoPlatform>,
    cache: Arc<dyn CacheInvalidator>,
}

impl RoadmapPlanner {
    pub fn new(llm: Arc<dyn LanguageModel>, platform: Arc<dyn VideoPlatform>, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self { llm, platform, cache }
    }

    /// Generate the curriculum for a topic
    ///
    /// Steps come back ordered; an over-long curriculum is truncated to
    /// [`MAX_STEPS`], an empty one is an error.
    pub async fn plan(&self, topic: &str, description: &str) -> Result<Vec<RoadmapStep>, ExtractionError> {
        let raw = self.llm.generate(&prompts::roadmap(topic, description)).await?;
        let output: RoadmapOutput = parse_json(&raw)?;

        let mut steps = output.roadmap;
        if steps.is_empty() {
            return Err(ExtractionError::Schema(crate::llm::SchemaError::Invalid(
                "roadmap contained no steps".to_string(),
            )));
        }

        steps.sort_by_key(|s| s.order);
        if steps.len() > MAX_STEPS {
            warn!(steps = steps.len(), "plan: truncating over-long roadmap");
            steps.truncate(MAX_STEPS);
        }

        info!(steps = steps.len(), %topic, "plan: roadmap generated");
        Ok(steps)
    }

    /// Build a roadmap playlist end to end
    ///
    /// Creates the playlist with the numbered step titles as its
    /// description, searches one video per step (concurrently, order
    /// restored by step order), and adds the surviving videos.
    pub async fn build(&self, user_id: &str, params: &MakePlaylistParams) -> ActionOutcome {
        let topic = params
            .playlist_name
            .as_deref()
            .or(params.description.as_deref())
            .unwrap_or_default();
        let description = params.description.as_deref().unwrap_or_default();

        let steps = match self.plan(topic, description).await {
            Ok(steps) => steps,
            Err(e) => {
                warn!(error = %e, "build: roadmap generation failed");
                return ActionOutcome::failure("Could not generate a learning roadmap.");
            }
        };

        let playlist_description = steps
            .iter()
            .map(|s| format!("{}. {}", s.order, s.title))
            .collect::<Vec<_>>()
            .join("\n");

        let name = params.playlist_name.as_deref().unwrap_or(topic);
        let playlist = match self
            .platform
            .create_playlist(name, &playlist_description, params.privacy)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "build: playlist creation failed");
                return ActionOutcome::failure("Failed to create the playlist.");
            }
        };
        self.cache.invalidate(&[playlists_key(user_id)]).await;

        // One search per step, issued concurrently; join_all keeps step order
        let searches = steps.iter().map(|step| self.platform.search_top_video(&step.search_query));
        let video_ids: Vec<String> = join_all(searches)
            .await
            .into_iter()
            .zip(&steps)
            .filter_map(|(result, step)| match result {
                Ok(Some(id)) => Some(id),
                Ok(None) => {
                    warn!(step = %step.title, "build: no video found for step");
                    None
                }
                Err(e) => {
                    warn!(step = %step.title, error = %e, "build: step search failed");
                    None
                }
            })
            .collect();

        if video_ids.is_empty() {
            return ActionOutcome::failure("Could not find any videos for the roadmap topics.")
                .with_playlist_url(playlist.url());
        }

        let report = bulk_add(self.platform.as_ref(), &playlist.id, &video_ids).await;
        self.cache
            .invalidate(&[playlist_items_key(&playlist.id), playlists_key(user_id)])
            .await;

        let added = report.succeeded.len();
        info!(added, steps = steps.len(), "build: roadmap playlist complete");

        let mut message = format!(
            "Successfully created playlist and added {added} videos based on the generated roadmap."
        );
        if !report.failed.is_empty() {
            message.push_str(&format!(
                " {} video(s) could not be added: {}.",
                report.failed.len(),
                report.failed.join(", ")
            ));
        }

        let action_message = format!(
            "Agent action: Created new roadmap-based playlist named \"{name}\" and added {added} videos. URL: {}.",
            playlist.url()
        );

        ActionOutcome::success(message)
            .with_playlist_url(playlist.url())
            .with_action_message(action_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockModel;

    fn planner_with(responses: Vec<&str>) -> RoadmapPlanner {
        use crate::cache::NoopCache;
        use crate::platform::{LengthHint, PlatformError, PlaylistItem, PlaylistRef, Privacy, VideoPlatform, VideoRef};
        use async_trait::async_trait;

        // Platform stub; plan() never touches it
        struct Unused;

        #[async_trait]
        impl VideoPlatform for Unused {
            async fn search_videos(&self, _: &str, _: u32, _: LengthHint) -> Result<Vec<String>, PlatformError> {
                unimplemented!()
            }
            async fn search_top_video(&self, _: &str) -> Result<Option<String>, PlatformError> {
                unimplemented!()
            }
            async fn create_playlist(&self, _: &str, _: &str, _: Privacy) -> Result<PlaylistRef, PlatformError> {
                unimplemented!()
            }
            async fn delete_playlist(&self, _: &str) -> Result<(), PlatformError> {
                unimplemented!()
            }
            async fn list_playlists(&self) -> Result<Vec<PlaylistRef>, PlatformError> {
                unimplemented!()
            }
            async fn list_items(&self, _: &str) -> Result<Vec<PlaylistItem>, PlatformError> {
                unimplemented!()
            }
            async fn add_video(&self, _: &str, _: &str) -> Result<(), PlatformError> {
                unimplemented!()
            }
            async fn remove_item(&self, _: &str) -> Result<(), PlatformError> {
                unimplemented!()
            }
            async fn rename_playlist(&self, _: &str, _: &str) -> Result<(), PlatformError> {
                unimplemented!()
            }
            async fn video_details(&self, _: &[String]) -> Result<Vec<VideoRef>, PlatformError> {
                unimplemented!()
            }
        }

        RoadmapPlanner::new(Arc::new(MockModel::new(responses)), Arc::new(Unused), Arc::new(NoopCache))
    }

    #[tokio::test]
    async fn test_plan_parses_and_orders_steps() {
        let planner = planner_with(vec![
            r#"{
                "roadmap": [
                    { "step": 2, "title": "Linear Regression", "query": "linear regression explained" },
                    { "step": 1, "title": "What is ML", "query": "machine learning for beginners" }
                ]
            }"#,
        ]);

        let steps = planner.plan("machine learning", "").await.unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title, "What is ML");
        assert_eq!(steps[1].order, 2);
    }

    #[tokio::test]
    async fn test_plan_truncates_over_long_roadmap() {
        let steps_json: Vec<String> = (1..=20)
            .map(|i| format!(r#"{{ "step": {i}, "title": "Step {i}", "query": "query {i}" }}"#))
            .collect();
        let raw = format!(r#"{{ "roadmap": [{}] }}"#, steps_json.join(","));

        let planner = planner_with(vec![&raw]);
        let steps = planner.plan("a big topic", "").await.unwrap();
        assert_eq!(steps.len(), 15);
        assert_eq!(steps[14].order, 15);
    }

    #[tokio::test]
    async fn test_plan_empty_roadmap_is_error() {
        let planner = planner_with(vec![r#"{ "roadmap": [] }"#]);
        assert!(planner.plan("anything", "").await.is_err());
    }

    #[tokio::test]
    async fn test_plan_malformed_output_is_error() {
        let planner = planner_with(vec!["sorry, no roadmap today"]);
        assert!(planner.plan("anything", "").await.is_err());
    }
}
