//! TubePilot - conversational intent-to-action pipeline for a video platform
//!
//! A free-text command ("make a playlist of 80s rock", "remove my workout
//! playlist") travels through a fixed pipeline: intent classification,
//! intent-specific parameter extraction, a readiness gate that decides
//! between executing now and asking for more information, and an executor
//! that performs the validated platform operations. Requests are
//! independent; no pipeline state survives a response.
//!
//! # Modules
//!
//! - [`intent`] - classification of utterances into intents (fail-soft)
//! - [`extract`] - per-intent parameter extraction and the readiness gate
//! - [`executor`] - dispatch of validated actions to the platform
//! - [`roadmap`] - learning-roadmap playlist planner
//! - [`pipeline`] - the end-to-end chat pipeline and response contract
//! - [`llm`] - language-model gateway and response parsing
//! - [`platform`] - video platform client trait and YouTube implementation
//! - [`audit`] - append-only action log
//! - [`cache`] - cache invalidation contract
//! - [`config`] - configuration types and loading

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod executor;
pub mod extract;
pub mod intent;
pub mod llm;
pub mod pipeline;
pub mod platform;
pub mod prompts;
pub mod repl;
pub mod roadmap;

// Re-export commonly used types
pub use audit::{ActionRecord, AuditError, AuditSink, JsonlAuditSink};
pub use cache::{CacheInvalidator, NoopCache, playlist_items_key, playlists_key};
pub use config::{Config, LlmConfig, PlatformConfig};
pub use executor::{ActionExecutor, ActionOutcome, BulkReport};
pub use extract::{
    Clarification, Extraction, ExtractionError, MakePlaylistParams, ManageOp, NeedRoadmap, PlannedAction,
    PlayVideoParams,
};
pub use intent::{Classification, Intent, IntentClassifier};
pub use llm::{GeminiClient, LanguageModel, LlmError, SchemaError};
pub use pipeline::{ChatPipeline, ChatResponse};
pub use platform::{
    LengthHint, PlatformError, PlaylistItem, PlaylistRef, Privacy, VideoPlatform, VideoRef, YouTubeClient,
};
pub use roadmap::{RoadmapPlanner, RoadmapStep};
