//! Language-model gateway
//!
//! Provides the [`LanguageModel`] trait the pipeline calls through, the
//! Gemini implementation, and the shared model-response parser.

use async_trait::async_trait;

mod error;
mod gemini;
pub mod parse;

pub use error::LlmError;
pub use gemini::GeminiClient;
pub use parse::{SchemaError, parse_json};

/// Stateless text-generation gateway
///
/// One prompt in, raw text out. The gateway guarantees nothing about the
/// shape of the output; callers own locating and parsing any embedded JSON
/// (see [`parse`]). No conversation state is kept between calls.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt and return the model's raw text response
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock language model for unit tests
    ///
    /// Returns queued responses in order and counts calls.
    pub struct MockModel {
        responses: Mutex<VecDeque<String>>,
        call_count: AtomicUsize,
    }

    impl MockModel {
        pub fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(String::from).collect()),
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LanguageModel for MockModel {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::InvalidResponse("No more mock responses".to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_returns_responses_in_order() {
            let model = MockModel::new(vec!["first", "second"]);

            assert_eq!(model.generate("a").await.unwrap(), "first");
            assert_eq!(model.generate("b").await.unwrap(), "second");
            assert_eq!(model.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_errors_when_exhausted() {
            let model = MockModel::new(vec![]);
            assert!(model.generate("a").await.is_err());
        }
    }
}
