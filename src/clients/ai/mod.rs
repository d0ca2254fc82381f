pub mod groq;
pub mod prompts;

pub use groq::GroqClient;

use crate::{AppError, Result};
use async_trait::async_trait;

/// A text-completion backend: one prompt in, the full generated text out.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, Default)]
pub enum Backend {
    Hosted {
        api_key: String,
        model: Option<String>,
    },
    #[default]
    Unconfigured,
}

/// Explicit backend selection, built once at startup (or directly in tests)
/// and passed by reference. There is no ambient global engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub backend: Backend,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let backend = match std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
        {
            Some(api_key) => Backend::Hosted {
                api_key,
                model: std::env::var("GROQ_MODEL").ok(),
            },
            None => Backend::Unconfigured,
        };

        Self { backend }
    }
}

pub struct LlmEngine {
    backend: Option<Box<dyn CompletionBackend>>,
}

impl LlmEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let backend = match config.backend {
            Backend::Hosted { api_key, model } => Some(
                Box::new(GroqClient::new(api_key, model)?) as Box<dyn CompletionBackend>,
            ),
            Backend::Unconfigured => None,
        };

        Ok(Self { backend })
    }

    /// Sends the prompt to the configured backend and awaits the full
    /// response text. Exactly one outbound request per call; no retry, no
    /// fallback to another backend.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            AppError::Config("no backend configured: set GROQ_API_KEY".to_string())
        })?;

        backend.complete(prompt).await
    }

    pub fn model_used(&self) -> Option<String> {
        self.backend.as_ref().map(|b| b.model_name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_engine_fails_without_network() {
        let engine = LlmEngine::new(EngineConfig::default()).unwrap();

        let err = engine.generate("any prompt").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("no backend configured"));
        assert_eq!(engine.model_used(), None);
    }

    #[test]
    fn hosted_backend_defaults_model() {
        let config = EngineConfig {
            backend: Backend::Hosted {
                api_key: "test-key".to_string(),
                model: None,
            },
        };
        let engine = LlmEngine::new(config).unwrap();

        assert_eq!(engine.model_used().as_deref(), Some("openai/gpt-oss-120b"));
    }

    #[test]
    fn hosted_backend_honors_model_override() {
        let config = EngineConfig {
            backend: Backend::Hosted {
                api_key: "test-key".to_string(),
                model: Some("llama-3.3-70b-versatile".to_string()),
            },
        };
        let engine = LlmEngine::new(config).unwrap();

        assert_eq!(
            engine.model_used().as_deref(),
            Some("llama-3.3-70b-versatile")
        );
    }
}
