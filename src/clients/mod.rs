pub mod ai;

pub use ai::{Backend, CompletionBackend, EngineConfig, GroqClient, LlmEngine};
