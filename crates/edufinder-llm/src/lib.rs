//! EduFinder LLM - Text generation and video search collaborators

pub mod gemini;
pub mod provider;
pub mod youtube;

pub use gemini::GeminiGenerator;
pub use provider::{
    GenerationError, GenerationResult, NoVideoSearch, TextGenerator, UnavailableGenerator,
    VideoSearch,
};
pub use youtube::{format_views, YouTubeSearch};
