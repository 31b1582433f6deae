//! EduFinder configuration
//!
//! Loaded from TOML at startup, falls back to defaults if no config file
//! exists or it fails to parse.

use crate::orchestrator::WorkerRoutes;
use edufinder_core::{Address, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EduFinderConfig {
    pub orchestrator: OrchestratorConfig,
    /// Mailbox addresses of the three workers.
    pub workers: WorkerConfig,
    pub generation: GenerationConfig,
    pub videos: VideoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub address: String,
    /// Seconds a dispatched request may stay unanswered before expiry.
    pub pending_ttl_secs: u64,
    /// Seconds between expiry sweeps.
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub curriculum: String,
    pub materials: String,
    pub insights: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Whole-request timeout for one generation call.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub enabled: bool,
    /// Max videos appended to a materials reply.
    pub limit: usize,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

// ============================================================
// Defaults
// ============================================================

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            address: "edufinder://orchestrator".into(),
            pending_ttl_secs: 120,
            sweep_interval_secs: 10,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            curriculum: "edufinder://curriculum".into(),
            materials: "edufinder://materials".into(),
            insights: "edufinder://insights".into(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: edufinder_llm::gemini::DEFAULT_MODEL.into(),
            base_url: edufinder_llm::gemini::GEMINI_API_URL.into(),
            api_key_env: "GEMINI_API_KEY".into(),
            timeout_secs: edufinder_llm::gemini::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: 5,
            base_url: edufinder_llm::youtube::YOUTUBE_API_URL.into(),
            api_key_env: "YOUTUBE_API_KEY".into(),
            timeout_secs: edufinder_llm::youtube::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl EduFinderConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(Error::IoError(_)) => {
                tracing::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Strict variant of [`load`](Self::load): missing or invalid files are errors.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Render the config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn orchestrator_address(&self) -> Address {
        Address::new(self.orchestrator.address.clone())
    }

    pub fn routes(&self) -> WorkerRoutes {
        WorkerRoutes {
            curriculum: Address::new(self.workers.curriculum.clone()),
            materials: Address::new(self.workers.materials.clone()),
            insights: Address::new(self.workers.insights.clone()),
        }
    }

    pub fn pending_ttl(&self) -> Duration {
        Duration::from_secs(self.orchestrator.pending_ttl_secs)
    }

    /// Sweep interval, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.orchestrator.sweep_interval_secs.max(1))
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation.timeout_secs.max(1))
    }

    pub fn video_timeout(&self) -> Duration {
        Duration::from_secs(self.videos.timeout_secs.max(1))
    }

    /// Upper bound on one worker request: a generation call plus a video search.
    pub fn worker_timeout(&self) -> Duration {
        self.generation_timeout() + self.video_timeout()
    }

    /// Generation API key from the configured environment variable.
    pub fn generation_api_key(&self) -> Option<String> {
        read_key(&self.generation.api_key_env)
    }

    /// Video search API key, or `None` when videos are disabled.
    pub fn video_api_key(&self) -> Option<String> {
        if !self.videos.enabled {
            return None;
        }
        read_key(&self.videos.api_key_env)
    }
}

fn read_key(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|k| !k.trim().is_empty())
}
