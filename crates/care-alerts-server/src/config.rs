//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use care_alerts_core::PipelineConfig;
use care_alerts_llm::{AdvisoryGenerator, GeminiConfig, GeminiGenerator, DEFAULT_GEMINI_MODEL};
use clap::Parser;

/// Alert triage server.
#[derive(Parser, Debug, Clone)]
#[command(name = "care-alerts-server", version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "CARE_ALERTS_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// SQLite database file (created if missing).
    #[arg(long, env = "CARE_ALERTS_DB", default_value = "care_alerts.db")]
    pub database: PathBuf,

    /// Gemini API key. Without one every alert gets the fallback advice.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// Override the Gemini API base URL.
    #[arg(long, env = "GEMINI_ENDPOINT")]
    pub gemini_endpoint: Option<String>,

    /// Seconds to wait for advice before falling back.
    #[arg(long, env = "CARE_ALERTS_ADVISORY_TIMEOUT", default_value_t = 10)]
    pub advisory_timeout_secs: u64,

    /// Skip urgency scoring and insight records.
    #[arg(long)]
    pub disable_scoring: bool,

    /// Skip the advisory call entirely.
    #[arg(long)]
    pub disable_advisory: bool,
}

impl ServerConfig {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            scoring_enabled: !self.disable_scoring,
            advisory_enabled: !self.disable_advisory,
            advisory_timeout: Duration::from_secs(self.advisory_timeout_secs),
            ..Default::default()
        }
    }

    /// Build the advisory generator, if one is configured.
    ///
    /// A missing or unusable key is logged and leaves the pipeline running
    /// with fallback advice.
    pub fn advisory_generator(&self) -> Option<Arc<dyn AdvisoryGenerator>> {
        if self.disable_advisory {
            return None;
        }
        let Some(api_key) = self.gemini_api_key.clone() else {
            tracing::warn!("GEMINI_API_KEY not set; alerts will receive fallback advice");
            return None;
        };

        let mut config = GeminiConfig::new(api_key);
        config.model = self.gemini_model.clone();
        if let Some(endpoint) = &self.gemini_endpoint {
            config.endpoint = endpoint.clone();
        }
        config.timeout = Duration::from_secs(self.advisory_timeout_secs);

        match GeminiGenerator::new(config) {
            Ok(generator) => Some(Arc::new(generator)),
            Err(e) => {
                tracing::warn!(error = %e, "advisory generator unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["care-alerts-server"]).unwrap();
        assert_eq!(config.bind.port(), 8000);
        assert_eq!(config.advisory_timeout_secs, 10);

        let pipeline = config.pipeline_config();
        assert!(pipeline.scoring_enabled);
        assert!(pipeline.advisory_enabled);
        assert_eq!(pipeline.advisory_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_toggles() {
        let config = ServerConfig::try_parse_from([
            "care-alerts-server",
            "--disable-scoring",
            "--disable-advisory",
            "--gemini-api-key",
            "k",
        ])
        .unwrap();
        let pipeline = config.pipeline_config();
        assert!(!pipeline.scoring_enabled);
        assert!(!pipeline.advisory_enabled);
        assert!(config.advisory_generator().is_none());
    }

    #[test]
    fn test_generator_from_key() {
        let config = ServerConfig::try_parse_from([
            "care-alerts-server",
            "--gemini-api-key",
            "test-key",
            "--advisory-timeout-secs",
            "3",
        ])
        .unwrap();
        let generator = config.advisory_generator().unwrap();
        assert_eq!(generator.name(), "gemini");
    }
}
