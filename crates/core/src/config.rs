use std::env;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub aws: AwsConfig,
    pub knowledge_base: KnowledgeBaseConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `AUTOINGEST_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("AUTOINGEST_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            aws: AwsConfig::from_env_profiled(p),
            knowledge_base: KnowledgeBaseConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn is_configured(&self) -> bool {
        self.knowledge_base.is_configured()
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  aws:            region={}, static_credentials={}, endpoint={}",
            self.aws.region,
            self.aws.has_static_credentials(),
            self.aws.endpoint_url.as_deref().unwrap_or("(default)")
        );
        tracing::info!(
            "  knowledge_base: id={}, data_source={}",
            self.knowledge_base.knowledge_base_id.as_deref().unwrap_or("(none)"),
            self.knowledge_base.data_source_id.as_deref().unwrap_or("(none)")
        );
    }

    /// Return a redacted view safe for logging or diagnostics (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "aws": {
                "region": self.aws.region,
                "endpoint_url": self.aws.endpoint_url,
                "static_credentials": self.aws.has_static_credentials(),
            },
            "knowledge_base": {
                "knowledge_base_id": self.knowledge_base.knowledge_base_id,
                "data_source_id": self.knowledge_base.data_source_id,
                "configured": self.knowledge_base.is_configured(),
            },
        })
    }
}

// ── AWS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    /// Override for the Bedrock Agent endpoint (local stubs, VPC endpoints).
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            region: profiled_env_or(p, "AWS_REGION", "us-east-1"),
            access_key_id: profiled_env_opt(p, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(p, "AWS_SECRET_ACCESS_KEY"),
            session_token: profiled_env_opt(p, "AWS_SESSION_TOKEN"),
            endpoint_url: profiled_env_opt(p, "BEDROCK_ENDPOINT_URL"),
        }
    }

    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

// ── Knowledge base ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    pub knowledge_base_id: Option<String>,
    pub data_source_id: Option<String>,
}

impl KnowledgeBaseConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            knowledge_base_id: profiled_env_opt(p, "KNOWLEDGE_BASE_ID"),
            data_source_id: profiled_env_opt(p, "DATA_SOURCE_ID"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.knowledge_base_id.is_some() && self.data_source_id.is_some()
    }

    /// Both identifiers, or the name of the first one missing.
    pub fn require(&self) -> Result<(&str, &str), CoreError> {
        let kb = self
            .knowledge_base_id
            .as_deref()
            .ok_or_else(|| CoreError::MissingConfig("KNOWLEDGE_BASE_ID".into()))?;
        let ds = self
            .data_source_id
            .as_deref()
            .ok_or_else(|| CoreError::MissingConfig("DATA_SOURCE_ID".into()))?;
        Ok((kb, ds))
    }
}

// ── Tests ─────────────────────────────────────────────────────
