//! Multi-tier TOML configuration for gitsafe.
//!
//! Reads configuration from multiple sources with precedence:
//! CLI flags > env vars > project > global > defaults

use gitsafe_policy::PolicySettings;
use gitsafe_types::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The default OpenAI-compatible API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";

/// The default narration model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// The default max tokens for a narration.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// The default hard timeout for a narration call.
pub const DEFAULT_NARRATION_TIMEOUT_MS: u64 = 12_000;

/// Bounds the narration timeout is clamped to.
pub const MIN_NARRATION_TIMEOUT_MS: u64 = 1_000;
pub const MAX_NARRATION_TIMEOUT_MS: u64 = 15_000;

/// Name of the per-repository config file, looked up at the repository root.
pub const PROJECT_CONFIG_FILE: &str = ".gitsafe.toml";

/// Resolved configuration for one hook invocation.
#[derive(Debug, Clone)]
pub struct GitsafeConfig {
    /// `None` when narration is disabled or no API key is available.
    pub narration: Option<NarrationConfig>,
    pub policy: PolicySettings,
    /// Exit non-zero when the commit context cannot be determined.
    pub strict_context: bool,
}

/// Everything the narrator client needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout_ms: u64,
}

/// Settings that can be read from a TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub narration: NarrationSettings,
    #[serde(default)]
    pub policy: PolicyFileSettings,
}

/// `[narration]` section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NarrationSettings {
    pub enabled: Option<bool>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// `[policy]` section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyFileSettings {
    pub treat_master_as_main: Option<bool>,
    pub block_protected_self_push: Option<bool>,
    pub strict_context: Option<bool>,
}

impl SettingsFile {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: SettingsFile) -> SettingsFile {
        SettingsFile {
            narration: NarrationSettings {
                enabled: other.narration.enabled.or(self.narration.enabled),
                api_key: other.narration.api_key.or(self.narration.api_key),
                model: other.narration.model.or(self.narration.model),
                max_tokens: other.narration.max_tokens.or(self.narration.max_tokens),
                base_url: other.narration.base_url.or(self.narration.base_url),
                timeout_ms: other.narration.timeout_ms.or(self.narration.timeout_ms),
            },
            policy: PolicyFileSettings {
                treat_master_as_main: other
                    .policy
                    .treat_master_as_main
                    .or(self.policy.treat_master_as_main),
                block_protected_self_push: other
                    .policy
                    .block_protected_self_push
                    .or(self.policy.block_protected_self_push),
                strict_context: other.policy.strict_context.or(self.policy.strict_context),
            },
        }
    }
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub no_narration: bool,
    pub model: Option<String>,
}

/// Environment variables consulted during resolution, captured up front so
/// resolution itself stays a pure function.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl EnvVars {
    pub fn from_process() -> Self {
        Self {
            api_key: non_empty_var("OPENAI_API_KEY"),
            model: non_empty_var("GITSAFE_MODEL"),
            base_url: non_empty_var("GITSAFE_API_BASE_URL"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl GitsafeConfig {
    /// Load configuration from all sources, applying precedence rules.
    ///
    /// Precedence (highest to lowest):
    /// 1. CLI flags
    /// 2. Environment variables
    /// 3. Project config (`<repo root>/.gitsafe.toml`)
    /// 4. Global config (`~/.gitsafe/config.toml`)
    /// 5. Defaults
    pub fn load(overrides: CliOverrides, repo_root: Option<&Path>) -> Self {
        let global = load_settings_or_default(&config_dir().join("config.toml"));
        let project = repo_root
            .map(|root| load_settings_or_default(&root.join(PROJECT_CONFIG_FILE)))
            .unwrap_or_default();

        Self::resolve(
            global.merge(project),
            EnvVars::from_process(),
            overrides,
        )
    }

    /// Resolve already-loaded settings against env vars and CLI overrides.
    pub fn resolve(
        settings: SettingsFile,
        env: EnvVars,
        overrides: CliOverrides,
    ) -> Self {
        let policy = PolicySettings {
            treat_master_as_main: settings.policy.treat_master_as_main.unwrap_or(false),
            block_protected_self_push: settings.policy.block_protected_self_push.unwrap_or(true),
        };
        let strict_context = settings.policy.strict_context.unwrap_or(false);

        GitsafeConfig {
            narration: resolve_narration(settings.narration, env, &overrides),
            policy,
            strict_context,
        }
    }
}

fn resolve_narration(
    settings: NarrationSettings,
    env: EnvVars,
    overrides: &CliOverrides,
) -> Option<NarrationConfig> {
    if overrides.no_narration || settings.enabled == Some(false) {
        tracing::debug!("narration disabled");
        return None;
    }

    // Resolve API key: env > config file
    let Some(api_key) = env.api_key.or(settings.api_key) else {
        tracing::debug!("no API key (set OPENAI_API_KEY), narration disabled");
        return None;
    };

    // Resolve model: CLI > env > config file
    let model = overrides
        .model
        .clone()
        .or(env.model)
        .or(settings.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let max_tokens = match settings.max_tokens {
        Some(0) => {
            tracing::warn!("narration.max_tokens = 0 is invalid, using {DEFAULT_MAX_TOKENS}");
            DEFAULT_MAX_TOKENS
        }
        Some(n) => n,
        None => DEFAULT_MAX_TOKENS,
    };

    let base_url = env
        .base_url
        .or(settings.base_url)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let requested = settings.timeout_ms.unwrap_or(DEFAULT_NARRATION_TIMEOUT_MS);
    let timeout_ms = requested.clamp(MIN_NARRATION_TIMEOUT_MS, MAX_NARRATION_TIMEOUT_MS);
    if timeout_ms != requested {
        tracing::warn!(
            "narration.timeout_ms = {requested} is out of range, using {timeout_ms}ms"
        );
    }

    Some(NarrationConfig {
        api_key,
        model,
        max_tokens,
        base_url,
        timeout_ms,
    })
}

/// Get the gitsafe config directory path (~/.gitsafe/).
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GITSAFE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gitsafe")
}

/// Read and parse a TOML settings file. A missing file is an empty one.
pub fn load_settings_file(path: &Path) -> Result<SettingsFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(SettingsFile::default()),
    }
}

/// Like [`load_settings_file`], but a broken file only costs a warning.
fn load_settings_or_default(path: &Path) -> SettingsFile {
    load_settings_file(path).unwrap_or_else(|e| {
        tracing::warn!("{e}");
        SettingsFile::default()
    })
}
