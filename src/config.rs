//! Configuration loaded from the environment.
//!
//! Call `dotenvy::dotenv()` before [`Config::from_env`] to pick up a `.env`
//! file. CLI flags override individual values afterwards.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub llm: LlmConfig,
    pub agent: AgentConfig,
}

impl Config {
    /// Build configuration from `COURIER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(optional_env)
    }

    /// Configuration for `--offline`: scripted backend with default LLM
    /// settings. Agent settings are still read, and must still parse.
    pub fn offline_from_env() -> Result<Self, ConfigError> {
        Self::offline_from_lookup(optional_env)
    }

    fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            llm: LlmConfig::from_lookup(&env)?,
            agent: AgentConfig::from_lookup(&env)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn offline_from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            llm: LlmConfig {
                backend: LlmBackend::Scripted,
                ..LlmConfig::default()
            },
            agent: AgentConfig::from_lookup(&env)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_iterations".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.llm.backend == LlmBackend::OpenAi && self.llm.api_key.is_none() {
            return Err(ConfigError::MissingRequired {
                key: "OPENAI_API_KEY".to_string(),
            });
        }
        Ok(())
    }

    /// Every setting as `(path, value)`, secrets redacted.
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            ("llm.backend".to_string(), self.llm.backend.to_string()),
            ("llm.model".to_string(), self.llm.model.clone()),
            ("llm.base_url".to_string(), self.llm.base_url.clone()),
            (
                "llm.api_key".to_string(),
                match self.llm.api_key {
                    Some(_) => "********".to_string(),
                    None => "(not set)".to_string(),
                },
            ),
            (
                "llm.request_timeout_secs".to_string(),
                self.llm.request_timeout.as_secs().to_string(),
            ),
            (
                "agent.max_iterations".to_string(),
                self.agent.max_iterations.to_string(),
            ),
            (
                "agent.search_max_results".to_string(),
                self.agent.search_max_results.to_string(),
            ),
        ]
    }

    /// Value of one setting from [`list`](Self::list).
    pub fn get(&self, path: &str) -> Option<String> {
        self.list()
            .into_iter()
            .find(|(key, _)| key == path)
            .map(|(_, value)| value)
    }
}

/// Which model collaborator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    /// OpenAI-compatible chat completions over HTTP.
    OpenAi,
    /// Built-in scripted walkthrough, no network.
    #[default]
    Scripted,
}

impl std::str::FromStr for LlmBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "open_ai" | "chat" => Ok(LlmBackend::OpenAi),
            "scripted" | "offline" | "demo" => Ok(LlmBackend::Scripted),
            _ => Err(format!(
                "invalid backend '{}', expected 'openai' or 'scripted'",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmBackend::OpenAi => write!(f, "openai"),
            LlmBackend::Scripted => write!(f, "scripted"),
        }
    }
}

/// Model connection settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub request_timeout: Duration,
}

impl LlmConfig {
    fn from_lookup(env: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut llm = Self::default();
        if let Some(backend) = env("COURIER_LLM_BACKEND") {
            llm.backend = backend
                .parse()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "COURIER_LLM_BACKEND".to_string(),
                    message,
                })?;
        }
        if let Some(model) = env("COURIER_MODEL") {
            llm.model = model;
        }
        if let Some(base_url) = env("COURIER_BASE_URL") {
            llm.base_url = base_url;
        }
        llm.api_key = env("OPENAI_API_KEY").map(SecretString::from);
        if let Some(secs) = parse_var::<u64>(env, "COURIER_REQUEST_TIMEOUT_SECS")? {
            llm.request_timeout = Duration::from_secs(secs);
        }
        Ok(llm)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Agent loop settings.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model turns allowed per agent run before giving up.
    pub max_iterations: usize,
    /// Results produced by `web_search` when the model does not say.
    pub search_max_results: usize,
}

impl AgentConfig {
    fn from_lookup(env: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut agent = Self::default();
        if let Some(max) = parse_var::<usize>(env, "COURIER_MAX_ITERATIONS")? {
            agent.max_iterations = max;
        }
        if let Some(max) = parse_var::<usize>(env, "COURIER_SEARCH_MAX_RESULTS")? {
            agent.search_max_results = max;
        }
        Ok(agent)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            search_max_results: 2,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}
