//! Runtime configuration: where the playbook comes from, pipeline timing and
//! which reply source a session uses.
//!
//! Values come from an optional TOML file, then `COACH_*` environment
//! variables override them, then command-line [`ConfigOverrides`].

use coach_playbook::Playbook;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::reply_source::{RemoteConfig, RemoteReplySource, ReplySource};
use crate::session::{Session, SessionConfig};

pub const ENV_PLAYBOOK: &str = "COACH_PLAYBOOK";
pub const ENV_PROXY_URL: &str = "COACH_PROXY_URL";
pub const ENV_REPLY_DELAY_MS: &str = "COACH_REPLY_DELAY_MS";
pub const ENV_REPLY_TIMEOUT_MS: &str = "COACH_REPLY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Playbook TOML file. The built-in playbook is used when unset.
    pub playbook: Option<PathBuf>,

    /// Cosmetic pause before each reply.
    pub reply_delay_ms: u64,

    pub reply_timeout_ms: Option<u64>,

    /// When set, replies come from the proxy instead of the scripted rules.
    pub remote: Option<RemoteConfig>,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            playbook: None,
            reply_delay_ms: 450,
            reply_timeout_ms: None,
            remote: None,
        }
    }
}

/// Values given on the command line. Unset fields leave the config alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub playbook: Option<PathBuf>,
    pub proxy_url: Option<String>,
    pub reply_delay_ms: Option<u64>,
    pub reply_timeout_ms: Option<u64>,
}

impl CoachConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Override fields from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Override fields from any variable lookup.
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(path) = lookup(ENV_PLAYBOOK).filter(|v| !v.trim().is_empty()) {
            self.playbook = Some(PathBuf::from(path));
        }

        if let Some(url) = lookup(ENV_PROXY_URL).filter(|v| !v.trim().is_empty()) {
            self.set_proxy_url(url);
        }

        if let Some(value) = lookup(ENV_REPLY_DELAY_MS).filter(|v| !v.trim().is_empty()) {
            self.reply_delay_ms = parse_millis(ENV_REPLY_DELAY_MS, &value)?;
        }

        if let Some(value) = lookup(ENV_REPLY_TIMEOUT_MS).filter(|v| !v.trim().is_empty()) {
            self.reply_timeout_ms = Some(parse_millis(ENV_REPLY_TIMEOUT_MS, &value)?);
        }

        Ok(self)
    }

    /// Apply command-line values on top of file and environment.
    pub fn apply_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(path) = &overrides.playbook {
            self.playbook = Some(path.clone());
        }
        if let Some(url) = &overrides.proxy_url {
            self.set_proxy_url(url.clone());
        }
        if let Some(ms) = overrides.reply_delay_ms {
            self.reply_delay_ms = ms;
        }
        if let Some(ms) = overrides.reply_timeout_ms {
            self.reply_timeout_ms = Some(ms);
        }
        self
    }

    /// Point replies at `url`, keeping any other remote settings.
    pub fn set_proxy_url(&mut self, url: String) {
        match self.remote.as_mut() {
            Some(remote) => remote.endpoint = url,
            None => self.remote = Some(RemoteConfig::new(url)),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            reply_delay: Duration::from_millis(self.reply_delay_ms),
            reply_timeout: self.reply_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn load_playbook(&self) -> Result<Playbook, ConfigError> {
        match &self.playbook {
            Some(path) => Ok(Playbook::load(path)?),
            None => Ok(Playbook::builtin()),
        }
    }

    /// Pick the reply source once, at session construction.
    pub fn reply_source(&self, playbook: &Playbook) -> Result<ReplySource, ConfigError> {
        match &self.remote {
            Some(remote) => {
                tracing::info!(endpoint = %remote.endpoint, "Using remote reply source");
                Ok(ReplySource::Remote(RemoteReplySource::new(
                    remote.clone(),
                    playbook.brand.clone(),
                )?))
            }
            None => Ok(ReplySource::scripted(Arc::new(playbook.knowledge.clone()))),
        }
    }

    /// Load the playbook and start a seeded session.
    pub fn build_session(&self) -> Result<Session, ConfigError> {
        let playbook = self.load_playbook()?;
        let source = self.reply_source(&playbook)?;
        Ok(Session::new(Arc::new(playbook), source, self.session_config()))
    }
}

fn parse_millis(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}
