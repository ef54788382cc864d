//! Client construction options.
//!
//! # Design
//! `ClientConfig` is a loose bag of optional settings, mirroring the mapping
//! a caller would hand to a factory. Nothing is checked until the client is
//! built: `resolve` applies the `{version}` substitution and rejects missing
//! or unusable values with `ClientError::Configuration`. Defaults are only
//! filled in by `with_defaults`, so `JoindInClient::new` can insist on an
//! explicit configuration while `JoindInClient::factory` cannot fail for lack
//! of one.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::error::ClientError;
use crate::hook::{CompletionHook, StripMeta};

/// API root; `{version}` is replaced by the configured version.
pub const DEFAULT_BASE_URL: &str = "http://api.joind.in/{version}";
pub const DEFAULT_VERSION: &str = "v2.1";

pub const BASE_URL_ENV: &str = "JOINDIN_BASE_URL";
pub const VERSION_ENV: &str = "JOINDIN_API_VERSION";

#[derive(Clone, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(skip)]
    completion_hook: Option<Arc<dyn CompletionHook>>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("completion_hook", &self.completion_hook.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Validated settings a client is built from.
pub(crate) struct ResolvedConfig {
    pub base_url: Url,
    pub completion_hook: Arc<dyn CompletionHook>,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("base_url", &self.base_url)
            .field("completion_hook", &"..")
            .finish()
    }
}

impl ClientConfig {
    /// An empty configuration; nothing is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `JOINDIN_BASE_URL` and `JOINDIN_API_VERSION`; unset variables
    /// stay unset.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV).ok(),
            version: std::env::var(VERSION_ENV).ok(),
            completion_hook: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Hook run after every command unless overridden per invocation.
    pub fn with_completion_hook(mut self, hook: impl CompletionHook + 'static) -> Self {
        self.completion_hook = Some(Arc::new(hook));
        self
    }

    /// Fill every unset option with its default.
    pub fn with_defaults(mut self) -> Self {
        self.base_url.get_or_insert_with(|| DEFAULT_BASE_URL.to_string());
        self.version.get_or_insert_with(|| DEFAULT_VERSION.to_string());
        if self.completion_hook.is_none() {
            self.completion_hook = Some(Arc::new(StripMeta));
        }
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub(crate) fn resolve(&self) -> Result<ResolvedConfig, ClientError> {
        let base_url = required(self.base_url.as_deref(), "base_url")?;
        let version = required(self.version.as_deref(), "version")?;
        let expanded = base_url.replace("{version}", version);

        let mut url = Url::parse(&expanded).map_err(|e| {
            ClientError::Configuration(format!("base_url `{expanded}` is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "base_url `{expanded}` must be an absolute http(s) URL"
            )));
        }
        let trimmed = url.path().trim_end_matches('/').to_owned();
        url.set_path(&trimmed);

        Ok(ResolvedConfig {
            base_url: url,
            completion_hook: self
                .completion_hook
                .clone()
                .unwrap_or_else(|| Arc::new(StripMeta)),
        })
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ClientError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ClientError::Configuration(format!("missing required option `{name}`"))),
    }
}
