//! Downloading vendor install scripts.

use anyhow::{anyhow, Context};
use std::time::Duration;

use crate::error::Result;

/// Source of install scripts, mockable in tests.
pub trait ScriptSource {
    /// Fetch the script body at `url`.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches install scripts over HTTPS.
///
/// # Example
///
/// ```no_run
/// use auditor_bootstrap::requirements::fetch::{ScriptFetcher, ScriptSource};
/// use std::time::Duration;
///
/// let fetcher = ScriptFetcher::new(Duration::from_secs(30)).unwrap();
/// let script = fetcher.fetch("https://astral.sh/uv/install.sh").unwrap();
/// ```
pub struct ScriptFetcher {
    timeout: Duration,
    client: reqwest::blocking::Client,
}

impl ScriptFetcher {
    /// Create a fetcher with the specified timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("auditor-bootstrap/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { timeout, client })
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ScriptSource for ScriptFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "fetching install script");
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {} fetching {}", response.status(), url).into());
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response from {}", url))?;
        Ok(body)
    }
}

/// Script source that returns a fixed body, or fails when empty.
#[derive(Debug, Clone, Default)]
pub struct StaticScript {
    body: Option<String>,
}

impl StaticScript {
    /// Always return `body`.
    pub fn new(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
        }
    }

    /// Always fail, like an offline machine.
    pub fn unreachable() -> Self {
        Self { body: None }
    }
}

impl ScriptSource for StaticScript {
    fn fetch(&self, url: &str) -> Result<String> {
        self.body
            .clone()
            .ok_or_else(|| anyhow!("Failed to fetch {}", url).into())
    }
}
