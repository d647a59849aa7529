//! Run configuration.
//!
//! Everything has a compiled-in default; an optional YAML file can override
//! the region list, the browser options and the fixed pauses:
//!
//! ```yaml
//! regions:
//!   - 서울
//!   - [충북, 충청북도]
//! browser:
//!   headless: false
//! pauses:
//!   after_search_ms: 3000
//! ```

use encoding_rs::{EUC_KR, Encoding, UTF_8};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

use crate::error::{Result, ScrapeError};
use crate::models::{RegionSpec, default_regions};
use crate::session::BrowserOptions;

/// Fixed waits between browser actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pauses {
    /// After loading the search page.
    pub after_navigate_ms: u64,
    /// After submitting a search.
    pub after_search_ms: u64,
    /// After moving to another results page.
    pub after_page_ms: u64,
}

impl Default for Pauses {
    fn default() -> Self {
        Self {
            after_navigate_ms: 1000,
            after_search_ms: 2000,
            after_page_ms: 1000,
        }
    }
}

impl Pauses {
    /// No waiting at all; for scripted sessions.
    #[cfg(test)]
    pub const NONE: Pauses = Pauses {
        after_navigate_ms: 0,
        after_search_ms: 0,
        after_page_ms: 0,
    };

    pub fn after_navigate(&self) -> Duration {
        Duration::from_millis(self.after_navigate_ms)
    }

    pub fn after_search(&self) -> Duration {
        Duration::from_millis(self.after_search_ms)
    }

    pub fn after_page(&self) -> Duration {
        Duration::from_millis(self.after_page_ms)
    }
}

/// Settings read from the optional YAML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub regions: Vec<RegionSpec>,
    pub browser: BrowserOptions,
    pub pauses: Pauses,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            browser: BrowserOptions::default(),
            pauses: Pauses::default(),
        }
    }
}

impl RunConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: RunConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or return the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(path = %path.display(), regions = config.regions.len(), "Loaded configuration");
        Ok(config)
    }

    /// Reject empty alias groups and an empty region list.
    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(ScrapeError::Config("region list is empty".into()));
        }
        for (i, region) in self.regions.iter().enumerate() {
            if region.label().is_none() {
                return Err(ScrapeError::Config(format!(
                    "region entry {i} is an alias group with no names"
                )));
            }
        }
        Ok(())
    }

    /// Keep only the regions whose canonical label is in `labels`.
    ///
    /// An empty `labels` keeps everything. A label that matches nothing is
    /// an error, so typos do not silently produce an empty file.
    pub fn restrict_regions(&mut self, labels: &[String]) -> Result<()> {
        if labels.is_empty() {
            return Ok(());
        }
        for wanted in labels {
            if !self.regions.iter().any(|r| r.label() == Some(wanted.as_str())) {
                return Err(ScrapeError::Config(format!("unknown region {wanted:?}")));
            }
        }
        self.regions
            .retain(|r| r.label().is_some_and(|l| labels.iter().any(|w| w == l)));
        Ok(())
    }
}

/// Resolve an output encoding label.
///
/// Accepts every WHATWG label `encoding_rs` can encode to, plus `cp949`
/// and `uhc`, which map to the EUC-KR (windows-949) codec.
///
/// # Arguments
///
/// * `label` - Encoding name as given on the command line, any case
///
/// # Returns
///
/// The codec to encode output with. Labels `encoding_rs` only decodes
/// (UTF-16LE, UTF-16BE, replacement) are a `Config` error, since encoding
/// with them would silently produce UTF-8.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    let encoding = match normalized.as_str() {
        "cp949" | "ms949" | "uhc" => EUC_KR,
        "utf8" => UTF_8,
        other => Encoding::for_label(other.as_bytes())
            .ok_or_else(|| ScrapeError::Config(format!("unknown encoding {label:?}")))?,
    };
    if encoding.output_encoding() != encoding {
        return Err(ScrapeError::Config(format!(
            "encoding {label:?} ({}) cannot be used for output",
            encoding.name()
        )));
    }
    Ok(encoding)
}
