//! Error taxonomy for a scrape run.
//!
//! Every variant here is fatal: there is no retry and no partial flush.
//! Recoverable situations (a missing phone cell, an address outside the
//! searched region) never become errors; the parsers handle them inline.

use thiserror::Error;

/// Failure that aborts the run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A WebDriver command (navigate, find, click, ...) failed.
    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// The WebDriver session could not be created.
    #[error("could not start webdriver session: {0}")]
    NewSession(#[from] fantoccini::error::NewSessionError),

    /// A structurally required element was absent from the rendered page.
    #[error("missing {what} ({context})")]
    MissingElement { what: &'static str, context: String },

    /// A pagination control carried an argument we could not read.
    #[error("unreadable pagination control: {0:?}")]
    PaginationControl(String),

    /// The run configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The YAML configuration file could not be parsed.
    #[error("could not parse configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A character in the output has no mapping in the target encoding.
    #[error("output contains characters not representable in {encoding}")]
    Unencodable { encoding: &'static str },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Shorthand for [`ScrapeError::MissingElement`].
    pub fn missing(what: &'static str, context: impl Into<String>) -> Self {
        ScrapeError::MissingElement {
            what,
            context: context.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
