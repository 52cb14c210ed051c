//! Harness error types.

use std::time::Duration;

use automation_exercise_core::PriceError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::driver::DriverError;

/// Errors surfaced by helpers and scenarios.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An assertion did not hold before its timeout.
    #[error("expected {target} {expected}, last observed {observed} (waited {timeout:?})")]
    Expectation {
        target: String,
        expected: String,
        observed: String,
        timeout: Duration,
    },

    /// The page does not have the shape the step relies on.
    #[error("{target}: {reason}")]
    Structural { target: String, reason: String },

    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A named step failed.
    #[error("step '{name}' failed: {source}")]
    Step {
        name: String,
        #[source]
        source: Box<HarnessError>,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unreadable price: {0}")]
    Price(#[from] PriceError),
}

impl HarnessError {
    pub(crate) fn structural(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structural {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// The innermost error, looking through step wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Step { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this is an assertion failure rather than a structural one.
    #[must_use]
    pub fn is_expectation(&self) -> bool {
        matches!(self.root_cause(), Self::Expectation { .. })
    }

    /// Names of the enclosing steps, outermost first.
    #[must_use]
    pub fn step_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::Step { name, source } = current {
            path.push(name.as_str());
            current = source;
        }
        path
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
