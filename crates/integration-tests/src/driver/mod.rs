//! The seam between the helpers and a real browser.
//!
//! Helpers only ever talk to a [`Driver`]. The production implementation is
//! [`ChromiumDriver`], which speaks the DevTools protocol through
//! `chromiumoxide`; unit tests substitute an in-memory driver.
//!
//! Driver calls are single attempts. Waiting, retrying and strictness are
//! the caller's business (see [`crate::page`] and [`crate::expect`]).

pub mod chromium;
#[cfg(test)]
pub(crate) mod fake;
pub mod selector;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use chromium::ChromiumDriver;
pub use selector::{Role, Selector, Step, TextMatch};

/// Errors raised by a single driver call.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The browser could not be started.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// The protocol connection returned an error.
    #[error("browser protocol error: {0}")]
    Protocol(String),

    /// Script evaluation in the page failed or returned an unexpected shape.
    #[error("page script error: {0}")]
    Script(String),

    /// An operation that needs one element matched a different number.
    #[error("{selector} matched {count} elements, expected exactly one")]
    NotUnique { selector: String, count: usize },

    /// The element exists but the operation is impossible on it.
    #[error("cannot {action} {selector}: {reason}")]
    Unsupported {
        action: String,
        selector: String,
        reason: String,
    },

    /// A download did not finish in time.
    #[error("no download finished within {0:?}")]
    DownloadTimeout(Duration),

    /// Local file handling for uploads or downloads failed.
    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Errors a retry may clear, such as a script racing a navigation.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Protocol(_) | Self::Script(_))
    }
}

/// What the page reports about one matched element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Non-empty box and not `visibility: hidden`.
    pub visible: bool,
    /// Visible and intersecting the viewport.
    pub in_viewport: bool,
    /// Raw `textContent`.
    pub text: String,
    /// Rendered `innerText`.
    pub inner_text: String,
}

impl ElementSnapshot {
    /// A visible, on-screen element with the given text.
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            visible: true,
            in_viewport: true,
            inner_text: text.clone(),
            text,
        }
    }

    /// An element present in the DOM but not rendered.
    #[must_use]
    pub fn hidden(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A rendered element scrolled out of view.
    #[must_use]
    pub fn offscreen(text: impl Into<String>) -> Self {
        Self {
            in_viewport: false,
            ..Self::visible(text)
        }
    }
}

/// An interaction with exactly one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Scroll into view and click the centre.
    Click,
    /// Scroll into view and move the pointer over the centre.
    Hover,
    /// Replace the value of an input or textarea.
    Fill { value: String },
    /// Tick a checkbox or radio if it is not already.
    Check,
    /// Pick the `<option>` whose label equals `label`.
    SelectOption { label: String },
    /// Scroll only when the element is outside the viewport.
    ScrollIntoViewIfNeeded,
}

impl Action {
    /// Whether the element must be rendered before the action can run.
    #[must_use]
    pub const fn requires_visible(&self) -> bool {
        !matches!(self, Self::ScrollIntoViewIfNeeded)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Fill { .. } => "fill",
            Self::Check => "check",
            Self::SelectOption { .. } => "select option on",
            Self::ScrollIntoViewIfNeeded => "scroll to",
        }
    }
}

/// Window scroll targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPosition {
    Top,
    Bottom,
}

/// An in-memory file for a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// File name the server suggested.
    pub suggested_filename: String,
    /// Where the file was saved.
    pub path: PathBuf,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Download {
    /// Contents decoded as UTF-8, lossy.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Operations the helpers need from a browser tab.
///
/// All selector-taking methods evaluate the selector afresh on every call.
#[allow(async_fn_in_trait)]
pub trait Driver {
    /// Navigate and wait for the load event.
    async fn goto(&self, url: &Url) -> Result<(), DriverError>;

    /// Current document title.
    async fn title(&self) -> Result<String, DriverError>;

    /// Current document URL.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Snapshot every element the selector matches, in document order.
    async fn query(&self, selector: &Selector) -> Result<Vec<ElementSnapshot>, DriverError>;

    /// Attribute of the single matched element.
    async fn attribute(
        &self,
        selector: &Selector,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// Run `action` on the single matched element.
    async fn perform(&self, selector: &Selector, action: &Action) -> Result<(), DriverError>;

    /// Scroll the window.
    async fn scroll_window(&self, to: ScrollPosition) -> Result<(), DriverError>;

    /// Put `file` into the single matched file input.
    async fn set_input_files(
        &self,
        selector: &Selector,
        file: &FilePayload,
    ) -> Result<(), DriverError>;

    /// Accept the next native dialog (`alert`, `confirm`, `prompt`) the page opens.
    async fn accept_next_dialog(&self) -> Result<(), DriverError>;

    /// Start capturing downloads; files that already exist are ignored.
    async fn begin_download(&self) -> Result<(), DriverError>;

    /// Wait for the download started after [`Driver::begin_download`].
    async fn finish_download(&self, timeout: Duration) -> Result<Download, DriverError>;
}
