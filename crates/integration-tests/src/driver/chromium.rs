//! `chromiumoxide`-backed driver.
//!
//! Selectors are resolved by a JavaScript function evaluated in the page
//! (`resolver.js`). Pointer actions go through real mouse events at the
//! element centre so hover-revealed controls behave as they do for a user.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::layout::Point;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::{
    Action, Download, Driver, DriverError, ElementSnapshot, FilePayload, ScrollPosition, Selector,
};
use crate::config::SuiteConfig;

const RESOLVER: &str = include_str!("resolver.js");

/// Flags the suite has always launched Chromium with in CI containers.
const CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-web-security",
    "--disable-gpu",
    "--disable-dev-shm-usage",
];

const DOWNLOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);
const PARTIAL_DOWNLOAD_SUFFIX: &str = ".crdownload";

/// Result of a resolver operation that targets one element.
#[derive(Debug, Deserialize)]
struct OpResult {
    count: usize,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

/// One browser process with one tab.
pub struct ChromiumDriver {
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    dialog_task: TaskSlot,
    download_dir: PathBuf,
    download_baseline: Mutex<HashSet<PathBuf>>,
}

/// Holds at most one background task. Replacing or clearing the slot
/// aborts the task it held.
#[derive(Debug, Default)]
struct TaskSlot(Mutex<Option<JoinHandle<()>>>);

impl TaskSlot {
    async fn replace(&self, task: JoinHandle<()>) {
        if let Some(previous) = self.0.lock().await.replace(task) {
            previous.abort();
        }
    }

    async fn abort(&self) {
        if let Some(task) = self.0.lock().await.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumDriver")
            .field("download_dir", &self.download_dir)
            .finish_non_exhaustive()
    }
}

fn protocol(err: impl std::fmt::Display) -> DriverError {
    DriverError::Protocol(err.to_string())
}

/// Resolver request that builds the file in the page, so the input carries
/// the declared MIME type rather than one guessed from the extension.
fn upload_request(selector: &Selector, file: &FilePayload) -> Value {
    json!({
        "op": "files",
        "selector": selector,
        "file": {
            "name": file.name,
            "mime_type": file.mime_type,
            "data": BASE64.encode(&file.bytes),
        },
    })
}

impl ChromiumDriver {
    /// Launch a browser and open a blank tab.
    ///
    /// Each driver gets its own artifact directory under
    /// `config.artifact_dir` so parallel tests never see each other's
    /// downloads.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Launch` if the browser cannot start and
    /// `DriverError::Io` if the artifact directories cannot be created.
    #[instrument(skip(config), fields(headless = config.headless))]
    pub async fn launch(config: &SuiteConfig) -> Result<Self, DriverError> {
        let download_dir = config
            .artifact_dir
            .join(Uuid::new_v4().to_string())
            .join("downloads");
        tokio::fs::create_dir_all(&download_dir).await?;
        let download_dir = tokio::fs::canonicalize(&download_dir).await?;

        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport.width, config.viewport.height)
            .viewport(Viewport {
                width: config.viewport.width,
                height: config.viewport.height,
                ..Viewport::default()
            })
            .args(CHROME_ARGS.iter().copied());
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        // The handler drives the websocket; it must be polled for any
        // command to complete.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(error = %err, "browser handler event error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        debug!(download_dir = %download_dir.display(), "browser launched");

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
            dialog_task: TaskSlot::default(),
            download_dir,
            download_baseline: Mutex::new(HashSet::new()),
        })
    }

    /// Close the browser and stop the protocol handler and any pending
    /// dialog listener.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Protocol` if the browser refuses to close.
    pub async fn close(self) -> Result<(), DriverError> {
        self.dialog_task.abort().await;
        let mut browser = self.browser.into_inner();
        let result = browser.close().await.map(|_| ()).map_err(protocol);
        if let Err(err) = browser.wait().await {
            warn!(error = %err, "browser process did not exit cleanly");
        }
        self.handler.abort();
        result
    }

    async fn evaluate<T: DeserializeOwned>(&self, request: &Value) -> Result<T, DriverError> {
        let expression = format!("({RESOLVER})({request})");
        self.page
            .evaluate_expression(expression)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| DriverError::Script(e.to_string()))
    }

    /// Run a single-element resolver op and enforce that one element matched.
    async fn run_single(
        &self,
        selector: &Selector,
        action: &str,
        request: Value,
    ) -> Result<OpResult, DriverError> {
        let result: OpResult = self.evaluate(&request).await?;
        if result.count != 1 {
            return Err(DriverError::NotUnique {
                selector: selector.describe(),
                count: result.count,
            });
        }
        if let Some(reason) = result.error {
            return Err(DriverError::Unsupported {
                action: action.to_string(),
                selector: selector.describe(),
                reason,
            });
        }
        Ok(result)
    }

    async fn element_centre(
        &self,
        selector: &Selector,
        action: &str,
    ) -> Result<Point, DriverError> {
        let result = self
            .run_single(selector, action, json!({"op": "point", "selector": selector}))
            .await?;
        match (result.x, result.y) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => Err(DriverError::Script(format!(
                "no coordinates for {}",
                selector.describe()
            ))),
        }
    }

    fn finished_downloads(dir: &Path) -> Result<Vec<PathBuf>, DriverError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let partial = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(PARTIAL_DOWNLOAD_SUFFIX));
            if path.is_file() && !partial {
                files.push(path);
            }
        }
        Ok(files)
    }
}

impl Driver for ChromiumDriver {
    #[instrument(skip(self), fields(url = %url))]
    async fn goto(&self, url: &Url) -> Result<(), DriverError> {
        self.page.goto(url.as_str()).await.map_err(protocol)?;
        Ok(())
    }

    async fn title(&self) -> Result<String, DriverError> {
        Ok(self
            .page
            .get_title()
            .await
            .map_err(protocol)?
            .unwrap_or_default())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.page.url().await.map_err(protocol)?.unwrap_or_default())
    }

    async fn query(&self, selector: &Selector) -> Result<Vec<ElementSnapshot>, DriverError> {
        self.evaluate(&json!({"op": "query", "selector": selector}))
            .await
    }

    async fn attribute(
        &self,
        selector: &Selector,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let result = self
            .run_single(
                selector,
                "read attribute of",
                json!({"op": "attribute", "selector": selector, "name": name}),
            )
            .await?;
        Ok(result.value)
    }

    #[instrument(
        skip(self, selector),
        fields(locator = %selector.describe(), action = action.name())
    )]
    async fn perform(&self, selector: &Selector, action: &Action) -> Result<(), DriverError> {
        match action {
            Action::Click => {
                let point = self.element_centre(selector, action.name()).await?;
                self.page.click(point).await.map_err(protocol)?;
            }
            Action::Hover => {
                let point = self.element_centre(selector, action.name()).await?;
                self.page.move_mouse(point).await.map_err(protocol)?;
            }
            Action::Fill { value } => {
                self.run_single(
                    selector,
                    action.name(),
                    json!({"op": "fill", "selector": selector, "value": value}),
                )
                .await?;
            }
            Action::Check => {
                self.run_single(
                    selector,
                    action.name(),
                    json!({"op": "check", "selector": selector}),
                )
                .await?;
            }
            Action::SelectOption { label } => {
                self.run_single(
                    selector,
                    action.name(),
                    json!({"op": "select", "selector": selector, "label": label}),
                )
                .await?;
            }
            Action::ScrollIntoViewIfNeeded => {
                self.run_single(
                    selector,
                    action.name(),
                    json!({"op": "scroll_into_view", "selector": selector}),
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn scroll_window(&self, to: ScrollPosition) -> Result<(), DriverError> {
        let top = match to {
            ScrollPosition::Top => "0",
            ScrollPosition::Bottom => "document.body.scrollHeight",
        };
        self.page
            .evaluate_expression(format!(
                "window.scrollTo({{ top: {top}, left: 0, behavior: 'instant' }})"
            ))
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        Ok(())
    }

    #[instrument(
        skip(self, selector, file),
        fields(locator = %selector.describe(), file = %file.name, mime = %file.mime_type)
    )]
    async fn set_input_files(
        &self,
        selector: &Selector,
        file: &FilePayload,
    ) -> Result<(), DriverError> {
        let result = self
            .run_single(selector, "upload to", upload_request(selector, file))
            .await?;
        if result.value.as_deref() != Some(file.mime_type.as_str()) {
            return Err(DriverError::Unsupported {
                action: "upload to".to_string(),
                selector: selector.describe(),
                reason: format!(
                    "input holds type {:?}, expected {}",
                    result.value, file.mime_type
                ),
            });
        }
        Ok(())
    }

    async fn accept_next_dialog(&self) -> Result<(), DriverError> {
        let mut dialogs = self
            .page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(protocol)?;
        let page = self.page.clone();
        let task = tokio::spawn(async move {
            if let Some(dialog) = dialogs.next().await {
                debug!(message = %dialog.message, "accepting dialog");
                if let Err(err) = page.execute(HandleJavaScriptDialogParams::new(true)).await {
                    warn!(error = %err, "failed to accept dialog");
                }
            }
        });
        self.dialog_task.replace(task).await;
        Ok(())
    }

    async fn begin_download(&self) -> Result<(), DriverError> {
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(self.download_dir.to_string_lossy().into_owned())
            .build()
            .map_err(DriverError::Protocol)?;
        self.browser
            .lock()
            .await
            .execute(params)
            .await
            .map_err(protocol)?;

        let existing = Self::finished_downloads(&self.download_dir)?;
        *self.download_baseline.lock().await = existing.into_iter().collect();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn finish_download(&self, timeout: Duration) -> Result<Download, DriverError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let baseline = self.download_baseline.lock().await.clone();
            let fresh = Self::finished_downloads(&self.download_dir)?
                .into_iter()
                .find(|path| !baseline.contains(path));

            if let Some(path) = fresh {
                let bytes = tokio::fs::read(&path).await?;
                let suggested_filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                debug!(file = %suggested_filename, size = bytes.len(), "download finished");
                return Ok(Download {
                    suggested_filename,
                    path,
                    bytes,
                });
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(DriverError::DownloadTimeout(timeout));
            }
            tokio::time::sleep(DOWNLOAD_POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::pending;

    use tokio::sync::oneshot;

    use super::*;

    #[test]
    fn test_upload_request_carries_declared_type_and_bytes() {
        let selector = Selector::root();
        let file = FilePayload::new("file.txt", "text/plain", "this is test");

        let request = upload_request(&selector, &file);
        assert_eq!(request["op"], "files");
        assert_eq!(request["file"]["name"], "file.txt");
        assert_eq!(request["file"]["mime_type"], "text/plain");
        assert_eq!(
            BASE64
                .decode(request["file"]["data"].as_str().unwrap())
                .unwrap(),
            b"this is test"
        );
    }

    #[tokio::test]
    async fn test_task_slot_aborts_replaced_and_cleared_tasks() {
        let slot = TaskSlot::default();

        let (first_alive, first_dropped) = oneshot::channel::<()>();
        slot.replace(tokio::spawn(async move {
            let _alive = first_alive;
            pending::<()>().await;
        }))
        .await;
        let (second_alive, second_dropped) = oneshot::channel::<()>();
        slot.replace(tokio::spawn(async move {
            let _alive = second_alive;
            pending::<()>().await;
        }))
        .await;

        let wait = Duration::from_secs(1);
        assert!(tokio::time::timeout(wait, first_dropped).await.unwrap().is_err());

        slot.abort().await;
        assert!(tokio::time::timeout(wait, second_dropped).await.unwrap().is_err());
    }
}
