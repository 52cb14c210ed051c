//! Scripted in-memory driver for unit tests.
//!
//! Selectors are matched by their serialized key, not evaluated. A test
//! declares what each selector resolves to and how the page reacts to
//! actions, then inspects the recorded calls.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use url::Url;

use super::{
    Action, Download, Driver, DriverError, ElementSnapshot, FilePayload, ScrollPosition, Selector,
};

type Effect = (Selector, Vec<ElementSnapshot>);

#[derive(Debug, Default)]
struct State {
    elements: HashMap<String, Vec<ElementSnapshot>>,
    delayed: HashMap<String, (usize, Vec<ElementSnapshot>)>,
    attributes: HashMap<(String, String), String>,
    reactions: HashMap<String, Vec<Effect>>,
    queries: HashMap<String, usize>,
    actions: Vec<(Selector, Action)>,
    visited: Vec<String>,
    title: String,
    url: String,
    dialogs_armed: usize,
    uploads: Vec<(Selector, FilePayload)>,
    scrolls: Vec<ScrollPosition>,
    download: Option<Download>,
    download_started: bool,
}

impl State {
    fn apply(&mut self, effects: Vec<Effect>) {
        for (selector, snapshots) in effects {
            self.elements.insert(selector.key(), snapshots);
        }
    }

    fn resolve(&mut self, selector: &Selector) -> Vec<ElementSnapshot> {
        let key = selector.key();
        *self.queries.entry(key.clone()).or_default() += 1;
        if let Some((remaining, snapshots)) = self.delayed.get_mut(&key) {
            if *remaining == 0 {
                let snapshots = std::mem::take(snapshots);
                self.delayed.remove(&key);
                self.elements.insert(key.clone(), snapshots);
            } else {
                *remaining -= 1;
            }
        }
        self.elements.get(&key).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `selector` resolve to `snapshots`.
    pub fn show(&self, selector: &Selector, snapshots: Vec<ElementSnapshot>) {
        self.state
            .lock()
            .unwrap()
            .elements
            .insert(selector.key(), snapshots);
    }

    /// Make `selector` resolve to nothing.
    pub fn remove(&self, selector: &Selector) {
        self.state.lock().unwrap().elements.remove(&selector.key());
    }

    /// Keep the current resolution for `polls` queries, then switch to `snapshots`.
    pub fn show_after(&self, selector: &Selector, polls: usize, snapshots: Vec<ElementSnapshot>) {
        self.state
            .lock()
            .unwrap()
            .delayed
            .insert(selector.key(), (polls, snapshots));
    }

    pub fn set_attribute(&self, selector: &Selector, name: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .attributes
            .insert((selector.key(), name.to_string()), value.to_string());
    }

    /// Apply `effects` whenever an action runs on `selector`.
    pub fn on_action(&self, selector: &Selector, effects: Vec<Effect>) {
        self.state
            .lock()
            .unwrap()
            .reactions
            .insert(selector.key(), effects);
    }

    pub fn set_title(&self, title: &str) {
        self.state.lock().unwrap().title = title.to_string();
    }

    pub fn set_url(&self, url: &str) {
        self.state.lock().unwrap().url = url.to_string();
    }

    pub fn set_download(&self, name: &str, contents: &str) {
        self.state.lock().unwrap().download = Some(Download {
            suggested_filename: name.to_string(),
            path: PathBuf::from("fake-downloads").join(name),
            bytes: contents.as_bytes().to_vec(),
        });
    }

    pub fn actions(&self) -> Vec<(Selector, Action)> {
        self.state.lock().unwrap().actions.clone()
    }

    /// Actions performed on one selector, in order.
    pub fn performed(&self, selector: &Selector) -> Vec<Action> {
        self.state
            .lock()
            .unwrap()
            .actions
            .iter()
            .filter(|(s, _)| s == selector)
            .map(|(_, a)| a.clone())
            .collect()
    }

    /// How many times `selector` was resolved.
    pub fn queried(&self, selector: &Selector) -> usize {
        self.state
            .lock()
            .unwrap()
            .queries
            .get(&selector.key())
            .copied()
            .unwrap_or_default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }

    pub fn dialogs_armed(&self) -> usize {
        self.state.lock().unwrap().dialogs_armed
    }

    pub fn uploads(&self) -> Vec<(Selector, FilePayload)> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn scrolls(&self) -> Vec<ScrollPosition> {
        self.state.lock().unwrap().scrolls.clone()
    }
}

impl Driver for FakeDriver {
    async fn goto(&self, url: &Url) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());
        state.url = url.to_string();
        Ok(())
    }

    async fn title(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().unwrap().title.clone())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn query(&self, selector: &Selector) -> Result<Vec<ElementSnapshot>, DriverError> {
        Ok(self.state.lock().unwrap().resolve(selector))
    }

    async fn attribute(
        &self,
        selector: &Selector,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let mut state = self.state.lock().unwrap();
        let count = state.resolve(selector).len();
        if count != 1 {
            return Err(DriverError::NotUnique {
                selector: selector.describe(),
                count,
            });
        }
        Ok(state
            .attributes
            .get(&(selector.key(), name.to_string()))
            .cloned())
    }

    async fn perform(&self, selector: &Selector, action: &Action) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let count = state.resolve(selector).len();
        if count != 1 {
            return Err(DriverError::NotUnique {
                selector: selector.describe(),
                count,
            });
        }
        state.actions.push((selector.clone(), action.clone()));
        if let Some(effects) = state.reactions.get(&selector.key()).cloned() {
            state.apply(effects);
        }
        Ok(())
    }

    async fn scroll_window(&self, to: ScrollPosition) -> Result<(), DriverError> {
        self.state.lock().unwrap().scrolls.push(to);
        Ok(())
    }

    async fn set_input_files(
        &self,
        selector: &Selector,
        file: &FilePayload,
    ) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        let count = state.resolve(selector).len();
        if count != 1 {
            return Err(DriverError::NotUnique {
                selector: selector.describe(),
                count,
            });
        }
        state.uploads.push((selector.clone(), file.clone()));
        Ok(())
    }

    async fn accept_next_dialog(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().dialogs_armed += 1;
        Ok(())
    }

    async fn begin_download(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().download_started = true;
        Ok(())
    }

    async fn finish_download(&self, timeout: Duration) -> Result<Download, DriverError> {
        let mut state = self.state.lock().unwrap();
        if !state.download_started {
            return Err(DriverError::DownloadTimeout(timeout));
        }
        state.download_started = false;
        state
            .download
            .take()
            .ok_or(DriverError::DownloadTimeout(timeout))
    }
}
