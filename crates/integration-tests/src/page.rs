//! Page handle and lazy element locators.
//!
//! A [`Locator`] holds a [`Selector`] and a reference to its page; nothing
//! touches the browser until an action or assertion runs. Actions are
//! strict: they wait until the selector resolves to exactly one
//! (visible, where the action needs it) element, and fail immediately
//! when it resolves to several.

use std::future::Future;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::SuiteConfig;
use crate::driver::{
    Action, Download, Driver, DriverError, ElementSnapshot, FilePayload, Role, ScrollPosition,
    Selector, Step, TextMatch,
};
use crate::error::{HarnessError, Result};

/// One browser tab plus the suite configuration it runs under.
#[derive(Debug)]
pub struct Page<D> {
    driver: D,
    config: Arc<SuiteConfig>,
}

impl<D: Driver> Page<D> {
    pub const fn new(driver: D, config: Arc<SuiteConfig>) -> Self {
        Self { driver, config }
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Navigate to a path relative to the configured base URL.
    ///
    /// # Errors
    ///
    /// Fails if the path does not form a valid URL or navigation fails.
    #[instrument(skip(self))]
    pub async fn goto(&self, path: &str) -> Result<()> {
        let url = self.config.page_url(path)?;
        self.driver.goto(&url).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Fails if the browser cannot report the title.
    pub async fn title(&self) -> Result<String> {
        Ok(self.driver.title().await?)
    }

    /// # Errors
    ///
    /// Fails if the browser cannot report the URL.
    pub async fn url(&self) -> Result<String> {
        Ok(self.driver.current_url().await?)
    }

    /// Locator for the document itself; the starting point of every chain.
    pub const fn root(&self) -> Locator<'_, D> {
        Locator {
            page: self,
            selector: Selector::root(),
        }
    }

    pub fn locator(&self, css: &str) -> Locator<'_, D> {
        self.root().locator(css)
    }

    pub fn get_by_role(&self, role: Role) -> Locator<'_, D> {
        self.root().get_by_role(role)
    }

    pub fn get_by_role_named(&self, role: Role, name: impl Into<TextMatch>) -> Locator<'_, D> {
        self.root().get_by_role_named(role, name)
    }

    pub fn get_by_text(&self, text: impl Into<TextMatch>) -> Locator<'_, D> {
        self.root().get_by_text(text)
    }

    pub fn get_by_label(&self, text: impl Into<TextMatch>) -> Locator<'_, D> {
        self.root().get_by_label(text)
    }

    pub fn get_by_placeholder(&self, text: impl Into<TextMatch>) -> Locator<'_, D> {
        self.root().get_by_placeholder(text)
    }

    pub fn get_by_test_id(&self, id: &str) -> Locator<'_, D> {
        self.root().get_by_test_id(id)
    }

    /// # Errors
    ///
    /// Fails if the scroll script cannot run.
    pub async fn scroll_to_bottom(&self) -> Result<()> {
        Ok(self.driver.scroll_window(ScrollPosition::Bottom).await?)
    }

    /// # Errors
    ///
    /// Fails if the scroll script cannot run.
    pub async fn scroll_to_top(&self) -> Result<()> {
        Ok(self.driver.scroll_window(ScrollPosition::Top).await?)
    }

    /// Accept the next native dialog the page opens.
    ///
    /// # Errors
    ///
    /// Fails if the dialog listener cannot be installed.
    pub async fn accept_next_dialog(&self) -> Result<()> {
        Ok(self.driver.accept_next_dialog().await?)
    }

    /// Run `trigger` and wait for the download it starts.
    ///
    /// # Errors
    ///
    /// Fails if `trigger` fails or no download finishes within the action
    /// timeout.
    pub async fn expect_download<F>(&self, trigger: F) -> Result<Download>
    where
        F: Future<Output = Result<()>>,
    {
        self.driver.begin_download().await?;
        trigger.await?;
        Ok(self
            .driver
            .finish_download(self.config.action_timeout)
            .await?)
    }
}

/// A lazily evaluated element query scoped to a page.
#[derive(Debug)]
pub struct Locator<'p, D> {
    page: &'p Page<D>,
    selector: Selector,
}

impl<D> Clone for Locator<'_, D> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            selector: self.selector.clone(),
        }
    }
}

impl<'p, D: Driver> Locator<'p, D> {
    fn then(&self, step: Step) -> Self {
        Self {
            page: self.page,
            selector: self.selector.then(step),
        }
    }

    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    pub const fn page(&self) -> &'p Page<D> {
        self.page
    }

    pub fn describe(&self) -> String {
        self.selector.describe()
    }

    pub fn locator(&self, css: &str) -> Self {
        self.then(Step::Css {
            selector: css.to_string(),
        })
    }

    pub fn get_by_role(&self, role: Role) -> Self {
        self.then(Step::Role { role, name: None })
    }

    /// Role with an accessible-name filter. Plain strings match as
    /// case-insensitive substrings; pass [`TextMatch::exact`] for equality.
    pub fn get_by_role_named(&self, role: Role, name: impl Into<TextMatch>) -> Self {
        self.then(Step::Role {
            role,
            name: Some(name.into()),
        })
    }

    pub fn get_by_text(&self, text: impl Into<TextMatch>) -> Self {
        self.then(Step::Text { text: text.into() })
    }

    pub fn get_by_label(&self, text: impl Into<TextMatch>) -> Self {
        self.then(Step::Label { text: text.into() })
    }

    pub fn get_by_placeholder(&self, text: impl Into<TextMatch>) -> Self {
        self.then(Step::Placeholder { text: text.into() })
    }

    /// Elements whose configured test-id attribute equals `id`.
    pub fn get_by_test_id(&self, id: &str) -> Self {
        self.then(Step::TestId {
            attribute: self.page.config.test_id_attribute.clone(),
            value: id.to_string(),
        })
    }

    /// Keep matches whose text contains (or matches) `text`.
    pub fn filter_has_text(&self, text: impl Into<TextMatch>) -> Self {
        self.then(Step::HasText { text: text.into() })
    }

    /// Zero-based; negative indexes count from the end.
    pub fn nth(&self, index: i64) -> Self {
        self.then(Step::Nth { index })
    }

    pub fn first(&self) -> Self {
        self.nth(0)
    }

    pub fn last(&self) -> Self {
        self.nth(-1)
    }

    /// Number of elements currently matched.
    ///
    /// # Errors
    ///
    /// Fails if the page cannot be queried.
    pub async fn count(&self) -> Result<usize> {
        Ok(self.page.driver.query(&self.selector).await?.len())
    }

    /// One locator per element currently matched.
    ///
    /// # Errors
    ///
    /// Fails if the page cannot be queried.
    pub async fn all(&self) -> Result<Vec<Self>> {
        let count = self.count().await?;
        Ok((0..count)
            .map(|i| self.nth(i64::try_from(i).unwrap_or(i64::MAX)))
            .collect())
    }

    /// Raw text content of the single matched element.
    ///
    /// # Errors
    ///
    /// Fails if the selector does not settle on exactly one element.
    pub async fn text_content(&self) -> Result<String> {
        Ok(self.wait_for_single(false).await?.text)
    }

    /// Rendered text of the single matched element.
    ///
    /// # Errors
    ///
    /// Fails if the selector does not settle on exactly one element.
    pub async fn inner_text(&self) -> Result<String> {
        Ok(self.wait_for_single(false).await?.inner_text)
    }

    /// # Errors
    ///
    /// Fails if the selector does not settle on exactly one element.
    pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        self.wait_for_single(false).await?;
        Ok(self.page.driver.attribute(&self.selector, name).await?)
    }

    /// # Errors
    ///
    /// Fails if no single visible element appears within the action timeout.
    pub async fn click(&self) -> Result<()> {
        self.act(&Action::Click).await
    }

    /// # Errors
    ///
    /// Fails if no single visible element appears within the action timeout.
    pub async fn hover(&self) -> Result<()> {
        self.act(&Action::Hover).await
    }

    /// # Errors
    ///
    /// Fails if no single visible element appears within the action timeout
    /// or it does not hold a value.
    pub async fn fill(&self, value: &str) -> Result<()> {
        self.act(&Action::Fill {
            value: value.to_string(),
        })
        .await
    }

    /// # Errors
    ///
    /// Fails if no single visible checkable element appears within the
    /// action timeout.
    pub async fn check(&self) -> Result<()> {
        self.act(&Action::Check).await
    }

    /// Select the option whose label equals `label`.
    ///
    /// # Errors
    ///
    /// Fails if no single visible select appears within the action timeout
    /// or no option carries that label.
    pub async fn select_option(&self, label: &str) -> Result<()> {
        self.act(&Action::SelectOption {
            label: label.to_string(),
        })
        .await
    }

    /// # Errors
    ///
    /// Fails if the selector does not settle on exactly one element.
    pub async fn scroll_into_view_if_needed(&self) -> Result<()> {
        self.act(&Action::ScrollIntoViewIfNeeded).await
    }

    /// # Errors
    ///
    /// Fails if the selector does not settle on exactly one file input.
    pub async fn set_input_files(&self, file: &FilePayload) -> Result<()> {
        self.wait_for_single(false).await?;
        debug!(locator = %self.describe(), file = %file.name, "set input files");
        Ok(self
            .page
            .driver
            .set_input_files(&self.selector, file)
            .await?)
    }

    async fn act(&self, action: &Action) -> Result<()> {
        let deadline = Instant::now() + self.page.config.action_timeout;
        loop {
            self.wait_for_single_until(action.requires_visible(), deadline)
                .await?;
            debug!(locator = %self.describe(), action = action.name(), "perform");
            match self.page.driver.perform(&self.selector, action).await {
                Ok(()) => return Ok(()),
                // The element moved or the page navigated between the
                // query and the action; resolve again.
                Err(err)
                    if err.is_transient() || matches!(err, DriverError::NotUnique { .. }) =>
                {
                    debug!(error = %err, "retrying action");
                }
                Err(err) => return Err(err.into()),
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::structural(
                    self.describe(),
                    format!(
                        "could not {} within {:?}",
                        action.name(),
                        self.page.config.action_timeout
                    ),
                ));
            }
            tokio::time::sleep(self.page.config.poll_interval).await;
        }
    }

    async fn wait_for_single(&self, require_visible: bool) -> Result<ElementSnapshot> {
        let deadline = Instant::now() + self.page.config.action_timeout;
        self.wait_for_single_until(require_visible, deadline).await
    }

    async fn wait_for_single_until(
        &self,
        require_visible: bool,
        deadline: Instant,
    ) -> Result<ElementSnapshot> {
        let mut observed = String::from("no elements");
        loop {
            match self.page.driver.query(&self.selector).await {
                Ok(mut found) if found.len() == 1 => {
                    let only = found.remove(0);
                    if only.visible || !require_visible {
                        return Ok(only);
                    }
                    observed = "one hidden element".to_string();
                }
                Ok(found) if found.len() > 1 => {
                    return Err(HarnessError::structural(
                        self.describe(),
                        format!(
                            "strict mode violation: resolved to {} elements",
                            found.len()
                        ),
                    ));
                }
                Ok(_) => observed = "no elements".to_string(),
                Err(err) if err.is_transient() => observed = err.to_string(),
                Err(err) => return Err(err.into()),
            }
            if Instant::now() >= deadline {
                let wanted = if require_visible {
                    "one visible element"
                } else {
                    "one element"
                };
                return Err(HarnessError::structural(
                    self.describe(),
                    format!(
                        "waited {:?} for {wanted}, found {observed}",
                        self.page.config.action_timeout
                    ),
                ));
            }
            tokio::time::sleep(self.page.config.poll_interval).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::time::Duration;

    use super::*;
    use crate::driver::fake::FakeDriver;

    pub(crate) fn fast_config() -> Arc<SuiteConfig> {
        Arc::new(SuiteConfig {
            expect_timeout: Duration::from_millis(200),
            action_timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(5),
            ..SuiteConfig::default()
        })
    }

    pub(crate) fn fake_page() -> Page<FakeDriver> {
        Page::new(FakeDriver::new(), fast_config())
    }

    #[tokio::test]
    async fn test_goto_joins_base_url() {
        let page = fake_page();
        page.goto("/view_cart").await.unwrap();
        assert_eq!(
            page.driver().visited(),
            vec!["https://www.automationexercise.com/view_cart".to_string()]
        );
    }

    #[tokio::test]
    async fn test_test_id_uses_configured_attribute() {
        let page = fake_page();
        let locator = page.get_by_test_id("signup-email");
        assert_eq!(locator.describe(), "[data-qa=\"signup-email\"]");
    }

    #[tokio::test]
    async fn test_click_waits_for_element() {
        let page = fake_page();
        let button = page.get_by_role_named(Role::Button, "Signup");
        page.driver()
            .show_after(button.selector(), 3, vec![ElementSnapshot::visible("Signup")]);

        button.click().await.unwrap();
        assert_eq!(page.driver().performed(button.selector()), vec![Action::Click]);
    }

    #[tokio::test]
    async fn test_click_rejects_ambiguous_match() {
        let page = fake_page();
        let buttons = page.locator(".btn");
        page.driver().show(
            buttons.selector(),
            vec![ElementSnapshot::visible("a"), ElementSnapshot::visible("b")],
        );

        let err = buttons.click().await.unwrap_err();
        assert!(err.to_string().contains("strict mode violation"));
        assert!(page.driver().actions().is_empty());
    }

    #[tokio::test]
    async fn test_click_times_out_on_hidden_element() {
        let page = fake_page();
        let link = page.get_by_role_named(Role::Link, "Continue");
        page.driver()
            .show(link.selector(), vec![ElementSnapshot::hidden("Continue")]);

        let err = link.click().await.unwrap_err();
        assert!(matches!(err, HarnessError::Structural { .. }));
        assert!(err.to_string().contains("one hidden element"));
    }

    #[tokio::test]
    async fn test_text_content_does_not_require_visibility() {
        let page = fake_page();
        let name = page.locator(".productinfo p").first();
        page.driver()
            .show(name.selector(), vec![ElementSnapshot::hidden(" Blue Top ")]);
        assert_eq!(name.text_content().await.unwrap(), " Blue Top ");
    }

    #[tokio::test]
    async fn test_get_attribute_reads_single_match() {
        let page = fake_page();
        let img = page.locator(".productinfo img").first();
        page.driver()
            .show(img.selector(), vec![ElementSnapshot::visible("")]);
        page.driver()
            .set_attribute(img.selector(), "src", "/get_product_picture/1");

        assert_eq!(
            img.get_attribute("src").await.unwrap().as_deref(),
            Some("/get_product_picture/1")
        );
        assert_eq!(img.get_attribute("alt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scroll_into_view_is_an_action() {
        let page = fake_page();
        let link = page.get_by_role_named(Role::Link, "Write Your Review");
        page.driver()
            .show(link.selector(), vec![ElementSnapshot::offscreen("Write Your Review")]);

        link.scroll_into_view_if_needed().await.unwrap();
        assert_eq!(
            page.driver().performed(link.selector()),
            vec![Action::ScrollIntoViewIfNeeded]
        );
    }

    #[tokio::test]
    async fn test_all_yields_indexed_locators() {
        let page = fake_page();
        let links = page.locator(".brands-name").get_by_role(Role::Link);
        page.driver().show(
            links.selector(),
            vec![ElementSnapshot::visible("Polo"), ElementSnapshot::visible("H&M")],
        );

        let all = links.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].selector(), links.nth(1).selector());
    }

    #[tokio::test]
    async fn test_expect_download_runs_trigger() {
        let page = fake_page();
        let link = page.get_by_role_named(Role::Link, "Download Invoice");
        page.driver()
            .show(link.selector(), vec![ElementSnapshot::visible("Download Invoice")]);
        page.driver().set_download("invoice.txt", "Hi Ada Lovelace");

        let download = page.expect_download(link.click()).await.unwrap();
        assert_eq!(download.suggested_filename, "invoice.txt");
        assert!(download.text().contains("Ada Lovelace"));
    }
}
