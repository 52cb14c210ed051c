//! Retrying assertions.
//!
//! Every assertion re-queries the page every `poll_interval` until it holds
//! or `expect_timeout` elapses. A timeout becomes
//! [`HarnessError::Expectation`] carrying the last observation. Visibility
//! assertions are strict: a selector that resolves to several elements is a
//! structural error, not a pending state.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::driver::{Driver, ElementSnapshot, TextMatch, selector::normalize_whitespace};
use crate::error::{HarnessError, Result};
use crate::page::{Locator, Page};

enum Verdict {
    Pass,
    Pending(String),
    Strict(usize),
}

/// Assertions on a locator.
pub fn expect<'l, 'p, D: Driver>(locator: &'l Locator<'p, D>) -> LocatorAssertions<'l, 'p, D> {
    LocatorAssertions {
        locator,
        timeout: locator.page().config().expect_timeout,
    }
}

/// Assertions on page-level state.
pub fn expect_page<D: Driver>(page: &Page<D>) -> PageAssertions<'_, D> {
    PageAssertions {
        page,
        timeout: page.config().expect_timeout,
    }
}

pub struct LocatorAssertions<'l, 'p, D> {
    locator: &'l Locator<'p, D>,
    timeout: Duration,
}

impl<D: Driver> LocatorAssertions<'_, '_, D> {
    /// Override the configured expect timeout for this assertion.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exactly one match, rendered.
    ///
    /// # Errors
    ///
    /// `Expectation` on timeout, `Structural` if several elements match.
    pub async fn to_be_visible(&self) -> Result<()> {
        self.poll_snapshots("to be visible", |found| match found {
            [only] if only.visible => Verdict::Pass,
            [] | [_] => Verdict::Pending(observe(found)),
            _ => Verdict::Strict(found.len()),
        })
        .await
    }

    /// No match, or one match that is not rendered.
    ///
    /// # Errors
    ///
    /// `Expectation` on timeout, `Structural` if several elements match.
    pub async fn to_be_hidden(&self) -> Result<()> {
        self.poll_snapshots("to be hidden", |found| match found {
            [] => Verdict::Pass,
            [only] if !only.visible => Verdict::Pass,
            [_] => Verdict::Pending(observe(found)),
            _ => Verdict::Strict(found.len()),
        })
        .await
    }

    /// # Errors
    ///
    /// `Expectation` if the count differs when the timeout elapses.
    pub async fn to_have_count(&self, expected: usize) -> Result<()> {
        self.poll_snapshots(&format!("to have count {expected}"), |found| {
            if found.len() == expected {
                Verdict::Pass
            } else {
                Verdict::Pending(observe(found))
            }
        })
        .await
    }

    /// # Errors
    ///
    /// `Expectation` on timeout, `Structural` if several elements match.
    pub async fn to_be_in_viewport(&self) -> Result<()> {
        self.poll_snapshots("to be in viewport", |found| match found {
            [only] if only.in_viewport => Verdict::Pass,
            [] | [_] => Verdict::Pending(observe(found)),
            _ => Verdict::Strict(found.len()),
        })
        .await
    }

    /// # Errors
    ///
    /// `Expectation` on timeout, `Structural` if several elements match.
    pub async fn not_to_be_in_viewport(&self) -> Result<()> {
        self.poll_snapshots("not to be in viewport", |found| match found {
            [only] if !only.in_viewport => Verdict::Pass,
            [] | [_] => Verdict::Pending(observe(found)),
            _ => Verdict::Strict(found.len()),
        })
        .await
    }

    /// Single match whose text satisfies `text`.
    ///
    /// # Errors
    ///
    /// `Expectation` on timeout, `Structural` if several elements match.
    pub async fn to_have_text(&self, text: impl Into<TextMatch>) -> Result<()> {
        let text = text.into();
        self.poll_snapshots(&format!("to have text {text:?}"), |found| match found {
            [only] if text.matches(&only.text) => Verdict::Pass,
            [] | [_] => Verdict::Pending(observe(found)),
            _ => Verdict::Strict(found.len()),
        })
        .await
    }

    /// Single match whose attribute `name` equals `value`.
    ///
    /// # Errors
    ///
    /// `Expectation` on timeout, `Structural` if several elements match.
    pub async fn to_have_attribute(&self, name: &str, value: &str) -> Result<()> {
        let expected = format!("to have attribute {name}={value:?}");
        let deadline = Instant::now() + self.timeout;
        let driver = self.locator.page().driver();
        let selector = self.locator.selector();
        loop {
            let observed = match driver.query(selector).await {
                Ok(found) if found.len() > 1 => return Err(self.strict(found.len())),
                Ok(found) if found.len() == 1 => match driver.attribute(selector, name).await {
                    Ok(Some(actual)) if actual == value => return Ok(()),
                    Ok(Some(actual)) => format!("{name}={actual:?}"),
                    Ok(None) => format!("no {name} attribute"),
                    Err(err) if err.is_transient() => err.to_string(),
                    Err(err) => return Err(err.into()),
                },
                Ok(_) => "0 elements".to_string(),
                Err(err) if err.is_transient() => err.to_string(),
                Err(err) => return Err(err.into()),
            };
            if Instant::now() >= deadline {
                return Err(self.failed(&expected, observed));
            }
            tokio::time::sleep(self.locator.page().config().poll_interval).await;
        }
    }

    async fn poll_snapshots(
        &self,
        expected: &str,
        judge: impl Fn(&[ElementSnapshot]) -> Verdict,
    ) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        let driver = self.locator.page().driver();
        loop {
            let observed = match driver.query(self.locator.selector()).await {
                Ok(found) => match judge(&found) {
                    Verdict::Pass => {
                        debug!(locator = %self.locator.describe(), expected, "expectation met");
                        return Ok(());
                    }
                    Verdict::Pending(observed) => observed,
                    Verdict::Strict(count) => return Err(self.strict(count)),
                },
                Err(err) if err.is_transient() => err.to_string(),
                Err(err) => return Err(err.into()),
            };
            if Instant::now() >= deadline {
                return Err(self.failed(expected, observed));
            }
            tokio::time::sleep(self.locator.page().config().poll_interval).await;
        }
    }

    fn strict(&self, count: usize) -> HarnessError {
        HarnessError::structural(
            self.locator.describe(),
            format!("strict mode violation: resolved to {count} elements"),
        )
    }

    fn failed(&self, expected: &str, observed: String) -> HarnessError {
        HarnessError::Expectation {
            target: self.locator.describe(),
            expected: expected.to_string(),
            observed,
            timeout: self.timeout,
        }
    }
}

/// Characters of element text quoted in a failure message.
const OBSERVED_TEXT_LIMIT: usize = 80;

fn observe(found: &[ElementSnapshot]) -> String {
    match found {
        [] => "0 elements".to_string(),
        [only] => {
            let state = if only.in_viewport {
                "visible"
            } else if only.visible {
                "visible, outside viewport"
            } else {
                "hidden"
            };
            let mut text = normalize_whitespace(&only.text);
            if text.chars().count() > OBSERVED_TEXT_LIMIT {
                let cut = text
                    .char_indices()
                    .nth(OBSERVED_TEXT_LIMIT)
                    .map_or(text.len(), |(i, _)| i);
                text.truncate(cut);
                text.push('…');
            }
            format!("1 element ({state}) {text:?}")
        }
        many => format!("{} elements", many.len()),
    }
}

pub struct PageAssertions<'p, D> {
    page: &'p Page<D>,
    timeout: Duration,
}

impl<D: Driver> PageAssertions<'_, D> {
    /// # Errors
    ///
    /// `Expectation` if the title does not match before the timeout.
    pub async fn to_have_title(&self, title: impl Into<TextMatch>) -> Result<()> {
        let title = &title.into();
        let page = self.page;
        self.poll(&format!("title to match {title:?}"), || async move {
            let actual = page.driver().title().await?;
            Ok((title.matches(&actual), format!("title {actual:?}")))
        })
        .await
    }

    /// Current URL equals `path` resolved against the base URL.
    ///
    /// # Errors
    ///
    /// `Expectation` if the URL differs when the timeout elapses.
    pub async fn to_have_url(&self, path: &str) -> Result<()> {
        let expected = &self.page.config().page_url(path)?;
        let page = self.page;
        self.poll(&format!("url to be {expected}"), || async move {
            let actual = page.driver().current_url().await?;
            Ok((actual == expected.as_str(), format!("url {actual}")))
        })
        .await
    }

    async fn poll<F, Fut>(&self, expected: &str, observe_once: F) -> Result<()>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<(bool, String), crate::driver::DriverError>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            let observed = match observe_once().await {
                Ok((true, _)) => return Ok(()),
                Ok((false, observed)) => observed,
                Err(err) if err.is_transient() => err.to_string(),
                Err(err) => return Err(err.into()),
            };
            if Instant::now() >= deadline {
                return Err(HarnessError::Expectation {
                    target: "page".to_string(),
                    expected: expected.to_string(),
                    observed,
                    timeout: self.timeout,
                });
            }
            tokio::time::sleep(self.page.config().poll_interval).await;
        }
    }
}
