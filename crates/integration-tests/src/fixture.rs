//! Per-test fixtures.

use std::future::Future;
use std::panic::{AssertUnwindSafe, resume_unwind};
use std::sync::Arc;

use automation_exercise_core::UserProfile;
use futures::FutureExt;
use tracing::{info, warn};

use crate::config::SuiteConfig;
use crate::driver::ChromiumDriver;
use crate::error::Result;
use crate::helpers::auth::LoggedIn;
use crate::page::Page;
use crate::telemetry::init_tracing;

/// A fresh browser and tab for one test.
#[derive(Debug)]
pub struct TestContext {
    pub page: Page<ChromiumDriver>,
}

impl TestContext {
    /// Load configuration from the environment and launch a browser.
    ///
    /// # Errors
    ///
    /// Fails if configuration is invalid or the browser cannot start.
    pub async fn launch() -> Result<Self> {
        init_tracing();
        let config = SuiteConfig::from_env()?;
        Self::launch_with(Arc::new(config)).await
    }

    /// Launch a browser with explicit configuration.
    ///
    /// # Errors
    ///
    /// Fails if the browser cannot start.
    pub async fn launch_with(config: Arc<SuiteConfig>) -> Result<Self> {
        let driver = ChromiumDriver::launch(&config).await?;
        info!(base_url = %config.base_url, "test context ready");
        Ok(Self {
            page: Page::new(driver, config),
        })
    }

    /// Delete an account created by the test; failures are logged, not raised.
    pub async fn cleanup_account(logged_in: LoggedIn<'_, ChromiumDriver>, profile: &UserProfile) {
        if let Err(err) = logged_in.delete_account().await {
            warn!(email = %profile.email(), error = %err, "account cleanup failed");
        }
    }

    /// Close the browser.
    ///
    /// # Errors
    ///
    /// Fails if the browser does not shut down cleanly.
    pub async fn close(self) -> Result<()> {
        self.page.into_driver().close().await?;
        Ok(())
    }
}

/// Run `body`, then await `cleanup` if it returned an error or panicked.
/// The error is returned and a panic resumes once cleanup has finished.
pub async fn run_with_cleanup<B, C>(body: B, cleanup: C) -> Result<()>
where
    B: Future<Output = Result<()>>,
    C: Future<Output = ()>,
{
    match AssertUnwindSafe(body).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            cleanup.await;
            Err(err)
        }
        Err(panic) => {
            cleanup.await;
            resume_unwind(panic)
        }
    }
}
