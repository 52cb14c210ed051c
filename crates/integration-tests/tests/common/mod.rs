//! Shared setup for browser scenarios.

#![allow(dead_code)]

use std::future::Future;

use automation_exercise_core::UserProfile;
use automation_exercise_integration_tests::driver::ChromiumDriver;
use automation_exercise_integration_tests::helpers::auth::{
    LoggedIn, SIGNUP_HEADING, SIGNUP_LINK, SignupPage, register_user,
};
use automation_exercise_integration_tests::fixture::run_with_cleanup;
use automation_exercise_integration_tests::helpers::navigation::{
    navigate_to_home, navigate_to_page,
};
use automation_exercise_integration_tests::{Page, Result, TestContext};

/// Launch a browser for one test.
pub async fn context() -> TestContext {
    TestContext::launch()
        .await
        .expect("Failed to launch browser")
}

/// Open the signup page from home and register `profile`.
pub async fn register_from_home<'p>(
    page: &'p Page<ChromiumDriver>,
    profile: &UserProfile,
) -> Result<LoggedIn<'p, ChromiumDriver>> {
    SignupPage::open(page).await?;
    register_user(page, profile).await
}

/// Delete `profile`'s account, logging in first unless the page already
/// shows the session.
pub async fn delete_by_login(page: &Page<ChromiumDriver>, profile: &UserProfile) -> Result<()> {
    navigate_to_home(page).await?;
    let logged_in = match LoggedIn::resume(page, &profile.full_name()).await {
        Ok(logged_in) => logged_in,
        Err(_) => {
            navigate_to_page(page, SIGNUP_LINK, SIGNUP_HEADING).await?;
            SignupPage::assume(page)
                .login(&profile.credentials())
                .await?
                .expect_logged_in(&profile.full_name())
                .await?
        }
    };
    logged_in.delete_account().await?;
    Ok(())
}

/// Run `body`; if it fails or panics, try to delete the account it may
/// have left on the site before reporting the failure.
pub async fn with_account_cleanup<F>(
    page: &Page<ChromiumDriver>,
    profile: &UserProfile,
    body: F,
) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    run_with_cleanup(body, async {
        if let Err(err) = delete_by_login(page, profile).await {
            tracing::warn!(email = %profile.email(), error = %err, "account cleanup failed");
        }
    })
    .await
}
