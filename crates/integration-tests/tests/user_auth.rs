//! Login and logout scenarios.

mod common;

use automation_exercise_core::{Credentials, generate_user_profile};
use automation_exercise_integration_tests::helpers::auth::{SIGNUP_HEADING, SignupPage, login_user};
use automation_exercise_integration_tests::driver::Role;
use automation_exercise_integration_tests::{expect, expect_page};

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_login_with_correct_credentials() {
    let ctx = common::context().await;
    let profile = generate_user_profile();

    common::with_account_cleanup(&ctx.page, &profile, async {
        common::register_from_home(&ctx.page, &profile)
            .await?
            .logout()
            .await?;

        let logged_in = login_user(&ctx.page, &profile.credentials())
            .await?
            .expect_logged_in(&profile.full_name())
            .await?;
        logged_in.delete_account().await?;
        Ok(())
    })
    .await
    .expect("Login flow failed");

    ctx.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_login_with_incorrect_credentials() {
    let ctx = common::context().await;
    // Never registered.
    let profile = generate_user_profile();
    let credentials = Credentials::new(profile.email().as_str(), profile.password());

    let signup = SignupPage::open(&ctx.page)
        .await
        .expect("Failed to open signup page");
    signup
        .login(&credentials)
        .await
        .expect("Failed to submit login form")
        .expect_rejected()
        .await
        .expect("Login was not rejected");

    ctx.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_logout_returns_to_login_page() {
    let ctx = common::context().await;
    let profile = generate_user_profile();

    common::with_account_cleanup(&ctx.page, &profile, async {
        let signup = common::register_from_home(&ctx.page, &profile)
            .await?
            .logout()
            .await?;
        expect_page(signup.page()).to_have_url("/login").await?;
        expect(&ctx.page.get_by_role_named(Role::Heading, SIGNUP_HEADING))
            .to_be_visible()
            .await?;

        signup
            .login(&profile.credentials())
            .await?
            .expect_logged_in(&profile.full_name())
            .await?
            .delete_account()
            .await?;
        Ok(())
    })
    .await
    .expect("Logout flow failed");

    ctx.close().await.expect("Failed to close browser");
}
