//! Account registration scenarios.

mod common;

use automation_exercise_core::generate_user_profile;
use automation_exercise_integration_tests::{TestContext, expect};
use automation_exercise_integration_tests::helpers::auth::ACCOUNT_DELETED;

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_register_and_delete_user() {
    let ctx = common::context().await;
    let profile = generate_user_profile();

    common::with_account_cleanup(&ctx.page, &profile, async {
        let logged_in = common::register_from_home(&ctx.page, &profile).await?;
        assert_eq!(logged_in.full_name(), profile.full_name());
        let deleted = logged_in.delete_account().await?;

        // After "Continue" the confirmation is gone.
        expect(&deleted.page().get_by_text(ACCOUNT_DELETED))
            .to_be_hidden()
            .await
    })
    .await
    .expect("Register and delete flow failed");

    ctx.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_register_with_existing_email() {
    let ctx = common::context().await;
    let profile = generate_user_profile();

    common::with_account_cleanup(&ctx.page, &profile, async {
        let signup = common::register_from_home(&ctx.page, &profile)
            .await?
            .logout()
            .await?;

        // Same email again: the site refuses before the account form.
        let signup = signup
            .submit_signup(&profile)
            .await?
            .expect_email_taken()
            .await?;

        let logged_in = signup
            .login(&profile.credentials())
            .await?
            .expect_logged_in(&profile.full_name())
            .await?;
        TestContext::cleanup_account(logged_in, &profile).await;
        Ok(())
    })
    .await
    .expect("Duplicate email flow failed");

    ctx.close().await.expect("Failed to close browser");
}
