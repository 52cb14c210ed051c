//! Newsletter subscription scenarios.

mod common;

use automation_exercise_integration_tests::driver::{Role, TextMatch};
use automation_exercise_integration_tests::helpers::navigation::{
    navigate_to_home, scroll_down, subscription_heading,
};
use automation_exercise_integration_tests::helpers::subscription::{
    SUBSCRIPTION_EMAIL, fill_subscription_form,
};
use automation_exercise_integration_tests::{Result, expect, step};

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_subscribe_from_home_page() {
    let ctx = common::context().await;
    let page = &ctx.page;

    let outcome: Result<()> = async {
        navigate_to_home(page).await?;
        expect(&subscription_heading(page))
            .not_to_be_in_viewport()
            .await?;

        step("scroll down", async {
            scroll_down(page).await?;
            expect(&subscription_heading(page)).to_be_in_viewport().await
        })
        .await?;

        fill_subscription_form(page, SUBSCRIPTION_EMAIL).await
    }
    .await;
    outcome.expect("Home page subscription scenario failed");

    ctx.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_subscribe_from_cart_page() {
    let ctx = common::context().await;
    let page = &ctx.page;

    let outcome: Result<()> = async {
        navigate_to_home(page).await?;

        step("open cart", async {
            let heading = page.get_by_text("Shopping Cart");
            expect(&heading).to_be_hidden().await?;
            page.get_by_role_named(Role::Link, TextMatch::exact("Cart")).click().await?;
            expect(&heading).to_be_visible().await
        })
        .await?;

        step("scroll down", async {
            scroll_down(page).await?;
            expect(&subscription_heading(page)).to_be_in_viewport().await
        })
        .await?;

        fill_subscription_form(page, SUBSCRIPTION_EMAIL).await
    }
    .await;
    outcome.expect("Cart page subscription scenario failed");

    ctx.close().await.expect("Failed to close browser");
}
