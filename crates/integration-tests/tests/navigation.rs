//! Page navigation and scrolling scenarios.

mod common;

use automation_exercise_integration_tests::driver::{Role, TextMatch};
use automation_exercise_integration_tests::helpers::navigation::{
    main_heading, navigate_to_home, scroll_down, scroll_up, subscription_heading,
};
use automation_exercise_integration_tests::{Result, expect, expect_page, step};

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_navigate_to_test_cases_page() {
    let ctx = common::context().await;
    let page = &ctx.page;

    let outcome: Result<()> = async {
        navigate_to_home(page).await?;
        step("open test cases", async {
            page.get_by_role_named(Role::Link, "Test Cases")
                .first()
                .click()
                .await?;
            expect_page(page)
                .to_have_title(TextMatch::regex_i("Test Cases"))
                .await?;
            expect(&page.get_by_role_named(Role::Link, TextMatch::regex(r"Test Case \d")))
                .to_have_count(26)
                .await
        })
        .await
    }
    .await;
    outcome.expect("Test cases scenario failed");

    ctx.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_scroll_up_with_arrow_button() {
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

        step("click scroll to top", async {
            page.locator("#scrollUp").click().await?;
            expect(&subscription_heading(page))
                .not_to_be_in_viewport()
                .await?;
            expect(&main_heading(page)).to_be_in_viewport().await
        })
        .await
    }
    .await;
    outcome.expect("Scroll up with arrow scenario failed");

    ctx.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "Requires Chrome and network access to automationexercise.com"]
async fn test_scroll_up_without_arrow_button() {
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

        step("scroll up", async {
            scroll_up(page).await?;
            expect(&subscription_heading(page))
                .not_to_be_in_viewport()
                .await?;
            expect(&main_heading(page)).to_be_in_viewport().await
        })
        .await
    }
    .await;
    outcome.expect("Scroll up without arrow scenario failed");

    ctx.close().await.expect("Failed to close browser");
}
