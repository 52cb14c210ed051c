//! Footer newsletter subscription.

use crate::driver::Driver;
use crate::error::Result;
use crate::expect::expect;
use crate::page::Page;
use crate::step::step;

pub const SUBSCRIBED: &str = "You have been successfully";
pub const SUBSCRIPTION_EMAIL: &str = "test@test.com";

/// Subscribe `email` through the footer form and wait for the confirmation.
///
/// # Errors
///
/// Fails if a confirmation is already showing or never appears.
pub async fn fill_subscription_form<D: Driver>(page: &Page<D>, email: &str) -> Result<()> {
    step("subscribe to newsletter", async {
        page.get_by_placeholder("Your email address")
            .fill(email)
            .await?;
        let confirmation = page.get_by_text(SUBSCRIBED);
        expect(&confirmation).to_be_hidden().await?;
        page.locator("button[type=\"submit\"]#subscribe")
            .click()
            .await?;
        expect(&confirmation).to_be_visible().await
    })
    .await
}
