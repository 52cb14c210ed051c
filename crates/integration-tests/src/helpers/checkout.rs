//! Checkout, payment and invoice download.

use std::time::Duration;

use automation_exercise_core::UserProfile;
use chrono::{Datelike, Local};
use tracing::{info, instrument};

use crate::driver::{Download, Driver, Role};
use crate::error::{HarnessError, Result};
use crate::expect::expect;
use crate::page::Page;
use crate::step::step;

pub const ORDER_CONFIRMED: &str = "Congratulations! Your order has been confirmed!";
pub const CHECKOUT_REQUIRES_LOGIN: &str = "Register / Login account to";
pub const INVOICE_FILENAME: &str = "invoice.txt";
pub const ORDER_COMMENT: &str = "Test Order";

/// From the cart page, start checkout.
///
/// A guest is offered the "Register / Login" link, which is followed. A
/// logged-in user gets the order review: both address blocks are checked,
/// a comment is left and the order is placed.
///
/// # Errors
///
/// Fails if the cart page, checkout modal or order review do not show.
#[instrument(skip(page, profile))]
pub async fn proceed_to_checkout<D: Driver>(
    page: &Page<D>,
    profile: &UserProfile,
    logged_in: bool,
) -> Result<()> {
    step("proceed to checkout", async {
        expect(&page.get_by_text("Shopping Cart")).to_be_visible().await?;
        page.locator("a")
            .filter_has_text("Proceed To Checkout")
            .click()
            .await?;

        if logged_in {
            verify_address_details(page, profile).await?;
            page.get_by_role(Role::Textbox)
                .first()
                .fill(ORDER_COMMENT)
                .await?;
            page.get_by_role_named(Role::Link, "Place Order")
                .click()
                .await
        } else {
            expect(
                &page
                    .get_by_role(Role::Paragraph)
                    .filter_has_text(CHECKOUT_REQUIRES_LOGIN),
            )
            .to_be_visible()
            .await?;
            page.get_by_role_named(Role::Link, "Register / Login")
                .click()
                .await
        }
    })
    .await
}

/// Every address line must appear twice: once in the delivery block and
/// once in the billing block.
///
/// # Errors
///
/// `Expectation` naming the first line that is missing or duplicated.
pub async fn verify_address_details<D: Driver>(
    page: &Page<D>,
    profile: &UserProfile,
) -> Result<()> {
    step("verify address details", async {
        for line in profile.address_lines() {
            expect(&page.get_by_role(Role::Listitem).filter_has_text(line))
                .to_have_count(2)
                .await?;
        }
        Ok(())
    })
    .await
}

/// Fill the card form with the profile's card, pay, and wait for the
/// confirmation.
///
/// # Errors
///
/// Fails if a field cannot be filled or the order is not confirmed.
pub async fn fill_payment_details<D: Driver>(page: &Page<D>, profile: &UserProfile) -> Result<()> {
    let expiry_year = (Local::now().year() + 1).to_string();
    step("pay for order", async {
        page.get_by_test_id("name-on-card")
            .fill(&profile.full_name())
            .await?;
        page.get_by_test_id("card-number")
            .fill(profile.card().number())
            .await?;
        page.get_by_test_id("cvc")
            .fill(profile.card().cvc())
            .await?;
        page.get_by_test_id("expiry-month").fill("12").await?;
        page.get_by_test_id("expiry-year")
            .fill(&expiry_year)
            .await?;
        page.get_by_role_named(Role::Button, "Pay and Confirm Order")
            .click()
            .await?;
        expect(
            &page
                .get_by_role(Role::Paragraph)
                .filter_has_text(ORDER_CONFIRMED),
        )
        .to_be_visible()
        .await
    })
    .await
}

/// Download the invoice and check it names the buyer.
///
/// # Errors
///
/// `Expectation` if the file name or contents are wrong.
pub async fn download_invoice<D: Driver>(
    page: &Page<D>,
    profile: &UserProfile,
) -> Result<Download> {
    step("download invoice", async {
        let link = page.get_by_role_named(Role::Link, "Download Invoice");
        let download = page.expect_download(link.click()).await?;
        info!(
            file = %download.suggested_filename,
            path = %download.path.display(),
            "invoice saved"
        );

        if download.suggested_filename != INVOICE_FILENAME {
            return Err(invoice_mismatch(
                format!("to be named {INVOICE_FILENAME}"),
                download.suggested_filename.clone(),
            ));
        }
        let full_name = profile.full_name();
        if !download.text().contains(&full_name) {
            return Err(invoice_mismatch(
                format!("to mention {full_name:?}"),
                download.text(),
            ));
        }
        Ok(download)
    })
    .await
}

fn invoice_mismatch(expected: String, observed: String) -> HarnessError {
    HarnessError::Expectation {
        target: "invoice download".to_string(),
        expected,
        observed,
        timeout: Duration::ZERO,
    }
}
