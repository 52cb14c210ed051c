//! The "Contact Us" form.

use tracing::instrument;

use crate::driver::{Driver, FilePayload, Role, TextMatch};
use crate::error::Result;
use crate::expect::{expect, expect_page};
use crate::helpers::navigation::SITE_TITLE;
use crate::page::Page;
use crate::step::step;

pub const CONTACT_SUCCESS: &str = "Success! Your details have been submitted successfully.";

/// What a visitor types into the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// The attachment the contact scenarios upload.
#[must_use]
pub fn sample_attachment() -> FilePayload {
    FilePayload::new("file.txt", "text/plain", "this is test")
}

/// Fill and submit the contact form on the current page, accept the
/// confirmation dialog, check the success banner and return home.
///
/// # Errors
///
/// Fails if a field is missing, the banner never shows, or the home page
/// does not load afterwards.
#[instrument(skip_all, fields(subject = %message.subject, file = %attachment.name))]
pub async fn submit_contact_form<D: Driver>(
    page: &Page<D>,
    message: &ContactMessage,
    attachment: &FilePayload,
) -> Result<()> {
    step("submit contact form", async {
        page.get_by_placeholder("Name").fill(&message.name).await?;
        page.get_by_placeholder(TextMatch::exact("Email"))
            .fill(&message.email)
            .await?;
        page.get_by_placeholder("Subject")
            .fill(&message.subject)
            .await?;
        page.get_by_placeholder("Your Message Here")
            .fill(&message.message)
            .await?;
        page.locator("input[type=\"file\"]")
            .set_input_files(attachment)
            .await?;

        page.accept_next_dialog().await?;
        page.get_by_role_named(Role::Button, "Submit").click().await?;
        expect(&page.locator("#contact-page").get_by_text(CONTACT_SUCCESS))
            .to_be_visible()
            .await
    })
    .await?;

    step("return home", async {
        page.get_by_role_named(Role::Link, "Home").last().click().await?;
        expect_page(page).to_have_url("/").await?;
        expect_page(page)
            .to_have_title(TextMatch::regex_i(SITE_TITLE))
            .await
    })
    .await
}
