//! Page navigation.

use tracing::instrument;

use crate::driver::{Driver, Role, TextMatch};
use crate::error::Result;
use crate::expect::{expect, expect_page};
use crate::page::{Locator, Page};
use crate::step::step;

/// Title pattern every page of the site carries.
pub const SITE_TITLE: &str = "Automation Exercise";

/// The footer newsletter heading, at the bottom of every page.
pub fn subscription_heading<D: Driver>(page: &Page<D>) -> Locator<'_, D> {
    page.get_by_role_named(Role::Heading, TextMatch::exact("Subscription"))
}

/// The home carousel heading, at the top of the home page.
pub fn main_heading<D: Driver>(page: &Page<D>) -> Locator<'_, D> {
    page.get_by_role_named(Role::Heading, "Full-Fledged practice website")
}

/// Load the home page and check its title.
///
/// # Errors
///
/// Fails if navigation fails or the title never matches.
#[instrument(skip(page))]
pub async fn navigate_to_home<D: Driver>(page: &Page<D>) -> Result<()> {
    step("navigate to home", async {
        page.goto("/").await?;
        expect_page(page)
            .to_have_title(TextMatch::regex_i(SITE_TITLE))
            .await
    })
    .await
}

/// Follow the first link named `link_name` and wait for `heading`.
///
/// # Errors
///
/// Fails if the link cannot be clicked or the heading never shows.
#[instrument(skip(page))]
pub async fn navigate_to_page<D: Driver>(
    page: &Page<D>,
    link_name: &str,
    heading: &str,
) -> Result<()> {
    step(&format!("navigate to {link_name}"), async {
        page.get_by_role_named(Role::Link, link_name)
            .first()
            .click()
            .await?;
        expect(&page.get_by_role_named(Role::Heading, heading))
            .to_be_visible()
            .await
    })
    .await
}

/// # Errors
///
/// Fails if the scroll script cannot run.
pub async fn scroll_down<D: Driver>(page: &Page<D>) -> Result<()> {
    page.scroll_to_bottom().await
}

/// # Errors
///
/// Fails if the scroll script cannot run.
pub async fn scroll_up<D: Driver>(page: &Page<D>) -> Result<()> {
    page.scroll_to_top().await
}
