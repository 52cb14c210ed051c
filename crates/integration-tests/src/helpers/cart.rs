//! Adding products to the cart and checking what landed there.

use automation_exercise_core::{CartItem, CartPosition};
use futures::future::join_all;
use tracing::{debug, instrument};

use crate::driver::{Driver, Role, TextMatch};
use crate::error::{HarnessError, Result};
use crate::expect::expect;
use crate::page::{Locator, Page};
use crate::step::step;

pub const PRODUCT_ADDED_MESSAGE: &str = "Your product has been added to cart.";

/// The confirmation paragraph in the add-to-cart modal.
pub fn product_added_notification<D: Driver>(page: &Page<D>) -> Locator<'_, D> {
    page.get_by_role(Role::Paragraph)
        .filter_has_text(PRODUCT_ADDED_MESSAGE)
}

/// Add the product card at `index` to the cart.
///
/// `products` are the product cards of the listing (`.productinfo`).
/// With `continue_shopping` the modal is dismissed and the caller stays on
/// the listing; otherwise the modal's link leads to the cart.
///
/// # Errors
///
/// Fails if `index` is out of range, a stale notification is still showing,
/// or the modal never confirms the add.
#[instrument(skip(page, products), fields(products = products.len()))]
pub async fn add_item_to_cart<'p, D: Driver>(
    page: &'p Page<D>,
    products: &[Locator<'p, D>],
    index: usize,
    continue_shopping: bool,
) -> Result<CartItem> {
    let product = products.get(index).ok_or_else(|| {
        HarnessError::structural(
            ".productinfo",
            format!("no product at index {index} of {}", products.len()),
        )
    })?;
    let nth = i64::try_from(index)
        .map_err(|e| HarnessError::structural(".overlay-content .btn", e.to_string()))?;

    step(&format!("add product {index} to cart"), async {
        let notification = product_added_notification(page);
        expect(&notification).to_be_hidden().await?;

        let name = product.get_by_role(Role::Paragraph).text_content().await?;
        let price = product.get_by_role(Role::Heading).text_content().await?;
        debug!(name = name.trim(), price = price.trim(), "captured product");

        product.get_by_role(Role::Img).hover().await?;
        page.locator(".overlay-content .btn").nth(nth).click().await?;
        expect(&notification).to_be_visible().await?;

        if continue_shopping {
            page.get_by_role_named(Role::Button, "Continue Shopping")
                .click()
                .await?;
        } else {
            page.get_by_role_named(Role::Link, "View Cart").click().await?;
        }

        Ok(CartItem::new(CartPosition::from_index(index), name, price))
    })
    .await
}

/// Check each item's row in the cart table: its name, its price in both
/// the unit and total columns, and a quantity of exactly `1`.
///
/// # Errors
///
/// Fails at the first row that does not match.
pub async fn verify_cart_items<D: Driver>(page: &Page<D>, items: &[CartItem]) -> Result<()> {
    step("verify cart items", async {
        for item in items {
            let row_index = i64::try_from(item.position.row_index())
                .map_err(|e| HarnessError::structural("cart row", e.to_string()))?;
            let row = page.get_by_role(Role::Row).nth(row_index);
            expect(&row.get_by_role_named(Role::Cell, item.name.as_str()))
                .to_be_visible()
                .await?;
            expect(&row.get_by_role_named(Role::Cell, item.price.as_str()))
                .to_have_count(2)
                .await?;
            expect(&row.get_by_role_named(Role::Cell, TextMatch::exact("1")))
                .to_be_visible()
                .await?;
        }
        Ok(())
    })
    .await
}

/// A child that must be visible inside each element passed to
/// [`verify_all_elements_visible`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSelector {
    pub role: Role,
    pub has_text: Option<TextMatch>,
}

impl ChildSelector {
    #[must_use]
    pub const fn role(role: Role) -> Self {
        Self {
            role,
            has_text: None,
        }
    }

    #[must_use]
    pub fn with_text(role: Role, text: impl Into<TextMatch>) -> Self {
        Self {
            role,
            has_text: Some(text.into()),
        }
    }

    fn within<'p, D: Driver>(&self, element: &Locator<'p, D>) -> Locator<'p, D> {
        let children = element.get_by_role(self.role);
        match &self.has_text {
            Some(text) => children.filter_has_text(text.clone()),
            None => children,
        }
    }
}

/// Assert every element, and every child selector inside every element, is
/// visible.
///
/// All checks run concurrently and all of them settle before the first
/// failure is returned.
///
/// # Errors
///
/// The first failing check, in element order.
pub async fn verify_all_elements_visible<D: Driver>(
    elements: &[Locator<'_, D>],
    children: &[ChildSelector],
) -> Result<()> {
    let targets: Vec<Locator<'_, D>> = elements
        .iter()
        .flat_map(|element| {
            std::iter::once(element.clone())
                .chain(children.iter().map(|child| child.within(element)))
        })
        .collect();

    let outcomes = join_all(
        targets
            .iter()
            .map(|target| async move { expect(target).to_be_visible().await }),
    )
    .await;

    let failures = outcomes.iter().filter(|outcome| outcome.is_err()).count();
    debug!(checks = outcomes.len(), failures, "visibility checks settled");
    outcomes.into_iter().collect::<Result<Vec<()>>>().map(|_| ())
}
