//! Signup, login and account deletion.
//!
//! The flow is modelled as typestates. Each struct stands for one point in
//! the signup/login journey and only offers the transitions the site
//! allows from there, so deleting an account is only possible once a
//! `LoggedIn` value exists:
//!
//! ```text
//! SignupPage ── submit_signup ──▶ SignupSubmitted
//!                                   ├─ expect_account_information ──▶ SignupFormFilled
//!                                   └─ expect_email_taken ──▶ SignupPage
//!
//! SignupFormFilled ──▶ AccountDetailsFilled ──▶ AddressFilled ──▶ AccountCreated ──▶ LoggedIn
//!
//! SignupPage ── login ──▶ LoginAttempt ─┬─ expect_logged_in ──▶ LoggedIn
//!                                       └─ expect_rejected ──▶ SignupPage
//!
//! LoggedIn ─┬─ delete_account ──▶ Deleted
//!           └─ logout ──▶ SignupPage
//! ```

use automation_exercise_core::{Credentials, FlowState, UserProfile};
use tracing::{debug, instrument};

use crate::driver::{Driver, Role, TextMatch};
use crate::error::Result;
use crate::expect::expect;
use crate::helpers::navigation::{navigate_to_home, navigate_to_page};
use crate::page::Page;
use crate::step::step;

pub const SIGNUP_LINK: &str = "Signup / Login";
pub const SIGNUP_HEADING: &str = "New User Signup!";
pub const ACCOUNT_INFORMATION: &str = "Enter Account Information";
pub const ACCOUNT_CREATED: &str = "Account Created!";
pub const ACCOUNT_DELETED: &str = "Account Deleted!";
pub const EMAIL_TAKEN: &str = "Email Address already exist!";
pub const LOGIN_REJECTED: &str = "Your email or password is incorrect!";
const NEWSLETTER: &str = "Sign up for our newsletter";

fn transition(from: FlowState, to: FlowState) {
    debug_assert!(from.can_transition_to(to), "{from} -> {to}");
    debug!(%from, %to, "flow transition");
}

/// Anonymous visitor on the signup/login page.
#[derive(Debug)]
pub struct SignupPage<'p, D> {
    page: &'p Page<D>,
}

impl<'p, D: Driver> SignupPage<'p, D> {
    pub const STATE: FlowState = FlowState::AnonymousOnSignupPage;

    /// Go home, then follow the "Signup / Login" link.
    ///
    /// # Errors
    ///
    /// Fails if either page does not load as expected.
    pub async fn open(page: &'p Page<D>) -> Result<Self> {
        navigate_to_home(page).await?;
        navigate_to_page(page, SIGNUP_LINK, SIGNUP_HEADING).await?;
        Ok(Self { page })
    }

    /// Use a page the caller already brought to the signup form.
    pub const fn assume(page: &'p Page<D>) -> Self {
        Self { page }
    }

    pub const fn page(&self) -> &'p Page<D> {
        self.page
    }

    /// Fill name and email into the "New User Signup!" form and submit.
    ///
    /// # Errors
    ///
    /// Fails if a field or the button cannot be used.
    #[instrument(skip_all, fields(email = %profile.email()))]
    pub async fn submit_signup(self, profile: &UserProfile) -> Result<SignupSubmitted<'p, D>> {
        let page = self.page;
        step("fill signup form", async {
            page.get_by_placeholder("Name")
                .fill(&profile.full_name())
                .await?;
            page.get_by_test_id("signup-email")
                .fill(profile.email().as_str())
                .await?;
            page.get_by_role_named(Role::Button, "Signup").click().await
        })
        .await?;
        Ok(SignupSubmitted { page })
    }

    /// Fill the login form and submit. The outcome is left to the caller.
    ///
    /// # Errors
    ///
    /// Fails if a field or the button cannot be used.
    #[instrument(skip_all, fields(email = %credentials.email()))]
    pub async fn login(self, credentials: &Credentials) -> Result<LoginAttempt<'p, D>> {
        let page = self.page;
        step("log in", async {
            page.get_by_test_id("login-email")
                .fill(credentials.email())
                .await?;
            page.get_by_placeholder("Password")
                .fill(credentials.password())
                .await?;
            page.get_by_role_named(Role::Button, "Login").click().await
        })
        .await?;
        Ok(LoginAttempt { page })
    }
}

/// Signup submitted; the site either asks for account details or rejects
/// the email.
#[derive(Debug)]
pub struct SignupSubmitted<'p, D> {
    page: &'p Page<D>,
}

impl<'p, D: Driver> SignupSubmitted<'p, D> {
    /// # Errors
    ///
    /// `Expectation` if the account information form never appears.
    pub async fn expect_account_information(self) -> Result<SignupFormFilled<'p, D>> {
        expect(&self.page.get_by_text(ACCOUNT_INFORMATION))
            .to_be_visible()
            .await?;
        transition(SignupPage::<D>::STATE, SignupFormFilled::<D>::STATE);
        Ok(SignupFormFilled { page: self.page })
    }

    /// The email belongs to an existing account.
    ///
    /// # Errors
    ///
    /// `Expectation` if the duplicate-email message never appears.
    pub async fn expect_email_taken(self) -> Result<SignupPage<'p, D>> {
        expect(&self.page.get_by_text(TextMatch::regex_i(EMAIL_TAKEN)))
            .to_be_visible()
            .await?;
        Ok(SignupPage { page: self.page })
    }
}

/// On the "Enter Account Information" form.
#[derive(Debug)]
pub struct SignupFormFilled<'p, D> {
    page: &'p Page<D>,
}

impl<'p, D: Driver> SignupFormFilled<'p, D> {
    pub const STATE: FlowState = FlowState::SignupFormFilled;

    /// Title, password, date of birth and both opt-in boxes.
    ///
    /// # Errors
    ///
    /// Fails if a control cannot be used.
    pub async fn fill_account_details(
        self,
        profile: &UserProfile,
    ) -> Result<AccountDetailsFilled<'p, D>> {
        let page = self.page;
        let dob = profile.date_of_birth();
        step("fill account details", async {
            page.get_by_role_named(Role::Radio, TextMatch::exact(profile.honorific()))
                .check()
                .await?;
            page.get_by_role_named(Role::Textbox, "Password")
                .fill(profile.password())
                .await?;
            page.get_by_test_id("days")
                .select_option(&dob.day())
                .await?;
            page.get_by_test_id("months")
                .select_option(&dob.month())
                .await?;
            page.get_by_test_id("years")
                .select_option(&dob.year())
                .await?;
            page.get_by_role_named(Role::Checkbox, TextMatch::regex_i(NEWSLETTER))
                .check()
                .await?;
            page.get_by_label(TextMatch::regex_i("Receive special offers"))
                .check()
                .await
        })
        .await?;
        transition(Self::STATE, AccountDetailsFilled::<D>::STATE);
        Ok(AccountDetailsFilled { page })
    }
}

#[derive(Debug)]
pub struct AccountDetailsFilled<'p, D> {
    page: &'p Page<D>,
}

impl<'p, D: Driver> AccountDetailsFilled<'p, D> {
    pub const STATE: FlowState = FlowState::AccountDetailsFilled;

    /// # Errors
    ///
    /// Fails if a field cannot be filled.
    pub async fn fill_address_details(
        self,
        profile: &UserProfile,
    ) -> Result<AddressFilled<'p, D>> {
        let page = self.page;
        step("fill address details", async {
            page.get_by_label("First name")
                .fill(profile.first_name())
                .await?;
            page.get_by_label("Last name")
                .fill(profile.last_name())
                .await?;
            page.get_by_label(TextMatch::exact("Company"))
                .fill(profile.company())
                .await?;
            page.get_by_test_id("address")
                .fill(profile.address())
                .await?;
            page.get_by_test_id("address2")
                .fill(profile.secondary_address())
                .await?;
            page.get_by_label("State").fill(profile.state()).await?;
            page.get_by_label("City").fill(profile.city()).await?;
            page.get_by_test_id("zipcode").fill(profile.zip()).await?;
            page.get_by_label("Mobile Number")
                .fill(profile.mobile_phone())
                .await
        })
        .await?;
        transition(Self::STATE, AddressFilled::<D>::STATE);
        Ok(AddressFilled { page })
    }
}

#[derive(Debug)]
pub struct AddressFilled<'p, D> {
    page: &'p Page<D>,
}

impl<'p, D: Driver> AddressFilled<'p, D> {
    pub const STATE: FlowState = FlowState::AddressFilled;

    /// Submit the form and wait for "Account Created!".
    ///
    /// # Errors
    ///
    /// Fails if the button cannot be clicked or the banner never shows.
    pub async fn create_account(self) -> Result<AccountCreated<'p, D>> {
        let page = self.page;
        step("create account", async {
            page.get_by_role_named(Role::Button, "Create Account")
                .click()
                .await?;
            expect(&page.get_by_text(ACCOUNT_CREATED))
                .to_be_visible()
                .await
        })
        .await?;
        transition(Self::STATE, AccountCreated::<D>::STATE);
        Ok(AccountCreated { page })
    }
}

#[derive(Debug)]
pub struct AccountCreated<'p, D> {
    page: &'p Page<D>,
}

impl<'p, D: Driver> AccountCreated<'p, D> {
    pub const STATE: FlowState = FlowState::AccountCreated;

    /// # Errors
    ///
    /// Fails if "Logged in as" never shows the profile's name.
    pub async fn continue_to_logged_in(self, profile: &UserProfile) -> Result<LoggedIn<'p, D>> {
        let page = self.page;
        page.get_by_role_named(Role::Link, "Continue").click().await?;
        let logged_in = LoggedIn::verify(page, &profile.full_name()).await?;
        transition(Self::STATE, LoggedIn::<D>::STATE);
        Ok(logged_in)
    }
}

/// Login submitted; the site either shows the user or rejects the
/// credentials.
#[derive(Debug)]
pub struct LoginAttempt<'p, D> {
    page: &'p Page<D>,
}

impl<'p, D: Driver> LoginAttempt<'p, D> {
    /// # Errors
    ///
    /// `Expectation` if the header never shows `full_name`.
    pub async fn expect_logged_in(self, full_name: &str) -> Result<LoggedIn<'p, D>> {
        let logged_in = LoggedIn::verify(self.page, full_name).await?;
        transition(SignupPage::<D>::STATE, LoggedIn::<D>::STATE);
        Ok(logged_in)
    }

    /// # Errors
    ///
    /// `Expectation` if the rejection message never appears.
    pub async fn expect_rejected(self) -> Result<SignupPage<'p, D>> {
        expect(&self.page.get_by_text(LOGIN_REJECTED))
            .to_be_visible()
            .await?;
        Ok(SignupPage { page: self.page })
    }
}

/// A session for an existing account.
#[derive(Debug)]
pub struct LoggedIn<'p, D> {
    page: &'p Page<D>,
    full_name: String,
}

impl<'p, D: Driver> LoggedIn<'p, D> {
    pub const STATE: FlowState = FlowState::LoggedIn;

    async fn verify(page: &'p Page<D>, full_name: &str) -> Result<Self> {
        expect(&page.get_by_text(format!("Logged in as {full_name}")))
            .to_be_visible()
            .await?;
        Ok(Self {
            page,
            full_name: full_name.to_string(),
        })
    }

    /// Pick up a session the current page already shows.
    ///
    /// # Errors
    ///
    /// `Expectation` if the header never shows `full_name`.
    pub async fn resume(page: &'p Page<D>, full_name: &str) -> Result<Self> {
        Self::verify(page, full_name).await
    }

    pub const fn page(&self) -> &'p Page<D> {
        self.page
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Delete the account and dismiss the confirmation.
    ///
    /// # Errors
    ///
    /// Fails if the delete link or confirmation does not behave as expected.
    #[instrument(skip_all, fields(user = %self.full_name))]
    pub async fn delete_account(self) -> Result<Deleted<'p, D>> {
        let page = self.page;
        step("delete account", async {
            page.get_by_role_named(Role::Link, "Delete Account")
                .click()
                .await?;
            expect(&page.get_by_text(ACCOUNT_DELETED))
                .to_be_visible()
                .await?;
            page.get_by_role_named(Role::Link, "Continue").click().await
        })
        .await?;
        transition(Self::STATE, Deleted::<D>::STATE);
        Ok(Deleted { page })
    }

    /// # Errors
    ///
    /// Fails if the logout link is missing or the signup page never loads.
    pub async fn logout(self) -> Result<SignupPage<'p, D>> {
        let page = self.page;
        step("log out", async {
            page.get_by_role_named(Role::Link, "Logout").click().await?;
            expect(&page.get_by_role_named(Role::Heading, SIGNUP_HEADING))
                .to_be_visible()
                .await
        })
        .await?;
        transition(Self::STATE, SignupPage::<D>::STATE);
        Ok(SignupPage { page })
    }
}

/// The account no longer exists.
#[derive(Debug)]
pub struct Deleted<'p, D> {
    page: &'p Page<D>,
}

impl<'p, D: Driver> Deleted<'p, D> {
    pub const STATE: FlowState = FlowState::Deleted;

    pub const fn page(&self) -> &'p Page<D> {
        self.page
    }
}

/// Register `profile` from the signup page through to a logged-in session.
///
/// # Errors
///
/// Fails at the first transition whose checkpoint is not reached.
#[instrument(skip_all, fields(email = %profile.email()))]
pub async fn register_user<'p, D: Driver>(
    page: &'p Page<D>,
    profile: &UserProfile,
) -> Result<LoggedIn<'p, D>> {
    step("register user", async {
        SignupPage::assume(page)
            .submit_signup(profile)
            .await?
            .expect_account_information()
            .await?
            .fill_account_details(profile)
            .await?
            .fill_address_details(profile)
            .await?
            .create_account()
            .await?
            .continue_to_logged_in(profile)
            .await
    })
    .await
}

/// Submit the login form on the current page.
///
/// # Errors
///
/// Fails if the form cannot be filled or submitted.
pub async fn login_user<'p, D: Driver>(
    page: &'p Page<D>,
    credentials: &Credentials,
) -> Result<LoginAttempt<'p, D>> {
    SignupPage::assume(page).login(credentials).await
}

/// # Errors
///
/// Fails if deletion is not confirmed.
pub async fn delete_account<'p, D: Driver>(logged_in: LoggedIn<'p, D>) -> Result<Deleted<'p, D>> {
    logged_in.delete_account().await
}
