//! Synthetic shopper profiles.

use chrono::{Datelike, Month, NaiveDate};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::credential::Credentials;
use super::email::Email;

/// Sex of the generated person; decides the honorific radio button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Label of the title radio button on the account form.
    #[must_use]
    pub const fn honorific(self) -> &'static str {
        match self {
            Self::Male => "Mr.",
            Self::Female => "Mrs.",
        }
    }
}

/// Date of birth, exposed the way the account form's three selects expect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Day of month without a leading zero (`"7"`).
    #[must_use]
    pub fn day(self) -> String {
        self.0.day().to_string()
    }

    /// English month name (`"July"`).
    #[must_use]
    pub fn month(self) -> String {
        u8::try_from(self.0.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or_else(String::new, |m| m.name().to_string())
    }

    /// Four digit year (`"1987"`).
    #[must_use]
    pub fn year(self) -> String {
        self.0.year().to_string()
    }
}

/// Card details for the payment form.
///
/// Implements `Debug` manually to redact both fields.
#[derive(Clone)]
pub struct PaymentCard {
    pub(crate) number: SecretString,
    pub(crate) cvc: SecretString,
}

impl PaymentCard {
    #[must_use]
    pub fn number(&self) -> &str {
        self.number.expose_secret()
    }

    #[must_use]
    pub fn cvc(&self) -> &str {
        self.cvc.expose_secret()
    }
}

impl std::fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentCard")
            .field("number", &"[REDACTED]")
            .field("cvc", &"[REDACTED]")
            .finish()
    }
}

/// A fully populated shopper, fresh for every test.
///
/// Built by [`crate::generate_user_profile`]; immutable afterwards.
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct UserProfile {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) sex: Sex,
    pub(crate) password: SecretString,
    pub(crate) date_of_birth: DateOfBirth,
    pub(crate) company: String,
    pub(crate) address: String,
    pub(crate) secondary_address: String,
    pub(crate) state: String,
    pub(crate) city: String,
    pub(crate) zip: String,
    pub(crate) mobile_phone: String,
    pub(crate) email: Email,
    pub(crate) card: PaymentCard,
}

impl UserProfile {
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// `"{first} {last}"`, as typed into the signup name field.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    /// `Mr.` or `Mrs.`, derived from [`Self::sex`].
    #[must_use]
    pub const fn honorific(&self) -> &'static str {
        self.sex.honorific()
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    #[must_use]
    pub const fn date_of_birth(&self) -> DateOfBirth {
        self.date_of_birth
    }

    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn secondary_address(&self) -> &str {
        &self.secondary_address
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn zip(&self) -> &str {
        &self.zip
    }

    #[must_use]
    pub fn mobile_phone(&self) -> &str {
        &self.mobile_phone
    }

    /// Unique, timestamp-prefixed address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub const fn card(&self) -> &PaymentCard {
        &self.card
    }

    /// Credentials for the login form.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.as_str(), self.password.expose_secret())
    }

    /// Lines the checkout page prints in both the delivery and the billing
    /// address blocks.
    #[must_use]
    pub fn address_lines(&self) -> Vec<String> {
        vec![
            format!("{} {}", self.honorific(), self.full_name()),
            self.company.clone(),
            self.address.clone(),
            self.secondary_address.clone(),
            format!("{} {} {}", self.city, self.state, self.zip),
            self.mobile_phone.clone(),
        ]
    }
}

impl std::fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserProfile")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("sex", &self.sex)
            .field("password", &"[REDACTED]")
            .field("date_of_birth", &self.date_of_birth)
            .field("company", &self.company)
            .field("address", &self.address)
            .field("secondary_address", &self.secondary_address)
            .field("state", &self.state)
            .field("city", &self.city)
            .field("zip", &self.zip)
            .field("mobile_phone", &self.mobile_phone)
            .field("email", &self.email)
            .field("card", &self.card)
            .finish()
    }
}
