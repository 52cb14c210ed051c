//! Login credentials.

use secrecy::{ExposeSecret, SecretString};

/// Email and password typed into the login form.
///
/// The email is kept as plain text rather than an [`crate::Email`] because
/// negative tests deliberately log in with addresses that never existed.
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    /// Create credentials from an email and password.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// The login email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The password, for typing into the form.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("fakeuser123@test.com", "wrong-password");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("fakeuser123@test.com"));
        assert!(!debug.contains("wrong-password"));
        assert_eq!(credentials.password(), "wrong-password");
    }
}
