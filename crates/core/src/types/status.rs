//! Account flow states.

use serde::{Deserialize, Serialize};

/// Where a browser session stands in the signup/login flow.
///
/// The happy path is linear:
///
/// `AnonymousOnSignupPage -> SignupFormFilled -> AccountDetailsFilled ->
/// AddressFilled -> AccountCreated -> LoggedIn -> Deleted`
///
/// A logged-in session can also log out back to the signup page, and a
/// successful login moves an anonymous session straight to `LoggedIn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    AnonymousOnSignupPage,
    SignupFormFilled,
    AccountDetailsFilled,
    AddressFilled,
    AccountCreated,
    LoggedIn,
    Deleted,
}

impl FlowState {
    /// Whether the flow may move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::AnonymousOnSignupPage, Self::SignupFormFilled | Self::LoggedIn)
                | (Self::SignupFormFilled, Self::AccountDetailsFilled)
                | (Self::AccountDetailsFilled, Self::AddressFilled)
                | (Self::AddressFilled, Self::AccountCreated)
                | (Self::AccountCreated, Self::LoggedIn)
                | (Self::LoggedIn, Self::Deleted | Self::AnonymousOnSignupPage)
        )
    }
}

impl core::fmt::Display for FlowState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::AnonymousOnSignupPage => "anonymous on signup page",
            Self::SignupFormFilled => "signup form filled",
            Self::AccountDetailsFilled => "account details filled",
            Self::AddressFilled => "address filled",
            Self::AccountCreated => "account created",
            Self::LoggedIn => "logged in",
            Self::Deleted => "deleted",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [FlowState; 7] = [
        FlowState::AnonymousOnSignupPage,
        FlowState::SignupFormFilled,
        FlowState::AccountDetailsFilled,
        FlowState::AddressFilled,
        FlowState::AccountCreated,
        FlowState::LoggedIn,
        FlowState::Deleted,
    ];

    #[test]
    fn test_registration_path_is_valid() {
        for pair in ALL.windows(2) {
            if let [from, to] = pair {
                assert!(from.can_transition_to(*to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!FlowState::AnonymousOnSignupPage.can_transition_to(FlowState::Deleted));
        assert!(!FlowState::AccountCreated.can_transition_to(FlowState::Deleted));
        assert!(!FlowState::SignupFormFilled.can_transition_to(FlowState::AccountCreated));
        assert!(!FlowState::Deleted.can_transition_to(FlowState::LoggedIn));
    }

    #[test]
    fn test_deleted_is_the_only_state_without_exit() {
        for state in ALL {
            let has_exit = ALL.iter().any(|next| state.can_transition_to(*next));
            assert_eq!(state == FlowState::Deleted, !has_exit, "{state}");
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&FlowState::LoggedIn).unwrap_or_default();
        assert_eq!(json, "\"logged_in\"");
    }
}
