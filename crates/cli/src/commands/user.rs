//! Print a generated shopper profile.
//!
//! Handy for signing up by hand with the same data shape the suite uses.

use automation_exercise_core::{UserProfile, generate_user_profile};
use serde_json::{Value, json};

const REDACTED: &str = "[REDACTED]";

/// JSON view of a profile. Password and card are redacted unless `reveal`.
#[must_use]
pub fn profile_json(profile: &UserProfile, reveal: bool) -> Value {
    let secret = |value: &str| {
        if reveal {
            value.to_owned()
        } else {
            REDACTED.to_owned()
        }
    };
    let credentials = profile.credentials();
    let date_of_birth = profile.date_of_birth();

    json!({
        "name": profile.full_name(),
        "title": profile.honorific(),
        "email": profile.email().as_str(),
        "password": secret(credentials.password()),
        "date_of_birth": {
            "day": date_of_birth.day(),
            "month": date_of_birth.month(),
            "year": date_of_birth.year(),
        },
        "company": profile.company(),
        "address": profile.address(),
        "address2": profile.secondary_address(),
        "state": profile.state(),
        "city": profile.city(),
        "zipcode": profile.zip(),
        "mobile_number": profile.mobile_phone(),
        "card": {
            "number": secret(profile.card().number()),
            "cvc": secret(profile.card().cvc()),
        },
    })
}

/// Generate a profile and print it to stdout.
///
/// # Errors
///
/// Returns an error if the JSON cannot be rendered.
#[allow(clippy::print_stdout)]
pub fn print_profile(reveal: bool) -> Result<(), serde_json::Error> {
    let profile = generate_user_profile();
    println!("{}", serde_json::to_string_pretty(&profile_json(&profile, reveal))?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_by_default() {
        let profile = generate_user_profile();
        let value = profile_json(&profile, false);
        assert_eq!(value["password"], REDACTED);
        assert_eq!(value["card"]["number"], REDACTED);
        assert_eq!(value["card"]["cvc"], REDACTED);
        assert_eq!(value["email"], profile.email().as_str());
    }

    #[test]
    fn test_reveal() {
        let profile = generate_user_profile();
        let value = profile_json(&profile, true);
        assert_eq!(value["password"], profile.password());
        assert_eq!(value["card"]["number"], profile.card().number());
    }
}
