//! Randomized shopper profiles.
//!
//! Values are random; the shape is fixed. Every profile gets an email that
//! is unique for the life of the process: the local part is prefixed with a
//! millisecond timestamp that never repeats, so parallel tests sharing the
//! remote site never collide on an account.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use secrecy::SecretString;

use crate::types::{DateOfBirth, Email, PaymentCard, Sex, UserProfile};

const MALE_FIRST_NAMES: &[&str] = &[
    "James", "Robert", "John", "Michael", "David", "William", "Richard", "Joseph", "Thomas",
    "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Andrew", "Joshua", "Kevin",
    "Brian", "George", "Edward", "Ronald", "Timothy", "Jason", "Ryan",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica", "Sarah",
    "Karen", "Lisa", "Nancy", "Betty", "Sandra", "Margaret", "Ashley", "Kimberly", "Emily",
    "Donna", "Michelle", "Carol", "Amanda", "Melissa", "Deborah", "Laura",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Taylor", "Moore", "Jackson",
    "Martin", "Lee", "Thompson", "White", "Harris", "Clark", "Lewis", "Walker", "Hall", "Young",
    "King", "Wright", "Scott", "Green", "Baker", "Adams", "Nelson", "Carter", "Mitchell",
];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "and Sons", "Holdings", "Partners"];

const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Cedar", "Pine", "Elm", "Washington", "Lake", "Hill", "Park", "Sunset",
    "Ridge", "Meadow", "River", "Church", "Mill",
];

const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Road", "Lane", "Drive", "Court", "Way"];

const STATES: &[&str] = &[
    "Alabama", "Arizona", "California", "Colorado", "Florida", "Georgia", "Illinois", "Indiana",
    "Kentucky", "Maryland", "Michigan", "Minnesota", "Missouri", "Nevada", "Ohio", "Oregon",
    "Tennessee", "Texas", "Utah", "Virginia", "Washington", "Wisconsin",
];

const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Franklin", "Greenville", "Bristol", "Clinton", "Fairview",
    "Salem", "Madison", "Georgetown", "Arlington", "Ashland", "Dover", "Oxford", "Jackson",
];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "hotmail.com"];

const PASSWORD_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PASSWORD_LENGTH: usize = 15;

const MIN_AGE_DAYS: i64 = 18 * 365;
const MAX_AGE_DAYS: i64 = 80 * 365;

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Generate a fresh, internally consistent shopper profile.
///
/// ```
/// let a = automation_exercise_core::generate_user_profile();
/// let b = automation_exercise_core::generate_user_profile();
/// assert_ne!(a.email(), b.email());
/// ```
#[must_use]
pub fn generate_user_profile() -> UserProfile {
    let mut rng = rand::rng();

    let sex = if rng.random_bool(0.5) {
        Sex::Male
    } else {
        Sex::Female
    };
    let first_name = pick(
        &mut rng,
        match sex {
            Sex::Male => MALE_FIRST_NAMES,
            Sex::Female => FEMALE_FIRST_NAMES,
        },
    );
    let last_name = pick(&mut rng, LAST_NAMES);

    let email = unique_email(&mut rng, first_name, last_name);

    UserProfile {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        sex,
        password: SecretString::from(password(&mut rng)),
        date_of_birth: birth_date(&mut rng),
        company: format!(
            "{} {}",
            pick(&mut rng, LAST_NAMES),
            pick(&mut rng, COMPANY_SUFFIXES)
        ),
        address: format!(
            "{} {} {}",
            rng.random_range(100..10_000),
            pick(&mut rng, STREET_NAMES),
            pick(&mut rng, STREET_SUFFIXES)
        ),
        secondary_address: if rng.random_bool(0.5) {
            format!("Apt. {}", rng.random_range(100..1000))
        } else {
            format!("Suite {}", rng.random_range(100..1000))
        },
        state: pick(&mut rng, STATES).to_string(),
        city: pick(&mut rng, CITIES).to_string(),
        zip: format!("{:05}", rng.random_range(501..100_000)),
        mobile_phone: format!(
            "555-{:03}-{:04}",
            rng.random_range(200..1000),
            rng.random_range(0..10_000)
        ),
        email,
        card: PaymentCard {
            number: SecretString::from(card_number(&mut rng)),
            cvc: SecretString::from(format!("{:03}", rng.random_range(0..1000))),
        },
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, values: &[&'static str]) -> &'static str {
    values.choose(rng).copied().unwrap_or_default()
}

/// A millisecond timestamp strictly greater than any returned before.
fn unique_stamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

fn unique_email<R: Rng + ?Sized>(rng: &mut R, first_name: &str, last_name: &str) -> Email {
    let slug = |name: &str| -> String {
        name.chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase()
    };
    let (first, last) = (slug(first_name), slug(last_name));
    loop {
        let separator = [".", "_", ""].choose(rng).copied().unwrap_or(".");
        let domain = pick(rng, EMAIL_DOMAINS);
        let address = format!(
            "{}{first}{separator}{last}{}@{domain}",
            unique_stamp(),
            rng.random_range(1..100)
        );
        if let Ok(email) = Email::parse(&address) {
            return email;
        }
    }
}

fn password<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut chars: Vec<char> = (0..PASSWORD_LENGTH)
        .map(|_| {
            PASSWORD_ALPHABET
                .choose(rng)
                .map_or('x', |b| char::from(*b))
        })
        .collect();
    // Guarantee one letter and one digit whatever the draw.
    if let Some(first) = chars.first_mut() {
        *first = char::from(b'a' + rng.random_range(0..26));
    }
    if let Some(last) = chars.last_mut() {
        *last = char::from(b'0' + rng.random_range(0..10));
    }
    chars.into_iter().collect()
}

fn birth_date<R: Rng + ?Sized>(rng: &mut R) -> DateOfBirth {
    let today = Utc::now().date_naive();
    let age = Duration::days(rng.random_range(MIN_AGE_DAYS..=MAX_AGE_DAYS));
    DateOfBirth::new(today - age)
}

/// A 16 digit number that passes the Luhn check.
fn card_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut digits: Vec<u32> = vec![4];
    digits.extend((0..14).map(|_| rng.random_range(0..10)));
    digits.push(luhn_check_digit(&digits));
    digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}

fn luhn_check_digit(payload: &[u32]) -> u32 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    (10 - sum % 10) % 10
}
