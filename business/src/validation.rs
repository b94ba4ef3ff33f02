//! Client-side field validation for the sign-up form.

use std::sync::LazyLock;

use regex::Regex;

// RFC 2822 address shape, restricted to the label lengths the API accepts.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

pub fn email_valid(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Names must be 2 to 60 characters.
pub fn name_valid(name: &str) -> bool {
    let len = name.chars().count();
    len > 1 && len < 61
}

/// Ukrainian mobile numbers only: 13 characters carrying the +380 prefix.
pub fn phone_valid(phone: &str) -> bool {
    phone.chars().count() == 13 && phone.contains("+380")
}
