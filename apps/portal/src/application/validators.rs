use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// True when the value has at least one non-whitespace character.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Case-insensitive substring match used by the list filters.
pub fn matches_term(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}
