//! Field-level checks applied before an application enters the store.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{RevError, RevResult};
use crate::types::Application;

// `local@domain`, optionally wrapped as `Display Name <local@domain>`.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:[^<>]*<\s*)?[^\s@<>"]+@[^\s@<>".]+(?:\.[^\s@<>".]+)*(?:\s*>)?$"#)
        .expect("email pattern is valid")
});

/// Whether `email` parses as a mail address.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let bracketed = email.contains('<');
    if bracketed != email.ends_with('>') {
        return false;
    }
    EMAIL.is_match(email)
}

/// Validate an application's client-supplied fields.
pub fn validate_application(app: &Application) -> RevResult<()> {
    if app.title.is_empty() {
        return Err(RevError::missing_field("application title cannot be empty"));
    }
    if app.version.is_empty() {
        return Err(RevError::missing_field(format!(
            "application {}'s version cannot be empty",
            app.title
        )));
    }
    if let Some(bad) = app.maintainers.iter().find(|m| !is_valid_email(&m.email)) {
        return Err(RevError::invalid_format(format!(
            "application {}'s maintainer {} has wrong email {:?}",
            app.title, bad.name, bad.email
        )));
    }
    Ok(())
}
