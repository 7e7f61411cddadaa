//! Account field rules.

/// Minimum accepted password length at registration and password change.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Display name given to the account created by the admin bootstrap.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "Admin";

/// Canonical form of an email address: trimmed and lower-cased.
///
/// Both lookups and inserts go through this so `Foo@Example.com` and
/// `foo@example.com` are the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether `email` is the designated administrator address.
pub fn is_designated_admin(email: &str, admin_email: Option<&str>) -> bool {
    match admin_email {
        Some(admin) => normalize_email(email) == normalize_email(admin),
        None => false,
    }
}
