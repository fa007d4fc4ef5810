// Request body validation helpers
//
// Validation failures all map onto the VALIDATION_FAILED error code; the
// details string names the offending field.

use crate::services::ServiceError;

/// Accounts: name length bound
pub const MAX_NAME_LENGTH: usize = 255;
/// Accounts: minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 10;
/// Hard cap on the user listing page size
pub const MAX_USERS_LIMIT: u32 = 1000;

pub fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::validation("name must not be empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ServiceError::validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Shallow shape check; real address verification is the mail server's job
pub fn validate_email(email: &str) -> Result<(), ServiceError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ServiceError::validation("email must be a valid address"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err(ServiceError::validation("email must be a valid address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_users_limit(limit: u32) -> Result<(), ServiceError> {
    if limit > MAX_USERS_LIMIT {
        return Err(ServiceError::validation(format!(
            "limit must be at most {MAX_USERS_LIMIT}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert!(validate_name("Thomas").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
        assert!(validate_name(&"x".repeat(255)).is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("thomas@example.com").is_ok());
        assert!(validate_email("thomas").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("thomas@").is_err());
        assert!(validate_email("thomas@localhost").is_err());
        assert!(validate_email("tho mas@example.com").is_err());
    }

    #[test]
    fn password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("123456789").is_err());
        assert!(validate_password("1234567890").is_ok());
    }

    #[test]
    fn users_limit_cap() {
        assert!(validate_users_limit(1000).is_ok());
        assert!(validate_users_limit(1001).is_err());
    }
}
