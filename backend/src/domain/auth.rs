//! Authentication primitives: login credentials, passwords and the caller
//! identity threaded through every service call.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::{Email, Role, UserId, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when login or password values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email missing or malformed.
    #[error("invalid email")]
    InvalidEmail,
    /// Password was blank.
    #[error("password is required")]
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Lower bound in characters.
        min: usize,
    },
}

impl From<UserValidationError> for LoginValidationError {
    fn from(_: UserValidationError) -> Self {
        Self::InvalidEmail
    }
}

/// Plain-text password held in memory that is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept a new password, enforcing the minimum length.
    pub fn new(raw: &str) -> Result<Self, LoginValidationError> {
        if raw.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if raw.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Wrap a password supplied for verification only; no length rule applies.
    pub fn for_verification(raw: &str) -> Result<Self, LoginValidationError> {
        if raw.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Borrow the secret.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Validated login credentials used by authentication services.
///
/// # Examples
/// ```
/// use votecerto::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ana@Example.com", "s3cret").unwrap();
/// assert_eq!(creds.email().as_str(), "ana@example.com");
/// assert_eq!(creds.password().expose(), "s3cret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email)?;
        let password = Password::for_verification(password)?;
        Ok(Self { email, password })
    }

    /// Email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Authenticated caller, resolved once per request and passed explicitly to
/// every command and query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Account identifier.
    pub user_id: UserId,
    /// Role captured at login.
    pub role: Role,
}

impl Identity {
    /// Build an identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidEmail)]
    #[case("nobody", "pw", LoginValidationError::InvalidEmail)]
    #[case("ana@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_password_keeps_whitespace() {
        let creds = LoginCredentials::try_from_parts("ana@example.com", " pw ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.password().expose(), " pw ");
    }

    #[rstest]
    #[case("12345", Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN }))]
    #[case("", Err(LoginValidationError::EmptyPassword))]
    fn new_password_enforces_minimum(
        #[case] raw: &str,
        #[case] expected: Result<(), LoginValidationError>,
    ) {
        assert_eq!(Password::new(raw).map(|_| ()), expected);
    }

    #[rstest]
    fn password_debug_is_redacted() {
        let password = Password::new("secret1").expect("valid password");
        assert_eq!(format!("{password:?}"), "Password(..)");
    }
}
