//! User identity primitives.
//!
//! Users are owned and issued by the external identity provider; this
//! service never creates or mutates them. The types here validate the
//! provider-issued values at the boundary so the rest of the crate can rely
//! on their invariants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum accepted length for a provider-issued user identifier.
pub const USER_ID_MAX: usize = 64;

/// Validation errors for identity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    IdTooLong { max: usize },
    IdInvalidCharacters,
    InvalidEmail,
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::IdTooLong { max } => write!(f, "user id must be at most {max} characters"),
            Self::IdInvalidCharacters => write!(
                f,
                "user id may only contain letters, numbers, hyphens, or underscores",
            ),
            Self::InvalidEmail => write!(f, "email must be a plausible address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier issued by the identity provider.
///
/// Provider tokens such as `user_2f8a91c3` are accepted verbatim; the only
/// invariants enforced are non-emptiness, a length bound, and a restricted
/// character set so the value is safe to embed in session cookies and query
/// filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use outlay::domain::UserId;
    ///
    /// let id = UserId::new("user_2f8a91c3").expect("valid id");
    /// assert_eq!(id.as_ref(), "user_2f8a91c3");
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UserValidationError::IdInvalidCharacters);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address reported by the identity provider.
///
/// Deliberately loose validation: the provider has already verified the
/// address, so this only rejects values that are clearly not addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserEmail(String);

impl UserEmail {
    /// Validate and construct a [`UserEmail`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed_matches = email.trim() == email;
        if email.is_empty() || !trimmed_matches || !email.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserEmail> for String {
    fn from(value: UserEmail) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserEmail {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Credentials submitted to the login endpoint.
///
/// The password is held only for the duration of the verification call and
/// is never logged or persisted.
#[derive(Clone)]
pub struct LoginCredentials {
    email: UserEmail,
    password: String,
}

impl LoginCredentials {
    /// Validate and construct credentials from raw request input.
    pub fn try_from_parts(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let email = UserEmail::new(email)?;
        let password = password.into();
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self { email, password })
    }

    /// Email half of the credentials.
    pub fn email(&self) -> &UserEmail {
        &self.email
    }

    /// Password half of the credentials.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep the password out of debug output and logs.
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity established by the identity provider after verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    /// Provider-issued stable identifier.
    pub user_id: UserId,
    /// Provider-verified email address.
    pub email: UserEmail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user_2f8a91c3")]
    #[case("a")]
    #[case("AB-12_cd")]
    fn accepts_provider_shaped_ids(#[case] raw: &str) {
        let id = UserId::new(raw).expect("valid id");
        assert_eq!(id.as_ref(), raw);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("user id", UserValidationError::IdInvalidCharacters)]
    #[case("user@id", UserValidationError::IdInvalidCharacters)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn rejects_overlong_ids() {
        let raw = "x".repeat(USER_ID_MAX + 1);
        assert_eq!(
            UserId::new(raw).expect_err("must fail"),
            UserValidationError::IdTooLong { max: USER_ID_MAX }
        );
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("not-an-address", false)]
    #[case(" ada@example.com", false)]
    #[case("", false)]
    fn email_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(UserEmail::new(raw).is_ok(), ok);
    }

    #[test]
    fn credentials_require_password() {
        let err = LoginCredentials::try_from_parts("ada@example.com", "").expect_err("must fail");
        assert_eq!(err, UserValidationError::EmptyPassword);
    }

    #[test]
    fn credentials_redact_password_in_debug() {
        let creds =
            LoginCredentials::try_from_parts("ada@example.com", "hunter2").expect("valid creds");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn user_id_round_trips_through_serde() {
        let id = UserId::new("user_2f8a91c3").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialises");
        let back: UserId = serde_json::from_str(&json).expect("deserialises");
        assert_eq!(back, id);
    }
}
