//! Port for the external identity provider.
//!
//! The provider owns user records entirely; this service only verifies
//! submitted credentials and reads back the provider-issued id and email.

use async_trait::async_trait;

use crate::domain::{LoginCredentials, UserEmail, UserId, VerifiedUser};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum LoginServiceError {
        /// The provider rejected the credentials.
        InvalidCredentials { message: String } =>
            "identity provider rejected credentials: {message}",
        /// The provider could not be reached or timed out.
        Transport { message: String } =>
            "identity provider unreachable: {message}",
        /// The provider answered with an unusable payload.
        Decode { message: String } =>
            "identity provider response invalid: {message}",
    }
}

/// Port for credential verification against the identity provider.
///
/// Implementations must fail closed: any ambiguity (timeout, malformed
/// response) is an error, never a silently established identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the provider-issued identity.
    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<VerifiedUser, LoginServiceError>;
}

/// Fixture provider accepting a single well-known account.
///
/// Accepts `ada@example.com` / `password` and maps it to the stable id
/// `user_fixture_ada`. Everything else is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

/// Email accepted by [`FixtureLoginService`].
pub const FIXTURE_EMAIL: &str = "ada@example.com";
/// Password accepted by [`FixtureLoginService`].
pub const FIXTURE_PASSWORD: &str = "password";
/// User id issued by [`FixtureLoginService`].
pub const FIXTURE_USER_ID: &str = "user_fixture_ada";

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<VerifiedUser, LoginServiceError> {
        if credentials.email().as_ref() == FIXTURE_EMAIL
            && credentials.password() == FIXTURE_PASSWORD
        {
            let user_id = UserId::new(FIXTURE_USER_ID)
                .map_err(|err| LoginServiceError::decode(err.to_string()))?;
            let email = UserEmail::new(FIXTURE_EMAIL)
                .map_err(|err| LoginServiceError::decode(err.to_string()))?;
            Ok(VerifiedUser { user_id, email })
        } else {
            Err(LoginServiceError::invalid_credentials(
                "unknown email or wrong password",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_accepts_the_well_known_account() {
        let service = FixtureLoginService;
        let credentials = LoginCredentials::try_from_parts(FIXTURE_EMAIL, FIXTURE_PASSWORD)
            .expect("valid creds");
        let verified = service
            .verify(&credentials)
            .await
            .expect("verification succeeds");
        assert_eq!(verified.user_id.as_ref(), FIXTURE_USER_ID);
        assert_eq!(verified.email.as_ref(), FIXTURE_EMAIL);
    }

    #[rstest]
    #[case(FIXTURE_EMAIL, "wrong")]
    #[case("mallory@example.com", FIXTURE_PASSWORD)]
    #[tokio::test]
    async fn fixture_rejects_everything_else(#[case] email: &str, #[case] password: &str) {
        let service = FixtureLoginService;
        let credentials =
            LoginCredentials::try_from_parts(email, password).expect("valid shape");
        let err = service
            .verify(&credentials)
            .await
            .expect_err("verification fails");
        assert!(matches!(err, LoginServiceError::InvalidCredentials { .. }));
    }
}
