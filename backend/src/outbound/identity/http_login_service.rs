//! Reqwest-backed identity provider adapter.
//!
//! Owns transport details only: request serialisation, timeout and HTTP
//! error mapping, and JSON decoding into the provider-issued identity. Every
//! ambiguous outcome is an error; a session is only ever established from a
//! well-formed 200 response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{LoginService, LoginServiceError};
use crate::domain::{LoginCredentials, UserEmail, UserId, VerifiedUser};

/// Identity provider adapter performing HTTP POST verification requests.
pub struct HttpLoginService {
    client: Client,
    endpoint: Url,
}

impl HttpLoginService {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponseDto {
    user_id: String,
    email: String,
}

fn map_transport_error(error: reqwest::Error) -> LoginServiceError {
    LoginServiceError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LoginServiceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LoginServiceError::invalid_credentials(message)
        }
        _ => LoginServiceError::transport(message),
    }
}

fn parse_identity(body: &[u8]) -> Result<VerifiedUser, LoginServiceError> {
    let decoded: VerifyResponseDto = serde_json::from_slice(body).map_err(|error| {
        LoginServiceError::decode(format!("invalid verification payload: {error}"))
    })?;
    let user_id = UserId::new(decoded.user_id)
        .map_err(|error| LoginServiceError::decode(format!("invalid user id: {error}")))?;
    let email = UserEmail::new(decoded.email)
        .map_err(|error| LoginServiceError::decode(format!("invalid email: {error}")))?;
    Ok(VerifiedUser { user_id, email })
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl LoginService for HttpLoginService {
    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<VerifiedUser, LoginServiceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&VerifyRequestDto {
                email: credentials.email().as_ref(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_identity(body.as_ref())
    }
}
