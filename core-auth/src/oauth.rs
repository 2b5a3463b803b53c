//! OAuth 2.0 Refresh Token Exchange
//!
//! Implements the `refresh_token` grant of RFC 6749 §6 against the provider's
//! token endpoint.
//!
//! # Overview
//!
//! The exchange sends a form-encoded POST carrying the refresh token and the
//! app's client id and secret, and returns the new access token. Errors
//! reported by the endpoint are surfaced with the most descriptive message the
//! response offers: `error_description`, then `error`, then the raw body.
//!
//! The request is issued with [`RetryPolicy::none`]. A failed exchange is
//! reported to the caller once; retrying is the caller's decision.
//!
//! # Security
//!
//! Never logs the refresh token, the client secret or the returned access
//! token.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::{RefreshCredentials, RefreshTokenExchange};
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let exchange = RefreshTokenExchange::new(
//!     RefreshCredentials::new("refresh-token", "app-key", "app-secret"),
//!     "https://api.dropbox.com/oauth2/token",
//!     http_client,
//! );
//!
//! let token = exchange.exchange().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AccessToken, RefreshCredentials};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Performs the refresh-token grant.
pub struct RefreshTokenExchange {
    credentials: RefreshCredentials,
    token_url: String,
    http_client: Arc<dyn HttpClient>,
}

impl RefreshTokenExchange {
    pub fn new(
        credentials: RefreshCredentials,
        token_url: impl Into<String>,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            http_client,
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchange the refresh token for a fresh access token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenRefreshFailed`] when the endpoint answers non-2xx
    /// - [`AuthError::MissingAccessToken`] when a 2xx body has no `access_token`
    /// - [`AuthError::NetworkError`] when the endpoint cannot be reached
    #[instrument(skip(self), fields(token_url = %self.token_url))]
    pub async fn exchange(&self) -> Result<AccessToken> {
        let form = RefreshForm {
            grant_type: "refresh_token",
            refresh_token: &self.credentials.refresh_token,
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
        };

        let request = HttpRequest::new(HttpMethod::Post, self.token_url.clone())
            .form(&form)
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        debug!("Requesting access token");

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::none())
            .await
            .map_err(|e| {
                warn!(error = %e, "Token endpoint unreachable");
                AuthError::NetworkError(e.to_string())
            })?;

        if !response.is_success() {
            let reason = failure_reason(&response);
            warn!(status = response.status, reason = %reason, "Token refresh rejected");
            return Err(AuthError::TokenRefreshFailed(reason));
        }

        let body: TokenResponse = response.json().map_err(|e| {
            warn!(error = %e, "Token response is not valid JSON");
            AuthError::MissingAccessToken
        })?;

        match body.access_token {
            Some(token) if !token.is_empty() => {
                debug!(
                    expires_in = ?body.expires_in,
                    token_type = ?body.token_type,
                    "Access token obtained"
                );
                Ok(AccessToken::new(token, body.expires_in))
            }
            _ => Err(AuthError::MissingAccessToken),
        }
    }
}

#[derive(Serialize)]
struct RefreshForm<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Success and error bodies of the token endpoint share one shape.
#[derive(Debug, Deserialize, Default)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

fn failure_reason(response: &HttpResponse) -> String {
    let raw = response.text().unwrap_or_default();

    if let Ok(body) = serde_json::from_str::<TokenResponse>(&raw) {
        if let Some(description) = body.error_description.filter(|d| !d.is_empty()) {
            return description;
        }
        if let Some(error) = body.error.filter(|e| !e.is_empty()) {
            return error;
        }
    }

    let raw = raw.trim();
    if raw.is_empty() {
        format!("token endpoint returned HTTP {}", response.status)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn exchange_with(mock: MockHttpClient) -> RefreshTokenExchange {
        RefreshTokenExchange::new(
            RefreshCredentials::new("refresh-1", "app key", "app-secret"),
            "https://auth.example.com/oauth2/token",
            Arc::new(mock),
        )
    }

    #[tokio::test]
    async fn test_exchange_posts_refresh_grant() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|request| {
                let body = request
                    .body
                    .as_ref()
                    .map(|b| String::from_utf8_lossy(b).to_string())
                    .unwrap_or_default();
                request.method == HttpMethod::Post
                    && request.url == "https://auth.example.com/oauth2/token"
                    && request.headers.get("Content-Type").map(String::as_str)
                        == Some("application/x-www-form-urlencoded")
                    && body == "grant_type=refresh_token&refresh_token=refresh-1&client_id=app+key&client_secret=app-secret"
            })
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    r#"{"access_token":"sl.fresh","token_type":"bearer","expires_in":14400}"#,
                ))
            });

        let token = exchange_with(mock).exchange().await.unwrap();
        assert_eq!(token.as_str(), "sl.fresh");
        assert_eq!(token.expires_in(), Some(14400));
    }

    #[tokio::test]
    async fn test_exchange_reports_error_description() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(response(
                400,
                r#"{"error":"invalid_grant","error_description":"refresh token is malformed"}"#,
            ))
        });

        let err = exchange_with(mock).exchange().await.unwrap_err();
        assert_eq!(
            err,
            AuthError::TokenRefreshFailed("refresh token is malformed".to_string())
        );
    }

    #[tokio::test]
    async fn test_exchange_falls_back_to_error_code() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(400, r#"{"error":"invalid_client"}"#)));

        let err = exchange_with(mock).exchange().await.unwrap_err();
        assert_eq!(err, AuthError::TokenRefreshFailed("invalid_client".to_string()));
    }

    #[tokio::test]
    async fn test_exchange_falls_back_to_raw_body() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(503, "upstream unavailable\n")));

        let err = exchange_with(mock).exchange().await.unwrap_err();
        assert_eq!(
            err,
            AuthError::TokenRefreshFailed("upstream unavailable".to_string())
        );
    }

    #[tokio::test]
    async fn test_exchange_without_access_token() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, r#"{"token_type":"bearer"}"#)));

        let err = exchange_with(mock).exchange().await.unwrap_err();
        assert_eq!(err, AuthError::MissingAccessToken);
    }

    #[tokio::test]
    async fn test_exchange_transport_failure() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute().times(1).returning(|_| {
            Err(BridgeError::OperationFailed(
                "Connection failed: refused".to_string(),
            ))
        });

        let err = exchange_with(mock).exchange().await.unwrap_err();
        assert!(matches!(err, AuthError::NetworkError(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_token_response_deserialization_minimal() {
        let response: TokenResponse = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        assert_eq!(response.access_token.as_deref(), Some("t"));
        assert_eq!(response.expires_in, None);
        assert_eq!(response.token_type, None);
    }
}
