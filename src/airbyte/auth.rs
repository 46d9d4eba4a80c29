// ABOUTME: Bearer token resolution for the Airbyte API
// ABOUTME: Uses the static API key or performs a client-credentials token exchange per call
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::errors::{AirbyteError, AirbyteResult};
use super::models::TokenResponse;
use crate::config::environment::{AirbyteAuth, AirbyteConfig, AuthMode, SecretString};
use crate::constants::airbyte_api::TOKEN_PATH;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

/// Body of the client-credentials token exchange
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(rename = "grant-type")]
    grant_type: &'static str,
}

/// Resolve the bearer token for one tool call
///
/// With an API key this never touches the network. With client credentials a
/// fresh token is requested every time.
///
/// # Errors
///
/// Returns [`AirbyteError::Authentication`] when the exchange is rejected or
/// yields no token, [`AirbyteError::Network`] when the token endpoint cannot be
/// reached and [`AirbyteError::Api`] for any other failed response.
pub async fn resolve_bearer_token(
    http: &Client,
    config: &AirbyteConfig,
) -> AirbyteResult<SecretString> {
    match &config.auth {
        AirbyteAuth::ApiKey { api_key } => Ok(api_key.clone()),
        AirbyteAuth::ClientCredentials {
            client_id,
            client_secret,
        } => exchange_client_credentials(http, config, client_id, client_secret).await,
    }
}

async fn exchange_client_credentials(
    http: &Client,
    config: &AirbyteConfig,
    client_id: &str,
    client_secret: &SecretString,
) -> AirbyteResult<SecretString> {
    debug!("Requesting Airbyte access token via client credentials");

    let response = http
        .post(config.endpoint(TOKEN_PATH))
        .json(&TokenRequest {
            client_id,
            client_secret: client_secret.expose(),
            grant_type: "client_credentials",
        })
        .send()
        .await
        .map_err(|e| AirbyteError::from_transport(e, config.request_timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_token_failure(status, body));
    }

    let token: TokenResponse = response.json().await.map_err(|e| {
        if e.is_timeout() {
            AirbyteError::from_transport(e, config.request_timeout)
        } else {
            AirbyteError::Api {
                status: status.as_u16(),
                body: format!("invalid token response: {}", e.without_url()),
            }
        }
    })?;

    if token.access_token.trim().is_empty() {
        return Err(AirbyteError::Authentication {
            mode: AuthMode::ClientCredentials,
            reason: "token endpoint returned no access token".to_owned(),
        });
    }

    debug!(
        expires_in = token.expires_in,
        "Obtained Airbyte access token"
    );
    Ok(SecretString::new(token.access_token))
}

fn classify_token_failure(status: StatusCode, body: String) -> AirbyteError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AirbyteError::Authentication {
                mode: AuthMode::ClientCredentials,
                reason: format!("token request rejected with HTTP {}", status.as_u16()),
            }
        }
        _ => AirbyteError::Api {
            status: status.as_u16(),
            body,
        },
    }
}
