// ABOUTME: HTTP client for the Airbyte public API
// ABOUTME: Lists workspace connections with pagination and attaches best-effort last-sync times
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::auth::resolve_bearer_token;
use super::errors::{AirbyteError, AirbyteResult};
use super::models::{
    latest_sync_by_connection, ApiConnection, ApiJob, ApiPage, ConnectionStatusRecord,
    ConnectionStatusReport,
};
use super::ConnectionStatusProvider;
use crate::config::environment::{AirbyteConfig, SecretString};
use crate::constants::airbyte_api::{
    CONNECTIONS_PATH, JOBS_PATH, MAX_PAGES, RECENT_JOBS_LIMIT, USER_AGENT,
};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Client for the subset of the Airbyte API this server needs
///
/// Holds no per-call state: every call resolves its own bearer token.
#[derive(Debug, Clone)]
pub struct AirbyteClient {
    http: Client,
    config: AirbyteConfig,
}

impl AirbyteClient {
    /// Create a client with the configured timeouts
    ///
    /// # Errors
    ///
    /// Returns [`AirbyteError::Network`] if the HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(config: AirbyteConfig) -> AirbyteResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AirbyteError::Network {
                reason: format!("failed to build HTTP client: {e}"),
                timed_out: false,
            })?;

        Ok(Self { http, config })
    }

    /// List every connection in the workspace with its normalized status
    ///
    /// Records keep the order the API returned them in. The report is marked
    /// truncated when pagination stopped at the page limit.
    ///
    /// # Errors
    ///
    /// Fails if the token exchange or the connections listing fails. A failed
    /// jobs lookup only drops the last-sync timestamps.
    pub async fn list_connection_statuses(&self) -> AirbyteResult<ConnectionStatusReport> {
        let token = resolve_bearer_token(&self.http, &self.config).await?;
        let (connections, truncated) = self.list_connections(&token).await?;

        let last_syncs = if connections.is_empty() {
            HashMap::new()
        } else {
            match self.recent_sync_jobs(&token).await {
                Ok(jobs) => latest_sync_by_connection(&jobs),
                Err(e) => {
                    warn!(error = %e, "Could not fetch recent sync jobs; lastSyncAt left empty");
                    HashMap::new()
                }
            }
        };

        let records = connections
            .into_iter()
            .map(|connection| {
                let last_sync_at = last_syncs.get(&connection.connection_id).copied();
                ConnectionStatusRecord::from_api(connection, last_sync_at)
            })
            .collect();

        Ok(ConnectionStatusReport { records, truncated })
    }

    /// All connection pages, plus whether the page limit cut the listing short
    async fn list_connections(
        &self,
        token: &SecretString,
    ) -> AirbyteResult<(Vec<ApiConnection>, bool)> {
        let mut url = self.listing_url(
            CONNECTIONS_PATH,
            &[
                ("workspaceIds", self.config.workspace_id.clone()),
                ("includeDeleted", "false".to_owned()),
                ("limit", self.config.page_size.to_string()),
            ],
        )?;

        let mut connections = Vec::new();
        for page_number in 1..=MAX_PAGES {
            let page: ApiPage<ApiConnection> = self.get_json(url, token).await?;
            debug!(
                page = page_number,
                records = page.data.len(),
                "Fetched Airbyte connections page"
            );
            let received = page.data.len();
            connections.extend(page.data);

            match page.next.as_deref().map(str::trim) {
                Some(next) if !next.is_empty() && received > 0 => {
                    url = self.resolve_next(next)?;
                }
                _ => return Ok((connections, false)),
            }
        }

        warn!(
            max_pages = MAX_PAGES,
            "Stopped following Airbyte connection pages at the page limit"
        );
        Ok((connections, true))
    }

    async fn recent_sync_jobs(&self, token: &SecretString) -> AirbyteResult<Vec<ApiJob>> {
        let url = self.listing_url(
            JOBS_PATH,
            &[
                ("workspaceIds", self.config.workspace_id.clone()),
                ("jobType", "sync".to_owned()),
                ("orderBy", "updatedAt|DESC".to_owned()),
                ("limit", RECENT_JOBS_LIMIT.to_string()),
            ],
        )?;
        let page: ApiPage<ApiJob> = self.get_json(url, token).await?;
        Ok(page.data)
    }

    async fn get_json<T>(&self, url: Url, token: &SecretString) -> AirbyteResult<T>
    where
        T: DeserializeOwned,
    {
        let timeout = self.config.request_timeout;
        let response = self
            .http
            .get(url)
            .bearer_auth(token.expose())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AirbyteError::from_transport(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AirbyteError::from_status(
                status,
                body,
                self.config.auth.mode(),
            ));
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                AirbyteError::from_transport(e, timeout)
            } else {
                AirbyteError::Api {
                    status: status.as_u16(),
                    body: format!("unexpected response body: {}", e.without_url()),
                }
            }
        })
    }

    fn listing_url(&self, path: &str, query: &[(&str, String)]) -> AirbyteResult<Url> {
        let mut url = parse_url(&self.config.endpoint(path))?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// `next` links are normally absolute; relative ones resolve against the base URL
    ///
    /// The bearer token is only ever sent to the API origin, so a link to any
    /// other scheme, host or port is refused before a request is made.
    fn resolve_next(&self, next: &str) -> AirbyteResult<Url> {
        let base = parse_url(&format!("{}/", self.config.base_url))?;
        let url = match Url::parse(next) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => base
                .join(next.trim_start_matches('/'))
                .map_err(|e| invalid_next_link(&e))?,
            Err(e) => return Err(invalid_next_link(&e)),
        };

        if url.origin() != base.origin() {
            warn!(
                next_host = url.host_str().unwrap_or_default(),
                "Refusing Airbyte pagination link outside the API origin"
            );
            return Err(AirbyteError::Api {
                status: 200,
                body: "pagination link leaves the API origin".to_owned(),
            });
        }

        Ok(url)
    }
}

fn parse_url(raw: &str) -> AirbyteResult<Url> {
    Url::parse(raw).map_err(|e| AirbyteError::Network {
        reason: format!("invalid Airbyte API URL: {e}"),
        timed_out: false,
    })
}

fn invalid_next_link(error: &url::ParseError) -> AirbyteError {
    AirbyteError::Api {
        status: 200,
        body: format!("invalid pagination link: {error}"),
    }
}

#[async_trait]
impl ConnectionStatusProvider for AirbyteClient {
    async fn list_connection_statuses(&self) -> AirbyteResult<ConnectionStatusReport> {
        Self::list_connection_statuses(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AirbyteClient {
        let config =
            AirbyteConfig::with_api_key("ws-1", "key").base_url("https://api.example.test/v1/");
        AirbyteClient::new(config).unwrap_or_else(|e| panic!("client: {e}"))
    }

    #[test]
    fn test_listing_url_encodes_query() {
        let url = client()
            .listing_url(
                JOBS_PATH,
                &[
                    ("workspaceIds", "ws-1".to_owned()),
                    ("orderBy", "updatedAt|DESC".to_owned()),
                ],
            )
            .unwrap_or_else(|e| panic!("url: {e}"));
        assert_eq!(url.path(), "/v1/jobs");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("orderBy".to_owned(), "updatedAt|DESC".to_owned())));
    }

    #[test]
    fn test_relative_next_link_resolves_against_base() {
        let url = client()
            .resolve_next("/connections?offset=100")
            .unwrap_or_else(|e| panic!("next: {e}"));
        assert_eq!(url.as_str(), "https://api.example.test/v1/connections?offset=100");

        let absolute = client()
            .resolve_next("https://api.example.test:443/v1/connections?offset=200")
            .unwrap_or_else(|e| panic!("next: {e}"));
        assert_eq!(absolute.query(), Some("offset=200"));
    }

    #[test]
    fn test_next_link_outside_api_origin_is_refused() {
        for next in [
            "https://other.example.test/v1/connections?offset=200",
            "http://api.example.test/v1/connections?offset=200",
            "https://api.example.test:8443/v1/connections?offset=200",
        ] {
            let error = client().resolve_next(next).unwrap_err();
            assert!(
                matches!(&error, AirbyteError::Api { body, .. } if body.contains("leaves the API origin")),
                "{next}: {error}"
            );
        }
    }
}
