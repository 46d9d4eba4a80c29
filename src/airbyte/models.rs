// ABOUTME: Airbyte public API wire types and the normalized connection status record
// ABOUTME: Isolates API schema drift in one translation step with defaults for unknown values
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Airbyte data models
//!
//! The `Api*` structs mirror the JSON returned by the Airbyte public API and
//! accept missing or extra fields. [`ConnectionStatusRecord::from_api`] is the
//! only place that interprets them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Response of `POST /applications/token`
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    #[serde(default)]
    pub access_token: String,
    /// Usually `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// One page of a list endpoint
#[derive(Debug, Deserialize)]
pub struct ApiPage<T> {
    /// Records on this page
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// URL of the next page, if any
    #[serde(default)]
    pub next: Option<String>,
}

/// A connection as returned by `GET /connections`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConnection {
    /// Connection id
    #[serde(default, alias = "id")]
    pub connection_id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Raw status string
    #[serde(default)]
    pub status: Option<String>,
}

/// A job as returned by `GET /jobs`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiJob {
    /// Connection the job belongs to
    #[serde(default)]
    pub connection_id: Option<String>,
    /// Job start time
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Last update of the job
    #[serde(default)]
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl ApiJob {
    /// Best available timestamp for the job
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at.or(self.start_time)
    }
}

/// Normalized connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Syncing on schedule
    Active,
    /// Disabled, paused or deprecated
    Inactive,
    /// Last state reported as failed
    Error,
    /// Missing or unrecognized status
    Unknown,
}

impl ConnectionStatus {
    /// Map a raw API status string; anything unrecognized becomes `Unknown`
    #[must_use]
    pub fn from_api(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "inactive" | "deprecated" | "paused" => Self::Inactive,
            "failed" | "failure" | "error" | "incomplete" => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one connection, built fresh for every tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusRecord {
    /// Connection id
    pub connection_id: String,
    /// Display name (empty when the API omitted it)
    pub name: String,
    /// Normalized status
    pub status: ConnectionStatus,
    /// Time of the most recent sync job, when known
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl ConnectionStatusRecord {
    /// Translate an API connection into a status record
    #[must_use]
    pub fn from_api(connection: ApiConnection, last_sync_at: Option<DateTime<Utc>>) -> Self {
        let status = connection
            .status
            .as_deref()
            .map_or(ConnectionStatus::Unknown, ConnectionStatus::from_api);

        Self {
            connection_id: connection.connection_id,
            name: connection.name.unwrap_or_default(),
            status,
            last_sync_at,
        }
    }
}

/// Every connection status gathered by one tool call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStatusReport {
    /// Records in API order
    pub records: Vec<ConnectionStatusRecord>,
    /// Pagination stopped at the page limit; the workspace has more connections
    pub truncated: bool,
}

impl ConnectionStatusReport {
    /// A complete listing
    #[must_use]
    pub const fn complete(records: Vec<ConnectionStatusRecord>) -> Self {
        Self {
            records,
            truncated: false,
        }
    }
}

/// Most recent job timestamp per connection id
///
/// Jobs may arrive in any order; the latest timestamp wins.
#[must_use]
pub fn latest_sync_by_connection(jobs: &[ApiJob]) -> HashMap<String, DateTime<Utc>> {
    let mut latest: HashMap<String, DateTime<Utc>> = HashMap::new();
    for job in jobs {
        let (Some(connection_id), Some(at)) = (job.connection_id.as_ref(), job.timestamp()) else {
            continue;
        };
        latest
            .entry(connection_id.clone())
            .and_modify(|current| {
                if at > *current {
                    *current = at;
                }
            })
            .or_insert(at);
    }
    latest
}
