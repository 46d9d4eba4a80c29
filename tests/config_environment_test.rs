// ABOUTME: Integration tests for environment-driven configuration loading
// ABOUTME: Validates required variables, auth path selection, overrides, and dotenv handling
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use airbyte_mcp_server::config::environment::{
    load_dotenv, AirbyteAuth, AuthMode, ConfigError, ServerConfig,
};
use airbyte_mcp_server::constants::env_config;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;

const ALL_VARS: &[&str] = &[
    env_config::AIRBYTE_WORKSPACE_ID,
    env_config::AIRBYTE_CLIENT_ID,
    env_config::AIRBYTE_CLIENT_SECRET,
    env_config::AIRBYTE_API_KEY,
    env_config::AIRBYTE_API_BASE_URL,
    env_config::AIRBYTE_REQUEST_TIMEOUT_SECS,
    env_config::AIRBYTE_CONNECT_TIMEOUT_SECS,
    env_config::AIRBYTE_PAGE_SIZE,
    env_config::MCP_PROTOCOL_VERSION,
    env_config::SERVER_NAME,
];

/// Replace every configuration variable with exactly `vars`
fn set_env(vars: &[(&str, &str)]) {
    for name in ALL_VARS {
        env::remove_var(name);
    }
    for (name, value) in vars {
        env::set_var(name, value);
    }
}

#[test]
#[serial]
fn test_missing_workspace_is_configuration_error() {
    set_env(&[
        (env_config::AIRBYTE_CLIENT_ID, "id"),
        (env_config::AIRBYTE_CLIENT_SECRET, "secret"),
    ]);

    let error = ServerConfig::from_env().unwrap_err();
    assert!(matches!(
        error,
        ConfigError::MissingVariable {
            name: "AIRBYTE_WORKSPACE_ID"
        }
    ));
    assert!(error.to_string().contains("AIRBYTE_WORKSPACE_ID"));
}

#[test]
#[serial]
fn test_api_key_selects_api_key_path() {
    set_env(&[
        (env_config::AIRBYTE_WORKSPACE_ID, "ws-1"),
        (env_config::AIRBYTE_API_KEY, "key-123"),
        (env_config::AIRBYTE_CLIENT_ID, "id"),
        (env_config::AIRBYTE_CLIENT_SECRET, "secret"),
    ]);

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.airbyte.auth.mode(), AuthMode::ApiKey);
    match &config.airbyte.auth {
        AirbyteAuth::ApiKey { api_key } => assert_eq!(api_key.expose(), "key-123"),
        AirbyteAuth::ClientCredentials { .. } => panic!("expected API key auth"),
    }
}

#[test]
#[serial]
fn test_client_credentials_require_both_values() {
    set_env(&[
        (env_config::AIRBYTE_WORKSPACE_ID, "ws-1"),
        (env_config::AIRBYTE_CLIENT_ID, "id"),
    ]);

    let error = ServerConfig::from_env().unwrap_err();
    assert!(matches!(
        error,
        ConfigError::MissingVariable {
            name: "AIRBYTE_CLIENT_SECRET"
        }
    ));

    set_env(&[
        (env_config::AIRBYTE_WORKSPACE_ID, "ws-1"),
        (env_config::AIRBYTE_CLIENT_ID, "id"),
        (env_config::AIRBYTE_CLIENT_SECRET, "secret"),
        (env_config::AIRBYTE_API_KEY, ""),
    ]);
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.airbyte.auth.mode(), AuthMode::ClientCredentials);
}

#[test]
#[serial]
fn test_defaults_and_overrides() {
    set_env(&[
        (env_config::AIRBYTE_WORKSPACE_ID, "ws-1"),
        (env_config::AIRBYTE_API_KEY, "key"),
    ]);
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.airbyte.base_url, "https://api.airbyte.com/v1");
    assert_eq!(config.airbyte.request_timeout, Duration::from_secs(30));
    assert_eq!(config.airbyte.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.airbyte.page_size, 100);
    assert_eq!(config.protocol_version, "2025-06-18");
    assert_eq!(config.server_name, "airbyte-mcp-server");

    set_env(&[
        (env_config::AIRBYTE_WORKSPACE_ID, "ws-1"),
        (env_config::AIRBYTE_API_KEY, "key"),
        (env_config::AIRBYTE_API_BASE_URL, "http://localhost:8006/v1/"),
        (env_config::AIRBYTE_REQUEST_TIMEOUT_SECS, "5"),
        (env_config::AIRBYTE_PAGE_SIZE, "20"),
        (env_config::SERVER_NAME, "airbyte-status"),
    ]);
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.airbyte.base_url, "http://localhost:8006/v1");
    assert_eq!(config.airbyte.request_timeout, Duration::from_secs(5));
    assert_eq!(config.airbyte.page_size, 20);
    assert_eq!(config.server_name, "airbyte-status");
}

#[test]
#[serial]
fn test_invalid_timeout_is_rejected() {
    set_env(&[
        (env_config::AIRBYTE_WORKSPACE_ID, "ws-1"),
        (env_config::AIRBYTE_API_KEY, "key"),
        (env_config::AIRBYTE_REQUEST_TIMEOUT_SECS, "0"),
    ]);
    assert!(matches!(
        ServerConfig::from_env(),
        Err(ConfigError::InvalidValue {
            name: "AIRBYTE_REQUEST_TIMEOUT_SECS",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_dotenv_file_does_not_override_existing_variables() {
    set_env(&[(env_config::AIRBYTE_WORKSPACE_ID, "from-process")]);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "AIRBYTE_WORKSPACE_ID=from-file").unwrap();
    writeln!(file, "AIRBYTE_API_KEY=file-key").unwrap();
    file.flush().unwrap();

    assert!(load_dotenv(Some(file.path())).unwrap());

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.airbyte.workspace_id, "from-process");
    assert_eq!(config.airbyte.auth.mode(), AuthMode::ApiKey);

    set_env(&[]);
}

#[test]
#[serial]
fn test_missing_dotenv_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.env");
    assert!(!load_dotenv(Some(&missing)).unwrap());
}
