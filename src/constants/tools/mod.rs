// ABOUTME: MCP tool-related constants and identifiers
// ABOUTME: Central place for tool names so schema and dispatch agree
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! MCP tools constants module

pub mod identifiers;

pub use identifiers::*;
