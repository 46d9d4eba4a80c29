// ABOUTME: Error-related constants including codes and messages
// ABOUTME: Organizes JSON-RPC error handling constants
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Error constants module

pub mod codes;

pub use codes::*;
