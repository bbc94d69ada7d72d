//! Common test utilities for pipeline integration tests
//!
//! This module provides:
//! - Card and discovery payload fixtures
//! - A mock upstream built on wiremock
//! - Configs pointing at temporary directories
//! - Assertions over the written artifacts

#![allow(dead_code)]

pub mod assertions;
pub mod config;
pub mod fixtures;

pub use assertions::*;
pub use config::*;
pub use fixtures::*;
