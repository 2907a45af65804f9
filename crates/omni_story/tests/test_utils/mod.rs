//! Test utilities for Omni story tests.
//!
//! This module provides a mock driver and fixture helpers.

pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_driver::{MockDriver, MockResponse, story_json};
