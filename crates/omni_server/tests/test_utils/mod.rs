//! Test utilities for Omni server tests.

pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_driver::{CountingDriver, stories_json};
