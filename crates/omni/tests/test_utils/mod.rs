//! Test utilities for the omni facade.

pub mod mock_driver;

pub use mock_driver::FixedDriver;
