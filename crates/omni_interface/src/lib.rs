//! Trait definitions for Omni model drivers.
//!
//! The generative-model provider is an opaque collaborator: anything that can
//! turn an ordered list of image parts plus a text prompt into text implements
//! [`StoryDriver`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{StoryDriver, Vision};
