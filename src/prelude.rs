//! Prelude module for the kennitala crate.
//!
//! Re-exports the derive_more macros used across the crate.

pub use derive_more::{Deref, Display};
