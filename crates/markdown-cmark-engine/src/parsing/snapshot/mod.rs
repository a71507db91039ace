//! # Snapshot Testing Support
//!
//! Utilities for comparing trees and checking their structure.
//!
//! ## Modules
//!
//! - **`normalize`**: converts a tree to a stable, serializable `Snap` that
//!   compares structure and attributes but not handles
//! - **`invariants`**: link consistency and nesting checks over a whole arena
//!
//! Streaming and one-shot parses, and XML round trips, are compared through
//! `Snap` equality rather than node handles, which differ between trees.

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
