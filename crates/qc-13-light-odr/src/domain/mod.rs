//! # Domain Module
//!
//! Core domain types for light client on-demand retrieval.

pub mod errors;
pub mod messages;
pub mod stats;
pub mod store;

pub use errors::*;
pub use messages::*;
pub use stats::*;
pub use store::*;
