//! # Application Layer
//!
//! Proof fetching, verified views and the view factory.

pub mod backend;
pub mod fetcher;
pub mod view;

pub use backend::OdrBackend;
pub use fetcher::ProofFetcher;
pub use view::VerifiedView;
