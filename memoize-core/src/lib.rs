//! # memoize Core
//!
//! Core types, errors, and traits shared by the memoize crates.
//!
//! - **Types**: the [`Profile`] payload served by the API
//! - **Errors**: [`MemoizeError`] and the crate [`Result`] alias
//! - **Constants**: default TTLs and server settings
//! - **Traits**: [`ProfileSource`], the retrieval seam wrapped by fetch functions
//!
//! ## Example
//!
//! ```rust
//! use memoize_core::Profile;
//!
//! let profile = Profile::new("octocat", "https://github.blog", "The Octocat");
//! let json = serde_json::to_string(&profile).unwrap();
//! assert!(json.contains("octocat"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{MemoizeError, Result};
pub use traits::*;
pub use types::*;
