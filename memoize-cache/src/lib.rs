//! Single-slot TTL memoization for memoize.
//!
//! [`Memo`] pairs a value with its expiration instant. [`SafeMemoize`] holds
//! one `Memo` and serves it to concurrent callers, refreshing it in the
//! background once it expires so that readers never wait on a refresh of a
//! populated slot and the fetch function never runs twice at once.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use memoize_cache::{Memo, SafeMemoize};
//!
//! let cache = SafeMemoize::named("greeting");
//! let value = cache.value(|| Memo::new(String::from("hello"), Duration::from_secs(60)));
//! assert_eq!(value, "hello");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod memo;
mod safe;

pub use config::{CacheConfig, CacheStats};
pub use memo::Memo;
pub use safe::SafeMemoize;
