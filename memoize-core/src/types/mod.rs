//! Domain types for memoize.
//!
//! - [`Profile`]: the user profile cached behind `GET /profile`

mod profile;

pub use profile::*;
