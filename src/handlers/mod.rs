//! HTTP handler factories for the generated read endpoints.

pub mod read;
pub use read::*;
