//! Route builders.

mod common;
mod resource;

pub use common::{common_routes, common_routes_with_ready, traced};
pub use resource::{configured_routes, resource_routes};
