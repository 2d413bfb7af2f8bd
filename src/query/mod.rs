//! Read query model: request decoding, option building, and option plans.

mod builder;
mod option;
mod plan;
mod request;

pub use builder::{build_options, filter_option, nested_options, preloads_only};
pub use option::{Filter, Order, Page, Preload, QueryOption};
pub use plan::ReadPlan;
pub use request::{decode, ReadRequest};
