//! ReadService: list, get-by-id and get-nested-field dispatch over a [`crate::store::Store`].

mod read;
pub use read::ReadService;
