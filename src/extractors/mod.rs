//! Request extractors.

mod read_request;
