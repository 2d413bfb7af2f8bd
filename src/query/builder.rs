//! ReadRequest -> sparse option list. Nothing is emitted for absent/default values;
//! the collaborator treats a missing option as "unconstrained".

use crate::query::option::{Preload, QueryOption};
use crate::query::request::ReadRequest;

pub fn build_options(request: &ReadRequest) -> Vec<QueryOption> {
    let mut options = Vec::with_capacity(3 + request.preload_paths.len());
    if request.limit > 0 {
        options.push(QueryOption::page(request.limit as u64, request.offset.max(0) as u64));
    }
    if !request.order_by.is_empty() {
        options.push(QueryOption::order_by(&request.order_by, request.descending));
    }
    if let Some(filter) = filter_option(request) {
        options.push(filter);
    }
    for path in &request.preload_paths {
        options.push(QueryOption::preload(path));
    }
    options
}

/// FilterBy iff both sides are present. Counts use this alone.
pub fn filter_option(request: &ReadRequest) -> Option<QueryOption> {
    if request.filter_field.is_empty() || request.filter_value.is_empty() {
        return None;
    }
    Some(QueryOption::filter_by(&request.filter_field, &request.filter_value))
}

/// Options for a single-record fetch: only preloads carry meaning, the rest is dropped.
pub fn preloads_only(options: Vec<QueryOption>) -> Vec<QueryOption> {
    options.into_iter().filter(QueryOption::is_preload).collect()
}

/// Options for reading one field of a parent: a single forced preload of `field`
/// with the request's options scoped to it (so `preload=Product` under `Orders`
/// loads `Orders.Product`).
pub fn nested_options(field: &str, request: &ReadRequest) -> Vec<QueryOption> {
    vec![QueryOption::Preload(Preload::scoped(field, build_options(request)))]
}
