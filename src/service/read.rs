//! Read dispatch: decoded request -> options -> store -> reply.
//!
//! Fetch failures abort the request with `ProcessFailed`. Count failures never do: they
//! are reported as a `totalError` addendum next to the fetched data.

use crate::config::{GetOptions, ListOptions};
use crate::error::{AppError, StoreError};
use crate::query::{build_options, filter_option, nested_options, preloads_only, QueryOption, ReadRequest};
use crate::record::{Field, FieldKind, Record};
use crate::response::{strip_keys, Addendum, Reply};
use crate::store::Store;

pub struct ReadService;

impl ReadService {
    /// List records of `R`. With `want_total`, also counts records matching only the filter.
    pub async fn list<R: Record>(
        store: &dyn Store<R>,
        request: &ReadRequest,
        options: &ListOptions,
    ) -> Result<Reply, AppError> {
        let request = canonical_preloads::<R>(&options.clamp(request));
        let query = build_options(&request);
        tracing::debug!(record = R::NAME, options = ?query, "list");

        let records = store.fetch_many(&query).await.map_err(|e| {
            tracing::warn!(record = R::NAME, error = %e, "list: fetch_many failed");
            AppError::ProcessFailed(e)
        })?;
        let mut data = serde_json::to_value(&records)?;
        strip_keys(&mut data, &options.omit);

        let mut reply = Reply::new(data);
        if request.want_total {
            let filter = filter_option(&request);
            let counted = store.count(filter.as_ref().and_then(QueryOption::as_filter)).await;
            reply = reply.with(total_addendum(R::NAME, "count", counted));
        }
        Ok(reply)
    }

    /// Fetch one record of `R` by `id`. Page/order/filter are dropped; preloads apply.
    pub async fn get_by_id<R: Record>(
        store: &dyn Store<R>,
        id_param: &str,
        id: &str,
        request: &ReadRequest,
        options: &GetOptions,
    ) -> Result<Reply, AppError> {
        if id.is_empty() {
            tracing::warn!(record = R::NAME, id_param, "get: id is empty");
            return Err(AppError::MissingId(id_param.to_string()));
        }
        let query = preloads_only(build_options(&canonical_preloads::<R>(request)));
        tracing::debug!(record = R::NAME, id, options = ?query, "get");

        let record = store.fetch_by_id(id, &query).await.map_err(|e| {
            tracing::warn!(record = R::NAME, id, error = %e, "get: fetch_by_id failed");
            AppError::ProcessFailed(e)
        })?;
        let mut data = serde_json::to_value(&record)?;
        strip_keys(&mut data, &options.omit);
        Ok(Reply::new(data))
    }

    /// Fetch the parent by `id` with `field` preloaded (request options scoped to the field)
    /// and return that field's value. With `want_total` and a `has_many` field or an array
    /// value, also counts the association matching only the filter.
    pub async fn get_nested<R: Record>(
        store: &dyn Store<R>,
        id_param: &str,
        id: &str,
        field: &Field<R>,
        request: &ReadRequest,
    ) -> Result<Reply, AppError> {
        if id.is_empty() {
            tracing::warn!(record = R::NAME, id_param, field = %field.name(), "get field: id is empty");
            return Err(AppError::MissingId(id_param.to_string()));
        }
        let query = nested_options(field.name().as_str(), request);
        tracing::debug!(record = R::NAME, id, field = %field.name(), options = ?query, "get field");

        let parent = store.fetch_by_id(id, &query).await.map_err(|e| {
            tracing::warn!(record = R::NAME, id, field = %field.name(), error = %e, "get field: fetch_by_id failed");
            AppError::ProcessFailed(e)
        })?;
        let value = field.read(&parent)?;

        let is_collection = field.kind() == FieldKind::Many || value.is_array();
        let mut reply = Reply::new(value);
        if request.want_total && is_collection {
            let filter = filter_option(request);
            let counted = store
                .count_association(&parent, field.name(), filter.as_ref().and_then(QueryOption::as_filter))
                .await;
            reply = reply.with(total_addendum(R::NAME, "count_association", counted));
        }
        Ok(reply)
    }
}

/// Request with each preload path's head rewritten to the canonical field name of `R`.
fn canonical_preloads<R: Record>(request: &ReadRequest) -> ReadRequest {
    let table = R::fields();
    ReadRequest {
        preload_paths: request.preload_paths.iter().map(|p| table.canonical_path(p)).collect(),
        ..request.clone()
    }
}

fn total_addendum(record: &'static str, op: &'static str, counted: Result<i64, StoreError>) -> Addendum {
    match counted {
        Ok(total) => Addendum::Total(total),
        Err(e) => {
            tracing::warn!(record, error = %e, "{} failed", op);
            Addendum::TotalError(e.to_string())
        }
    }
}
