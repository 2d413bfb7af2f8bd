//! Handler factories for the read endpoints. Each returns a `GET` route bound to one
//! record type and one shared store.

use crate::config::{GetOptions, ListOptions};
use crate::error::ConfigError;
use crate::query::ReadRequest;
use crate::record::{FieldTable, Record};
use crate::service::ReadService;
use crate::store::SharedStore;
use axum::{extract::Path, routing::get, routing::MethodRouter};
use std::collections::HashMap;

fn path_id<'a>(params: &'a HashMap<String, String>, id_param: &str) -> &'a str {
    params.get(id_param).map(String::as_str).unwrap_or_default()
}

/// `GET /T?limit=10&offset=0&order_by=id&desc=true&filter_by=name&filter_value=John&total=true`
pub fn list_handler<R: Record>(store: SharedStore<R>, options: ListOptions) -> MethodRouter {
    get(move |request: ReadRequest| async move {
        ReadService::list(store.as_ref(), &request, &options).await
    })
}

/// `GET /T/:id_param?preload=Relation`
pub fn get_handler<R: Record>(store: SharedStore<R>, id_param: &str, options: GetOptions) -> MethodRouter {
    let id_param = id_param.to_string();
    get(
        move |Path(params): Path<HashMap<String, String>>, request: ReadRequest| async move {
            let id = path_id(&params, &id_param);
            ReadService::get_by_id(store.as_ref(), &id_param, id, &request, &options).await
        },
    )
}

/// `GET /T/:id_param/field`. The field is resolved against `fields` here, once; an unknown
/// field fails registration. Request options apply to the field, e.g.
/// `GET /users/123/orders?preload=Product` preloads `Orders.Product`.
pub fn nested_field_handler<R: Record>(
    store: SharedStore<R>,
    fields: &FieldTable<R>,
    id_param: &str,
    field: &str,
) -> Result<MethodRouter, ConfigError> {
    let field = fields.resolve(field)?.clone();
    let id_param = id_param.to_string();
    tracing::debug!(record = R::NAME, field = %field.name(), "nested field route resolved");
    Ok(get(
        move |Path(params): Path<HashMap<String, String>>, request: ReadRequest| async move {
            let id = path_id(&params, &id_param);
            ReadService::get_nested(store.as_ref(), &id_param, id, &field, &request).await
        },
    ))
}
