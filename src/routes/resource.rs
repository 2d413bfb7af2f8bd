//! Read routes for one record type, built from its resource config.
//! Mounts `GET /{segment}`, `GET /{segment}/:{id_param}` and one
//! `GET /{segment}/:{id_param}/{field}` per configured nested field.

use crate::config::{validate_resource, ReadConfig, ResourceConfig};
use crate::error::ConfigError;
use crate::handlers::{get_handler, list_handler, nested_field_handler};
use crate::record::Record;
use crate::store::SharedStore;
use axum::Router;

pub fn resource_routes<R: Record>(store: SharedStore<R>, resource: &ResourceConfig) -> Result<Router, ConfigError> {
    validate_resource(resource)?;
    let fields = R::fields();
    fields.validate()?;

    let base = format!("/{}", resource.path_segment);
    let item = format!("{}/:{}", base, resource.id_param);
    let mut router = Router::new();
    if resource.list.enable {
        router = router.route(&base, list_handler(store.clone(), resource.list.clone()));
    }
    if resource.get.enable {
        router = router.route(&item, get_handler(store.clone(), &resource.id_param, resource.get.clone()));
    }
    for name in &resource.nested {
        let handler = nested_field_handler(store.clone(), &fields, &resource.id_param, name)?;
        router = router.route(&format!("{}/{}", item, name), handler);
    }
    tracing::info!(
        record = R::NAME,
        path = %base,
        list = resource.list.enable,
        get = resource.get.enable,
        nested = ?resource.nested,
        "read routes registered"
    );
    Ok(router)
}

/// Routes for `segment` using its entry in `config`, or defaults when it has none.
pub fn configured_routes<R: Record>(
    store: SharedStore<R>,
    config: &ReadConfig,
    segment: &str,
) -> Result<Router, ConfigError> {
    match config.resource(segment) {
        Some(resource) => resource_routes(store, resource),
        None => {
            tracing::info!(record = R::NAME, segment, "no resource config, using defaults");
            resource_routes(store, &ResourceConfig::new(segment))
        }
    }
}
