//! CRUD SDK: generated REST read endpoints (list, get by id, get nested field) for any
//! record type, over a pluggable persistence layer.

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod query;
pub mod record;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod store;
pub mod telemetry;

pub use config::{load_from_path, GetOptions, ListOptions, ReadConfig, ResourceConfig, ServerSettings};
pub use error::{AppError, ConfigError, StoreError};
pub use query::{QueryOption, ReadPlan, ReadRequest};
pub use record::{Field, FieldKind, FieldName, FieldTable, Record};
pub use response::{Addendum, Reply};
pub use routes::{common_routes, common_routes_with_ready, configured_routes, resource_routes, traced};
pub use service::ReadService;
pub use store::{PgStore, SharedStore, Store, TableSpec};
pub use telemetry::init_tracing;
