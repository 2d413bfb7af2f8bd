//! Persistence collaborator contract consumed by the read handlers.
//!
//! Every call is a single operation that either returns a complete result or an error.
//! Connection pooling, transactions and blocking I/O belong to the implementation.

mod pg;
mod table;

pub use pg::PgStore;
pub use table::{ColumnSpec, IncludeDirection, RelationSpec, TableSpec};

use crate::error::StoreError;
use crate::query::{Filter, QueryOption};
use crate::record::{FieldName, Record};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Store<R: Record>: Send + Sync {
    /// Fetch a collection of `R` shaped by `options`.
    async fn fetch_many(&self, options: &[QueryOption]) -> Result<Vec<R>, StoreError>;

    /// Fetch one `R` by id. Only preload options are meaningful here.
    async fn fetch_by_id(&self, id: &str, options: &[QueryOption]) -> Result<R, StoreError>;

    /// Count records of `R` matching `filter` (or all of them).
    async fn count(&self, filter: Option<&Filter>) -> Result<i64, StoreError>;

    /// Count the records related to `parent` through `field`, matching `filter`.
    async fn count_association(
        &self,
        parent: &R,
        field: &FieldName,
        filter: Option<&Filter>,
    ) -> Result<i64, StoreError>;
}

pub type SharedStore<R> = Arc<dyn Store<R>>;
