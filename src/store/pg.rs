//! [`Store`] over PostgreSQL via sqlx. Rows are read as JSON and deserialized into the record type.

use crate::error::StoreError;
use crate::query::{Filter, QueryOption, ReadPlan};
use crate::record::{FieldName, Record};
use crate::sql::{self, PgBindValue, QueryBuf};
use crate::store::{Store, TableSpec};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct PgStore<R> {
    pool: PgPool,
    table: Arc<TableSpec>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for PgStore<R> {
    fn clone(&self) -> Self {
        PgStore {
            pool: self.pool.clone(),
            table: Arc::clone(&self.table),
            _record: PhantomData,
        }
    }
}

impl<R> PgStore<R> {
    pub fn new(pool: PgPool, table: TableSpec) -> Self {
        PgStore {
            pool,
            table: Arc::new(table),
            _record: PhantomData,
        }
    }

    async fn query_many(&self, q: &QueryBuf) -> Result<Vec<Value>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_optional(&self, q: &QueryBuf) -> Result<Option<Value>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let row = query.fetch_optional(&self.pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_count(&self, q: &QueryBuf) -> Result<i64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "count");
        let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_one(&self.pool).await?)
    }
}

#[async_trait]
impl<R> Store<R> for PgStore<R>
where
    R: Record + DeserializeOwned,
{
    async fn fetch_many(&self, options: &[QueryOption]) -> Result<Vec<R>, StoreError> {
        let plan = ReadPlan::from_options(options);
        let q = sql::select_many(&self.table, &plan)?;
        let rows = self.query_many(&q).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    async fn fetch_by_id(&self, id: &str, options: &[QueryOption]) -> Result<R, StoreError> {
        let plan = ReadPlan::from_options(options);
        let q = sql::select_by_id(&self.table, id, &plan)?;
        let row = self
            .query_optional(&q)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", R::NAME, id)))?;
        Ok(serde_json::from_value(row)?)
    }

    async fn count(&self, filter: Option<&Filter>) -> Result<i64, StoreError> {
        let q = sql::count(&self.table, filter)?;
        self.query_count(&q).await
    }

    async fn count_association(
        &self,
        parent: &R,
        field: &FieldName,
        filter: Option<&Filter>,
    ) -> Result<i64, StoreError> {
        let relation = self
            .table
            .find_relation(field.as_str())
            .ok_or_else(|| StoreError::UnknownRelation(format!("{}.{}", self.table.name, field)))?;
        let parent = serde_json::to_value(parent)?;
        let key = parent.get(&relation.our_key).ok_or_else(|| {
            StoreError::Other(format!("{} has no '{}' value to join on", R::NAME, relation.our_key))
        })?;
        let q = sql::count_related(relation, PgBindValue::from_json(key), filter)?;
        self.query_count(&q).await
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}
