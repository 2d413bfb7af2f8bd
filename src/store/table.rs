//! Table metadata for the PostgreSQL store. Every identifier rendered into SQL comes from here.

use crate::case::same_identifier;
use serde::{Deserialize, Serialize};

/// Direction of a relation: to_one (we hold the FK) or to_many (they hold the FK to us).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeDirection {
    ToOne,
    ToMany,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    /// PostgreSQL type used to cast bound text values (e.g. "bigint", "timestamptz").
    #[serde(default)]
    pub pg_type: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        ColumnSpec {
            name: name.into(),
            pg_type: None,
        }
    }

    pub fn typed(name: impl Into<String>, pg_type: impl Into<String>) -> Self {
        ColumnSpec {
            name: name.into(),
            pg_type: Some(pg_type.into()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelationSpec {
    /// Record field this relation fills (matched like any field name).
    pub field: String,
    /// JSON key the related row(s) are written under; defaults to `field`.
    #[serde(default)]
    pub key: Option<String>,
    pub direction: IncludeDirection,
    pub table: TableSpec,
    /// Our column used in the join (our FK for to_one; our PK for to_many).
    pub our_key: String,
    /// Their column used in the join (their PK for to_one; their FK for to_many).
    pub their_key: String,
}

impl RelationSpec {
    pub fn output_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.field)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableSpec {
    pub schema: String,
    pub name: String,
    pub primary_key: String,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub relations: Vec<RelationSpec>,
}

impl TableSpec {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        TableSpec {
            schema: schema.into(),
            name: name.into(),
            primary_key: primary_key.into(),
            columns: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    pub fn relation(mut self, relation: RelationSpec) -> Self {
        self.relations.push(relation);
        self
    }

    /// Column by user-supplied name (case/separator-insensitive).
    pub fn find_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.columns.iter().find(|c| same_identifier(&c.name, name)))
    }

    /// Relation by record field name or output key.
    pub fn find_relation(&self, name: &str) -> Option<&RelationSpec> {
        self.relations
            .iter()
            .find(|r| same_identifier(&r.field, name) || same_identifier(r.output_key(), name))
    }

    pub fn pg_type_of(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .and_then(|c| c.pg_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_json_config() {
        let spec: TableSpec = serde_json::from_value(serde_json::json!({
            "schema": "shop",
            "name": "users",
            "primary_key": "id",
            "columns": [{ "name": "id", "pg_type": "bigint" }, { "name": "created_at" }],
            "relations": [{
                "field": "Orders",
                "key": "orders",
                "direction": "to_many",
                "our_key": "id",
                "their_key": "user_id",
                "table": { "schema": "shop", "name": "orders", "primary_key": "id", "columns": [{ "name": "id" }] }
            }]
        }))
        .unwrap();
        assert_eq!(spec.pg_type_of("id"), Some("bigint"));
        assert_eq!(spec.find_column("createdAt").unwrap().name, "created_at");
        let rel = spec.find_relation("orders").unwrap();
        assert_eq!(rel.direction, IncludeDirection::ToMany);
        assert_eq!(rel.output_key(), "orders");
    }
}
