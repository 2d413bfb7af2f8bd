//! Record types and their registration-time field tables.
//!
//! A [`FieldTable`] maps user-facing field names to canonical names and accessors, built
//! once when routes are registered. Lookups fold case and `_`/`-` separators, so
//! `orders`, `Orders` and `ORDERS` all resolve to a field declared as `Orders`.

use crate::case::fold_identifier;
use crate::error::ConfigError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A record type served by the read endpoints.
pub trait Record: Serialize + Send + Sync + Sized + 'static {
    /// Name used in logs and configuration errors.
    const NAME: &'static str;

    fn fields() -> FieldTable<Self>;
}

/// Canonical attribute or relation name on a record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldName(String);

impl FieldName {
    pub fn new(name: impl Into<String>) -> Self {
        FieldName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Attribute,
    /// Single related record.
    One,
    /// Related collection.
    Many,
}

type Accessor<R> = Arc<dyn Fn(&R) -> Result<Value, serde_json::Error> + Send + Sync>;

pub struct Field<R> {
    name: FieldName,
    alias: Option<String>,
    kind: FieldKind,
    accessor: Accessor<R>,
}

impl<R> Clone for Field<R> {
    fn clone(&self) -> Self {
        Field {
            name: self.name.clone(),
            alias: self.alias.clone(),
            kind: self.kind,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<R> Field<R> {
    pub fn new<F>(name: impl Into<String>, kind: FieldKind, accessor: F) -> Self
    where
        F: Fn(&R) -> Result<Value, serde_json::Error> + Send + Sync + 'static,
    {
        Field {
            name: FieldName::new(name),
            alias: None,
            kind,
            accessor: Arc::new(accessor),
        }
    }

    /// Additional user-facing name, typically the serialized key when it differs from the canonical name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Current value of this field on `record`.
    pub fn read(&self, record: &R) -> Result<Value, serde_json::Error> {
        (self.accessor)(record)
    }

    fn keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(fold_identifier(self.name.as_str())).chain(self.alias.as_deref().map(fold_identifier))
    }
}

/// Per-record-type table of fields, looked up by folded name.
pub struct FieldTable<R> {
    fields: Vec<Field<R>>,
}

impl<R> Default for FieldTable<R> {
    fn default() -> Self {
        FieldTable { fields: Vec::new() }
    }
}

impl<R> Clone for FieldTable<R> {
    fn clone(&self) -> Self {
        FieldTable {
            fields: self.fields.clone(),
        }
    }
}

impl<R> fmt::Debug for FieldTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

impl<R> FieldTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field<R>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn attribute<F>(self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Result<Value, serde_json::Error> + Send + Sync + 'static,
    {
        self.field(Field::new(name, FieldKind::Attribute, accessor))
    }

    pub fn has_one<F>(self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Result<Value, serde_json::Error> + Send + Sync + 'static,
    {
        self.field(Field::new(name, FieldKind::One, accessor))
    }

    pub fn has_many<F>(self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Result<Value, serde_json::Error> + Send + Sync + 'static,
    {
        self.field(Field::new(name, FieldKind::Many, accessor))
    }

    pub fn get(&self, user_name: &str) -> Option<&Field<R>> {
        let key = fold_identifier(user_name);
        self.fields.iter().find(|f| f.keys().any(|k| k == key))
    }

    /// Rewrite the head of a dotted path to its canonical field name. Later segments name
    /// fields of related record types and are passed through for the store to match.
    /// An unknown head is passed through unchanged.
    pub fn canonical_path(&self, path: &str) -> String {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let head = self.get(head).map_or(head, |f| f.name().as_str());
        match rest {
            Some(rest) => format!("{}.{}", head, rest),
            None => head.to_string(),
        }
    }
}

impl<R: Record> FieldTable<R> {
    /// Resolve a user-supplied name to its declared field.
    pub fn resolve(&self, user_name: &str) -> Result<&Field<R>, ConfigError> {
        self.get(user_name).ok_or_else(|| ConfigError::UnknownField {
            record: R::NAME,
            field: user_name.to_string(),
        })
    }

    /// Reject tables where two names (canonical or alias) fold to the same key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: Vec<(String, &FieldName)> = Vec::new();
        for field in &self.fields {
            for key in field.keys() {
                if let Some((_, first)) = seen.iter().find(|(k, n)| *k == key && *n != field.name()) {
                    return Err(ConfigError::DuplicateField {
                        record: R::NAME,
                        first: first.to_string(),
                        second: field.name().to_string(),
                    });
                }
                seen.push((key, field.name()));
            }
        }
        Ok(())
    }
}

/// Resolve `user_name` on record type `R` to its canonical field name.
pub fn resolve<R: Record>(user_name: &str) -> Result<FieldName, ConfigError> {
    R::fields().resolve(user_name).map(|f| f.name().clone())
}
