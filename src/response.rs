//! Standard response envelope helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Optional extra field attached next to `data` in a success body.
#[derive(Clone, Debug, PartialEq)]
pub enum Addendum {
    /// Number of records matching the filter, ignoring page/order/preload.
    Total(i64),
    /// Counting failed; the primary payload is still returned.
    TotalError(String),
}

impl Addendum {
    fn key(&self) -> &'static str {
        match self {
            Addendum::Total(_) => "total",
            Addendum::TotalError(_) => "totalError",
        }
    }

    fn value(&self) -> Value {
        match self {
            Addendum::Total(n) => Value::Number((*n).into()),
            Addendum::TotalError(msg) => Value::String(msg.clone()),
        }
    }
}

/// Success payload of a read: primary data plus zero or more addenda.
#[derive(Clone, Debug)]
pub struct Reply {
    pub data: Value,
    pub addenda: Vec<Addendum>,
}

impl Reply {
    pub fn new(data: Value) -> Self {
        Reply {
            data,
            addenda: Vec::new(),
        }
    }

    pub fn with(mut self, addendum: Addendum) -> Self {
        self.addenda.push(addendum);
        self
    }

    pub fn total(&self) -> Option<i64> {
        self.addenda.iter().find_map(|a| match a {
            Addendum::Total(n) => Some(*n),
            _ => None,
        })
    }

    pub fn total_error(&self) -> Option<&str> {
        self.addenda.iter().find_map(|a| match a {
            Addendum::TotalError(e) => Some(e.as_str()),
            _ => None,
        })
    }

    pub fn into_body(self) -> SuccessBody {
        let extra = self
            .addenda
            .iter()
            .map(|a| (a.key().to_string(), a.value()))
            .collect();
        SuccessBody {
            data: self.data,
            extra,
        }
    }
}

#[derive(Serialize)]
pub struct SuccessBody {
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.into_body())).into_response()
    }
}

/// Remove the given keys from every object in `data` (a single object or an array of objects).
pub fn strip_keys(data: &mut Value, keys: &[String]) {
    if keys.is_empty() {
        return;
    }
    match data {
        Value::Object(map) => {
            for k in keys {
                map.remove(k);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                if let Value::Object(map) = item {
                    for k in keys {
                        map.remove(k);
                    }
                }
            }
        }
        _ => {}
    }
}
