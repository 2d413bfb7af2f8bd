//! Decoding of list/get query parameters into a [`ReadRequest`].
//!
//! Recognized keys: `limit`, `offset`, `order_by`, `desc`, `filter_by`, `filter_value`,
//! `preload` (repeatable) and `total`. Unknown keys are ignored. For scalar keys the
//! first occurrence wins and an empty value means "use the default".

use crate::error::AppError;

/// Decoded read query. `limit <= 0` means no pagination; a filter with only one side
/// present is ignored when options are built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadRequest {
    pub limit: i64,
    pub offset: i64,
    pub order_by: String,
    pub descending: bool,
    pub filter_field: String,
    pub filter_value: String,
    pub preload_paths: Vec<String>,
    pub want_total: bool,
}

/// Decode raw `(key, value)` pairs, in the order they appeared in the query string.
pub fn decode<I, K, V>(pairs: I) -> Result<ReadRequest, AppError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut request = ReadRequest::default();
    let mut seen: Vec<&'static str> = Vec::new();

    for (k, v) in pairs {
        let (key, value) = (k.as_ref(), v.as_ref());
        if key == "preload" {
            if !value.is_empty() {
                request.preload_paths.push(value.to_string());
            }
            continue;
        }
        let Some(known) = scalar_key(key) else { continue };
        if seen.contains(&known) {
            continue;
        }
        seen.push(known);
        if value.is_empty() {
            continue;
        }
        match known {
            "limit" => request.limit = parse_int(known, value)?,
            "offset" => request.offset = parse_int(known, value)?,
            "desc" => request.descending = parse_bool(known, value)?,
            "total" => request.want_total = parse_bool(known, value)?,
            "order_by" => request.order_by = value.to_string(),
            "filter_by" => request.filter_field = value.to_string(),
            "filter_value" => request.filter_value = value.to_string(),
            _ => {}
        }
    }

    Ok(request)
}

fn scalar_key(key: &str) -> Option<&'static str> {
    const KEYS: [&str; 7] = ["limit", "offset", "order_by", "desc", "filter_by", "filter_value", "total"];
    KEYS.iter().copied().find(|k| *k == key)
}

fn parse_int(key: &str, value: &str) -> Result<i64, AppError> {
    value.parse::<i64>().map_err(|e| AppError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(AppError::InvalidParameter {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}
