//! Resource route configuration, deserialized from JSON.

use crate::query::ReadRequest;
use serde::{Deserialize, Serialize};

fn enabled() -> bool {
    true
}

fn default_id_param() -> String {
    "id".into()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListOptions {
    #[serde(default = "enabled")]
    pub enable: bool,
    /// Serialized keys stripped from every listed record.
    #[serde(default)]
    pub omit: Vec<String>,
    /// Upper bound on page size; 0 means unbounded.
    #[serde(default)]
    pub limit_max: i64,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            enable: true,
            omit: Vec::new(),
            limit_max: 0,
        }
    }
}

impl ListOptions {
    /// Apply `limit_max`: a missing, non-positive or oversized limit becomes `limit_max`.
    pub fn clamp(&self, request: &ReadRequest) -> ReadRequest {
        let mut request = request.clone();
        if self.limit_max > 0 && (request.limit <= 0 || request.limit > self.limit_max) {
            request.limit = self.limit_max;
        }
        request
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetOptions {
    #[serde(default = "enabled")]
    pub enable: bool,
    #[serde(default)]
    pub omit: Vec<String>,
}

impl Default for GetOptions {
    fn default() -> Self {
        GetOptions {
            enable: true,
            omit: Vec::new(),
        }
    }
}

/// Read routes for one record type, mounted under `/{path_segment}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub path_segment: String,
    #[serde(default = "default_id_param")]
    pub id_param: String,
    #[serde(default)]
    pub list: ListOptions,
    #[serde(default)]
    pub get: GetOptions,
    /// Fields exposed as `/{path_segment}/:{id_param}/{field}`.
    #[serde(default)]
    pub nested: Vec<String>,
}

impl ResourceConfig {
    pub fn new(path_segment: impl Into<String>) -> Self {
        ResourceConfig {
            path_segment: path_segment.into(),
            id_param: default_id_param(),
            list: ListOptions::default(),
            get: GetOptions::default(),
            nested: Vec::new(),
        }
    }

    pub fn nested(mut self, field: impl Into<String>) -> Self {
        self.nested.push(field.into());
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReadConfig {
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl ReadConfig {
    pub fn resource(&self, path_segment: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.path_segment == path_segment)
    }
}
