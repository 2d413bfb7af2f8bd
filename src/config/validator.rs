//! Config validation: identifier shape and path uniqueness.

use crate::config::{ReadConfig, ResourceConfig};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("static regex"))
}

fn check_identifier(kind: &'static str, value: &str) -> Result<(), ConfigError> {
    if identifier().is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        })
    }
}

pub fn validate_resource(resource: &ResourceConfig) -> Result<(), ConfigError> {
    check_identifier("path_segment", &resource.path_segment)?;
    check_identifier("id_param", &resource.id_param)?;
    let mut seen = HashSet::new();
    for field in &resource.nested {
        check_identifier("nested field", field)?;
        if !seen.insert(field.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{}: nested field '{}' listed twice",
                resource.path_segment, field
            )));
        }
    }
    if resource.list.limit_max < 0 {
        return Err(ConfigError::Validation(format!(
            "{}: limit_max must not be negative",
            resource.path_segment
        )));
    }
    Ok(())
}

pub fn validate(config: &ReadConfig) -> Result<(), ConfigError> {
    let mut segments = HashSet::new();
    for resource in &config.resources {
        validate_resource(resource)?;
        if !segments.insert(resource.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(resource.path_segment.clone()));
        }
    }
    Ok(())
}
