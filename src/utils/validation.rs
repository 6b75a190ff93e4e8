use crate::utils::error::{ControllerError, Result};
use url::Url;

/// Longest fleet request timeout accepted, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 600;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ControllerError {
    ControllerError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// fleet is reached over plain HTTP(S); the endpoint becomes the base of
/// every `/fleet/v1/...` path, so it has to carry a host and no query.
pub fn validate_fleet_endpoint(field: &str, endpoint: &str) -> Result<()> {
    if endpoint.trim().is_empty() {
        return Err(invalid(field, endpoint, "fleet endpoint cannot be empty"));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(
                field,
                endpoint,
                format!("fleet API is served over http(s), not {}", scheme),
            ))
        }
    }
    if url.host_str().is_none() {
        return Err(invalid(field, endpoint, "fleet endpoint needs a host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field,
            endpoint,
            "fleet endpoint cannot carry a query or fragment",
        ));
    }
    Ok(())
}

pub fn validate_timeout_secs(field: &str, secs: u64) -> Result<()> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(invalid(
            field,
            secs,
            format!("timeout must be between 1 and {} seconds", MAX_TIMEOUT_SECS),
        ));
    }
    Ok(())
}

pub fn validate_groups_dir(field: &str, dir: &str) -> Result<()> {
    if dir.is_empty() {
        return Err(invalid(field, dir, "groups directory cannot be empty"));
    }
    if dir.contains('\0') {
        return Err(invalid(field, dir, "groups directory contains null bytes"));
    }
    Ok(())
}

/// A group is a single directory below the groups dir, never a nested path.
pub fn validate_group_name(field: &str, group: &str) -> Result<()> {
    if group.trim().is_empty() {
        return Err(invalid(field, group, "group name cannot be empty"));
    }
    if group.contains('/') || group.contains('\\') || group == "." || group == ".." {
        return Err(invalid(field, group, "Group must name a single directory"));
    }
    Ok(())
}
