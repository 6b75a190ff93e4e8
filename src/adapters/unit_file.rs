use crate::utils::error::FleetError;
use serde::{Deserialize, Serialize};

/// One `Name=Value` option of a unit file, in fleet's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOption {
    pub section: String,
    pub name: String,
    pub value: String,
}

impl UnitOption {
    fn new(section: &str, name: &str, value: &str) -> Self {
        Self {
            section: section.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Parses systemd unit file text into options, keeping file order.
///
/// Handles `[Section]` headers, `#`/`;` comments, blank lines and trailing
/// `\` continuations. `unit` is only used for error reporting.
pub fn parse_unit_file(unit: &str, content: &str) -> Result<Vec<UnitOption>, FleetError> {
    let invalid = |line: usize, reason: &str| FleetError::InvalidUnitFile {
        unit: unit.to_string(),
        line,
        reason: reason.to_string(),
    };

    let mut options = Vec::new();
    let mut section: Option<String> = None;
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;

        let (start, logical) = match pending.take() {
            Some((start, mut acc)) => {
                acc.push(' ');
                acc.push_str(raw.trim());
                (start, acc)
            }
            None => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                    continue;
                }
                (line_no, trimmed.to_string())
            }
        };

        if let Some(stripped) = logical.strip_suffix('\\') {
            pending = Some((start, stripped.trim_end().to_string()));
            continue;
        }

        if logical.starts_with('[') {
            let name = logical
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| invalid(start, "malformed section header"))?;
            section = Some(name.to_string());
            continue;
        }

        let (name, value) = logical
            .split_once('=')
            .ok_or_else(|| invalid(start, "expected Name=Value"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid(start, "option without a name"));
        }
        let current = section
            .as_deref()
            .ok_or_else(|| invalid(start, "option outside of a section"))?;

        options.push(UnitOption::new(current, name, value.trim()));
    }

    if let Some((start, logical)) = pending {
        // file ended inside a continuation
        let (name, value) = logical
            .split_once('=')
            .ok_or_else(|| invalid(start, "expected Name=Value"))?;
        let current = section
            .as_deref()
            .ok_or_else(|| invalid(start, "option outside of a section"))?;
        options.push(UnitOption::new(current, name.trim(), value.trim()));
    }

    Ok(options)
}
