use serde_json::Value;

use crate::error::{CoreError, CoreResult};

pub(super) fn optional_string_ref<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(|value| value.as_str())
}

pub(super) fn optional_bool(input: &Value, key: &str) -> CoreResult<Option<bool>> {
    match input.get(key) {
        Some(raw) => raw
            .as_bool()
            .map(Some)
            .ok_or_else(|| CoreError::InvalidInput(format!("{key} must be a boolean"))),
        None => Ok(None),
    }
}

/// A trimmed, non-empty string argument.
pub(super) fn required_string(input: &Value, key: &str) -> CoreResult<String> {
    let value = input
        .get(key)
        .and_then(|raw| raw.as_str())
        .ok_or_else(|| CoreError::InvalidInput(format!("missing {key}")))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput(format!("missing {key}")));
    }
    Ok(trimmed.to_string())
}

/// A string argument taken verbatim; may be empty.
pub(super) fn required_text<'a>(input: &'a Value, key: &str) -> CoreResult<&'a str> {
    input
        .get(key)
        .and_then(|raw| raw.as_str())
        .ok_or_else(|| CoreError::InvalidInput(format!("missing {key}")))
}

/// A bare file or folder name. Separators would escape the parent.
pub(super) fn required_name(input: &Value, key: &str) -> CoreResult<String> {
    let name = required_string(input, key)?;
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(CoreError::InvalidInput(format!(
            "{key} must be a plain name, got '{name}'"
        )));
    }
    Ok(name)
}

pub(super) fn bounded_usize(
    input: &Value,
    key: &str,
    default: usize,
    min: usize,
    max: usize,
) -> CoreResult<usize> {
    let value = match input.get(key) {
        Some(raw) => raw
            .as_u64()
            .ok_or_else(|| CoreError::InvalidInput(format!("{key} must be an integer")))?
            as usize,
        None => default,
    };
    Ok(value.clamp(min, max))
}

pub(super) fn optional_u64(input: &Value, key: &str) -> CoreResult<Option<u64>> {
    match input.get(key) {
        Some(raw) => raw
            .as_u64()
            .map(Some)
            .ok_or_else(|| CoreError::InvalidInput(format!("{key} must be an integer"))),
        None => Ok(None),
    }
}
