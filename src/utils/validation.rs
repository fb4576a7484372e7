use crate::utils::error::{BoardError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Trims `value` and checks it holds between 1 and `max_chars` characters.
/// Returns the trimmed text that should be persisted.
pub fn validate_text(field_name: &str, value: &str, max_chars: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::invalid(format!(
            "{} cannot be empty or whitespace-only",
            field_name
        )));
    }

    let chars = trimmed.chars().count();
    if chars > max_chars {
        return Err(BoardError::invalid(format!(
            "{} is {} characters long, the maximum is {}",
            field_name, chars, max_chars
        )));
    }

    Ok(trimmed.to_string())
}

/// Inclusive bounds check used for every position argument.
pub fn validate_index(field_name: &str, index: usize, max_inclusive: Option<usize>) -> Result<()> {
    match max_inclusive {
        Some(max) if index <= max => Ok(()),
        Some(max) => Err(BoardError::invalid(format!(
            "{} {} is outside the permitted range [0, {}]",
            field_name, index, max
        ))),
        None => Err(BoardError::invalid(format!(
            "{} {} is outside the permitted range: the sequence is empty",
            field_name, index
        ))),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BoardError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BoardError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(BoardError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("Value {} must be at least {}", value, min_value),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(BoardError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!(
                "Unsupported value '{}'. Valid values: {}",
                value,
                allowed.join(", ")
            ),
        });
    }
    Ok(())
}
