use crate::utils::error::{HarnessError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HarnessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HarnessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: i64, min_value: i64) -> Result<()> {
    if value < min_value {
        return Err(HarnessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// 檢查值是否屬於允許的名稱集合
pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(HarnessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Allowed values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(HarnessError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "List cannot be empty".to_string(),
        });
    }
    Ok(())
}

pub fn validate_single_characters(field_name: &str, symbols: &[String]) -> Result<()> {
    for symbol in symbols {
        if symbol.chars().count() != 1 {
            return Err(HarnessError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: symbol.clone(),
                reason: "Each symbol must be exactly one character".to_string(),
            });
        }
    }
    Ok(())
}
