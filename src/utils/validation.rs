use crate::utils::error::{ListError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(extension)) => {
            Ok(())
        }
        Some(extension) => Err(ListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(ListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

/// Indentation strings must be non-empty and contain only whitespace.
pub fn validate_indent(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() || !value.chars().all(char::is_whitespace) {
        return Err(ListError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Indent must be one or more whitespace characters".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("out", "./lists").is_ok());
        assert!(validate_path("out", "").is_err());
        assert!(validate_path("out", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("input", "lists.csv", &["csv"]).is_ok());
        assert!(validate_file_extension("input", "LISTS.CSV", &["csv"]).is_ok());
        assert!(validate_file_extension("input", "lists.json", &["csv"]).is_err());
        assert!(validate_file_extension("input", "lists", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_indent() {
        assert!(validate_indent("indent", "  ").is_ok());
        assert!(validate_indent("indent", "\t").is_ok());
        assert!(validate_indent("indent", "").is_err());
        assert!(validate_indent("indent", "->").is_err());
    }
}
