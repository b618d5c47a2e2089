use crate::utils::error::{FabError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Layer names are passed to kicad-cli as one comma-joined argument.
pub fn validate_layers(field_name: &str, layers: &[String]) -> Result<()> {
    if layers.is_empty() {
        return Err(FabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one layer is required".to_string(),
        });
    }

    for layer in layers {
        if layer.trim().is_empty() || layer.contains(',') || layer.contains(char::is_whitespace) {
            return Err(FabError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: layer.clone(),
                reason: "Layer names cannot be empty or contain commas or whitespace".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_single_char(field_name: &str, value: &str) -> Result<()> {
    if value.chars().count() != 1 {
        return Err(FabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected exactly one character".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("project.dir", ".").is_ok());
        assert!(validate_path("project.dir", "").is_err());
        assert!(validate_path("project.dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_layers() {
        let layers = vec!["F.Cu".to_string(), "B.Cu".to_string()];
        assert!(validate_layers("layers.gerber", &layers).is_ok());
        assert!(validate_layers("layers.gerber", &[]).is_err());

        let joined = vec!["F.Cu,B.Cu".to_string()];
        assert!(validate_layers("layers.gerber", &joined).is_err());
    }

    #[test]
    fn test_validate_single_char() {
        assert!(validate_single_char("toolchain.expected_major", "7").is_ok());
        assert!(validate_single_char("toolchain.expected_major", "").is_err());
        assert!(validate_single_char("toolchain.expected_major", "10").is_err());
    }
}
