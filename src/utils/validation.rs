// Validation utilities for string fields

/// Trim and validate string fields
pub fn trim_and_validate_field(field: &str, required: bool) -> Result<String, String> {
    let trimmed = field.trim().to_string();
    if trimmed.is_empty() {
        if required {
            Err("Field cannot be empty".to_string())
        } else {
            Ok(trimmed)
        }
    } else {
        Ok(trimmed)
    }
}

/// Trim an optional string field, collapsing empty values to None
pub fn trim_optional_field(field: Option<&String>) -> Option<String> {
    field.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_rejects_whitespace() {
        assert!(trim_and_validate_field("   ", true).is_err());
        assert_eq!(trim_and_validate_field(" ok ", true).unwrap(), "ok");
    }

    #[test]
    fn test_optional_field_collapses_to_none() {
        assert_eq!(trim_optional_field(Some(&"  ".to_string())), None);
        assert_eq!(
            trim_optional_field(Some(&" note ".to_string())),
            Some("note".to_string())
        );
        assert_eq!(trim_optional_field(None), None);
    }
}
