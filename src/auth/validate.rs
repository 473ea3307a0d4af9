/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    if value.trim().chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional email: when given, must contain '@' and '.'.
pub fn validate_optional_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() > 254 {
        return Some("Email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Email must be a valid address (contain '@' and '.')".to_string());
    }
    None
}

/// Validate an optional value against a fixed vocabulary (empty is OK).
pub fn validate_choice(value: Option<&str>, field_name: &str, allowed: &[&str]) -> Option<String> {
    let v = value.map(str::trim).unwrap_or("");
    if v.is_empty() || allowed.contains(&v) {
        return None;
    }
    Some(format!("{field_name} must be one of: {}", allowed.join(", ")))
}
