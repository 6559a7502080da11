use super::ApiError;
use crate::constants::limits::{MAX_PAGE_SIZE, MIN_PASSWORD_CHARS};

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(ApiError::validation(
            "Username must be between 3 and 50 characters",
        ));
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ApiError::validation("Username cannot contain whitespace"));
    }

    Ok(username)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(password)
}

pub fn validate_traffic_limit_gb(gb: f64) -> Result<f64, ApiError> {
    if !gb.is_finite() || gb < 0.0 {
        return Err(ApiError::validation(format!(
            "Invalid traffic limit: {}. Must be a non-negative number of GB",
            gb
        )));
    }
    Ok(gb)
}

pub fn validate_required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{} cannot be empty", field)));
    }
    Ok(value)
}

pub fn validate_port(port: i32) -> Result<i32, ApiError> {
    if !(1..=65535).contains(&port) {
        return Err(ApiError::validation(format!(
            "Invalid port: {}. Port must be between 1 and 65535",
            port
        )));
    }
    Ok(port)
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, MAX_PAGE_SIZE
        )));
    }
    Ok(limit)
}
