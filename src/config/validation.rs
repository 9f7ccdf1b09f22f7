use super::models::Config;
use mime::Mime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("remote.accept entry '{0}' is not a valid content-type pattern")]
    InvalidAcceptPattern(String),

    #[error("picker.max_file_size must be positive")]
    ZeroMaxFileSize,

    #[error("session.event_buffer must be positive")]
    ZeroEventBuffer,

    #[error("remote.{field} must be positive")]
    ZeroTimeout { field: &'static str },

    #[error("handler section name must not be empty")]
    EmptyHandlerName,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_picker(config)?;
    validate_session(config)?;
    validate_remote(config)?;
    validate_handlers(config)?;
    Ok(())
}

fn validate_picker(config: &Config) -> Result<(), ValidationError> {
    if config.picker.max_file_size.as_u64() == 0 {
        return Err(ValidationError::ZeroMaxFileSize);
    }
    Ok(())
}

fn validate_session(config: &Config) -> Result<(), ValidationError> {
    if config.session.event_buffer == 0 {
        return Err(ValidationError::ZeroEventBuffer);
    }
    Ok(())
}

fn validate_remote(config: &Config) -> Result<(), ValidationError> {
    if config.remote.connect_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "connect_timeout_secs",
        });
    }
    if config.remote.request_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "request_timeout_secs",
        });
    }

    for pattern in &config.remote.accept {
        if pattern.parse::<Mime>().is_err() {
            return Err(ValidationError::InvalidAcceptPattern(pattern.clone()));
        }
    }

    Ok(())
}

fn validate_handlers(config: &Config) -> Result<(), ValidationError> {
    if config.handlers.keys().any(|name| name.trim().is_empty()) {
        return Err(ValidationError::EmptyHandlerName);
    }
    Ok(())
}
