use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Converter program and direction flags are set, and the flags differ
/// - Conversion timeout, when set, is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let converter = &config.converter;
    if converter.program.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "converter.program cannot be empty".to_string(),
        ));
    }

    if converter.binary_to_text_flag.is_empty() || converter.text_to_binary_flag.is_empty() {
        return Err(ConfigError::ValidationError(
            "converter direction flags cannot be empty".to_string(),
        ));
    }

    if converter.binary_to_text_flag == converter.text_to_binary_flag {
        return Err(ConfigError::ValidationError(
            "converter.binary_to_text_flag and converter.text_to_binary_flag must differ"
                .to_string(),
        ));
    }

    if converter.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
