use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Library section exists (enforced by serde)
/// - Root folder is not empty
/// - Server port is not 0
/// - Discord webhook URL looks like an HTTP URL when configured
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.library.root_folder.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "library.root_folder cannot be empty".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(discord) = &config.discord {
        if !discord.webhook_url.starts_with("http://")
            && !discord.webhook_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(
                "discord.webhook_url must be an HTTP(S) URL".to_string(),
            ));
        }
    }

    Ok(())
}
