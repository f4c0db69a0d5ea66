//! # Configuration Management
//!
//! Configuration for the multicast encoder and its logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variables via `from_env()`
//!
//! ## Security Considerations
//! - No key material is compiled in. Keys come from the config file or, preferably,
//!   from the environment variable named by `encoder.key_env`.
//! - An unknown encryption scheme is a parse error, never a fallback.

use crate::error::{constants, ProtocolError, Result};
use crate::utils::crypto::{EncryptionKey, EncryptionKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// UDP port assigned to VSCP multicast
pub const VSCP_MULTICAST_PORT: u16 = 9598;

/// IPv4 multicast group assigned to VSCP
pub const VSCP_MULTICAST_ADDRESS: &str = "224.0.23.158";

/// Packet type byte for an unencrypted event frame
pub const PACKET_TYPE_EVENT: u8 = 0x00;

/// Environment variable consulted for key material by default
pub const DEFAULT_KEY_ENV: &str = "VSCP_MULTICAST_KEY";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MulticastConfig {
    /// Encoder configuration
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MulticastConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    ///
    /// An unparseable `VSCP_MULTICAST_ENCRYPTION` is an error rather than being
    /// ignored, so a typo never silently disables encryption.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(scheme) = std::env::var("VSCP_MULTICAST_ENCRYPTION") {
            config.encoder.encryption = scheme.parse()?;
        }

        if let Ok(ptype) = std::env::var("VSCP_MULTICAST_PACKET_TYPE") {
            config.encoder.packet_type = ptype.parse::<u8>().map_err(|e| {
                ProtocolError::ConfigError(format!("Invalid VSCP_MULTICAST_PACKET_TYPE: {e}"))
            })?;
        }

        if let Ok(key_env) = std::env::var("VSCP_MULTICAST_KEY_ENV") {
            config.encoder.key_env = key_env;
        }

        if let Ok(level) = std::env::var("VSCP_MULTICAST_LOG_LEVEL") {
            if let Ok(level) = level.parse::<Level>() {
                config.logging.log_level = level;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.encoder.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Encoder configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct EncoderConfig {
    /// Packet type byte written at offset 0 of every frame
    pub packet_type: u8,

    /// Encryption scheme applied to outgoing frames
    pub encryption: EncryptionKind,

    /// Hex-encoded key. Prefer `key_env` outside of tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Environment variable holding the hex-encoded key when `key` is unset
    pub key_env: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            packet_type: PACKET_TYPE_EVENT,
            encryption: EncryptionKind::None,
            key: None,
            key_env: String::from(DEFAULT_KEY_ENV),
        }
    }
}

impl fmt::Debug for EncoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderConfig")
            .field("packet_type", &self.packet_type)
            .field("encryption", &self.encryption)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("key_env", &self.key_env)
            .finish()
    }
}

impl EncoderConfig {
    /// Validate encoder configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.encryption.is_encrypted() {
            if self.key.is_some() {
                errors.push("Key configured but encryption is 'none'".to_string());
            }
            return errors;
        }

        match &self.key {
            Some(key) => match hex::decode(key.trim()) {
                Ok(bytes) if bytes.len() != self.encryption.key_len() => errors.push(format!(
                    "Key length {} bytes does not match {} (expected {} bytes)",
                    bytes.len(),
                    self.encryption,
                    self.encryption.key_len()
                )),
                Ok(_) => {}
                Err(_) => errors.push(constants::ERR_KEY_NOT_HEX.to_string()),
            },
            None => {
                if self.key_env.is_empty() {
                    errors.push(format!(
                        "{}: set 'key' or 'key_env'",
                        constants::ERR_KEY_NOT_CONFIGURED
                    ));
                }
            }
        }

        errors
    }

    /// Resolve the configured key material into a validated key
    pub fn resolve_key(&self) -> Result<EncryptionKey> {
        if !self.encryption.is_encrypted() {
            return Ok(EncryptionKey::none());
        }

        if let Some(key) = &self.key {
            return EncryptionKey::from_hex(self.encryption, key);
        }

        let from_env = std::env::var(&self.key_env).map_err(|_| {
            ProtocolError::ConfigError(format!(
                "{} (environment variable '{}' not set)",
                constants::ERR_KEY_NOT_CONFIGURED,
                self.key_env
            ))
        })?;
        EncryptionKey::from_hex(self.encryption, &from_env)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to file instead of stderr
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("vscp-multicast"),
            log_level: Level::INFO,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
