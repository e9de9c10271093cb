//! Inspect API configuration module.
//!
//! Configuration is layered: built-in defaults, then an optional
//! `inspect.toml` in the working directory, then environment variables.
//!
//! ```text
//! defaults ──► inspect.toml (optional) ──► env (PORT, JWT_SECRET, ...)
//!                                              │
//!                                              ▼
//!                                     ApiConfig::validate()
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

/// Development signing key. Startup warns when it is still in use.
pub const DEV_JWT_SECRET: &str = "inspect-dev-secret-change-in-production";

/// Where inspections get mirrored after they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorMode {
    /// Don't mirror.
    None,
    /// Upload to a SharePoint document library through Microsoft Graph.
    SharePoint,
    /// Write into a folder on this machine.
    Local,
}

/// Inspect API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT lifetime in seconds
    pub jwt_expiry_secs: i64,

    /// Comma-separated allowed origins. Empty allows any origin.
    pub cors_origins: String,

    /// Max request body in bytes (default: 50MB, four photos fit)
    pub body_limit_bytes: usize,

    /// Mirror target
    pub mirror: MirrorMode,

    pub azure_client_id: Option<String>,
    pub azure_client_secret: Option<String>,
    pub azure_tenant_id: Option<String>,
    pub sharepoint_site_id: Option<String>,
    pub sharepoint_drive_id: Option<String>,

    /// Base folder inside the SharePoint drive
    pub sharepoint_folder_path: String,

    /// Root directory for the local mirror
    pub data_storage_path: PathBuf,

    /// Base folder under `data_storage_path`
    pub data_folder_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 3000,
            database_path: PathBuf::from("./data/inspect.db"),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiry_secs: 7 * 24 * 60 * 60,
            cors_origins: String::new(),
            body_limit_bytes: 50 * 1024 * 1024,
            mirror: MirrorMode::None,
            azure_client_id: None,
            azure_client_secret: None,
            azure_tenant_id: None,
            sharepoint_site_id: None,
            sharepoint_drive_id: None,
            sharepoint_folder_path: inspect_core::DEFAULT_MIRROR_FOLDER.to_string(),
            data_storage_path: PathBuf::from("./data"),
            data_folder_path: inspect_core::DEFAULT_MIRROR_FOLDER.to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from `inspect.toml` (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let settings = config::Config::builder()
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_path", defaults.database_path.display().to_string())?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiry_secs", defaults.jwt_expiry_secs)?
            .set_default("cors_origins", defaults.cors_origins)?
            .set_default("body_limit_bytes", defaults.body_limit_bytes as i64)?
            .set_default("mirror", "none")?
            .set_default("sharepoint_folder_path", defaults.sharepoint_folder_path)?
            .set_default(
                "data_storage_path",
                defaults.data_storage_path.display().to_string(),
            )?
            .set_default("data_folder_path", defaults.data_folder_path)?
            .add_source(config::File::with_name("inspect").required(false))
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let config: ApiConfig = settings.try_deserialize()?;
        config.validate()?;

        if config.jwt_secret == DEV_JWT_SECRET {
            warn!("JWT_SECRET is not set; using the development secret");
        }

        Ok(config)
    }

    /// Checks cross-field requirements.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        if self.jwt_expiry_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_EXPIRY_SECS".to_string()));
        }

        if self.mirror == MirrorMode::SharePoint {
            let required = [
                ("AZURE_CLIENT_ID", &self.azure_client_id),
                ("AZURE_CLIENT_SECRET", &self.azure_client_secret),
                ("AZURE_TENANT_ID", &self.azure_tenant_id),
                ("SHAREPOINT_SITE_ID", &self.sharepoint_site_id),
                ("SHAREPOINT_DRIVE_ID", &self.sharepoint_drive_id),
            ];
            for (key, value) in required {
                if value.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::MissingRequired(key.to_string()));
                }
            }
        }

        Ok(())
    }

    /// Parsed `cors_origins`. Empty means any origin.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 3000);
        assert_eq!(config.jwt_expiry_secs, 604_800);
        assert_eq!(config.body_limit_bytes, 52_428_800);
        assert!(config.allowed_origins().is_empty());
    }

    #[test]
    fn test_sharepoint_requires_credentials() {
        let mut config = ApiConfig {
            mirror: MirrorMode::SharePoint,
            ..ApiConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(key)) if key == "AZURE_CLIENT_ID"
        ));

        config.azure_client_id = Some("client".to_string());
        config.azure_client_secret = Some("secret".to_string());
        config.azure_tenant_id = Some("tenant".to_string());
        config.sharepoint_site_id = Some("site".to_string());
        config.sharepoint_drive_id = Some(String::new());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(key)) if key == "SHAREPOINT_DRIVE_ID"
        ));

        config.sharepoint_drive_id = Some("drive".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_allowed_origins() {
        let config = ApiConfig {
            cors_origins: "http://localhost:5173, https://inspect.example.com,".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(
            config.allowed_origins(),
            vec!["http://localhost:5173", "https://inspect.example.com"]
        );
    }

    #[test]
    fn test_mirror_mode_names() {
        let mode: MirrorMode = serde_json::from_str("\"sharepoint\"").unwrap();
        assert_eq!(mode, MirrorMode::SharePoint);
    }
}
