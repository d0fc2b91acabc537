use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    pub store: Option<StoreConfig>,
    pub permissions: Option<PermissionsConfig>,
    pub database: Option<DatabaseConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:8081".to_string()],
            }),
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            store: Some(StoreConfig::default()),
            permissions: Some(PermissionsConfig::default()),
            database: Some(DatabaseConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// List loading limits shared by every list endpoint
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct StoreConfig {
    pub page_size: usize,
    pub load_timeout_secs: u64,
    /// Rows loaded into a list store before filtering and paging
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,
}

fn default_scan_limit() -> usize {
    1000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: leadzen_core::source::DEFAULT_PAGE_SIZE,
            load_timeout_secs: leadzen_core::store::DEFAULT_LOAD_TIMEOUT.as_secs(),
            scan_limit: default_scan_limit(),
        }
    }
}

impl StoreConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

/// Gate tuning handed to mobile clients
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct PermissionsConfig {
    pub freshness_window_secs: u64,
    pub check_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: leadzen_core::permissions::DEFAULT_FRESHNESS.as_secs(),
            check_timeout_secs: leadzen_core::permissions::DEFAULT_CHECK_TIMEOUT.as_secs(),
            request_timeout_secs: leadzen_core::permissions::DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Insert demo leads, contacts and calls into an empty database
    #[serde(default)]
    pub seed_demo_data: bool,
}

const DEFAULT_CONFIG: &str = r#"
[cors]
allowed_origins = ["http://localhost:8081"]

[server]
host = "127.0.0.1"
port = 8080

[store]
page_size = 100
load_timeout_secs = 10
scan_limit = 1000

[permissions]
freshness_window_secs = 5
check_timeout_secs = 15
request_timeout_secs = 120

[database]
seed_demo_data = false
"#;

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        Self::load_from(&get_config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<(Self, PathBuf), ConfigError> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            std::fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path.to_path_buf()))
    }

    pub fn store(&self) -> StoreConfig {
        self.store.unwrap_or_default()
    }

    pub fn permissions(&self) -> PermissionsConfig {
        self.permissions.unwrap_or_default()
    }

    pub fn seed_demo_data(&self) -> bool {
        self.database.as_ref().is_some_and(|d| d.seed_demo_data)
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("leadzen").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
