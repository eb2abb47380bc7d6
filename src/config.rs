use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub uploads: UploadConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Emit logs as JSON lines instead of the human readable format
    pub log_json: bool,

    /// Tokio worker threads; 0 lets the runtime pick one per core
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/complaint-desk.db".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,

    pub port: u16,

    /// Sets the `Secure` flag on the session cookie. Turn off only when
    /// serving plain HTTP locally.
    pub secure_cookies: bool,

    /// Sessions expire after this many minutes without a request
    pub session_inactivity_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            secure_cookies: true,
            session_inactivity_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded profile photos are written to and served from
    pub photo_dir: String,

    pub max_photo_bytes: usize,

    /// Whether the orphaned photo sweep runs while serving
    pub sweep_enabled: bool,

    /// Six-field cron expression for the orphaned photo sweep
    pub orphan_sweep_cron: String,

    /// Unreferenced files younger than this are left alone so an
    /// in-flight registration never loses its photo.
    pub orphan_grace_minutes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            photo_dir: "data/user_profile".to_string(),
            max_photo_bytes: 5 * 1024 * 1024,
            sweep_enabled: true,
            orphan_sweep_cron: "0 15 * * * *".to_string(),
            orphan_grace_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2id memory cost in KiB
    pub argon2_memory_cost_kib: u32,

    /// Passes over memory
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 19456,
            argon2_time_cost: 2,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "complaint-desk".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "complaint-desk";

impl Config {
    /// Loads the first config file found in the search path, falling back
    /// to defaults when none exists.
    pub fn load() -> Result<Self> {
        match Self::config_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                info!("Loading config from: {}", path.display());
                Self::load_from_path(&path)
            }
            None => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// `./config.toml`, then the platform config dir, then `~/.complaint-desk`.
    fn config_paths() -> Vec<PathBuf> {
        let platform = dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE));
        let home = dirs::home_dir().map(|d| d.join(format!(".{APP_DIR}")).join(CONFIG_FILE));

        std::iter::once(PathBuf::from(CONFIG_FILE))
            .chain(platform)
            .chain(home)
            .collect()
    }

    /// Writes a default `./config.toml`. Returns `false` if one already exists.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            return Ok(false);
        }

        Self::default().save_to_path(path)?;
        Ok(true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.server.session_inactivity_minutes <= 0 {
            anyhow::bail!("Session inactivity timeout must be > 0 minutes");
        }

        if self.uploads.photo_dir.trim().is_empty() {
            anyhow::bail!("Photo upload directory cannot be empty");
        }

        if self.uploads.max_photo_bytes == 0 {
            anyhow::bail!("Maximum photo size must be > 0");
        }

        argon2::Params::new(
            self.security.argon2_memory_cost_kib,
            self.security.argon2_time_cost,
            self.security.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        Ok(())
    }
}
