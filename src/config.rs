use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (0 = number of CPU cores)
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/uniauth.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            cors_allowed_origins: vec!["*".to_string()],
            metrics_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HS256 signing secret for session tokens. Override in production.
    pub jwt_secret: String,

    /// Session lifetime; expiry is evaluated lazily on access.
    pub session_ttl_minutes: i64,

    /// Password-reset token lifetime.
    pub reset_ttl_minutes: i64,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism
    pub argon2_parallelism: u32,

    /// Interval for the background sweep that prunes expired sessions,
    /// expired reset tokens, and old activity rows. 0 disables the sweep;
    /// lazy expiry-on-access still applies either way.
    pub cleanup_interval_minutes: u64,

    /// Activity log rows older than this are pruned by the sweep.
    pub activity_retention_days: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            session_ttl_minutes: 30,
            reset_ttl_minutes: 15,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            cleanup_interval_minutes: 10,
            activity_retention_days: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// "seed" serves the roster below; "http" queries the enrollment service.
    pub mode: DirectoryMode,

    /// Base URL of the enrollment service (http mode).
    pub base_url: String,

    pub request_timeout_seconds: u64,

    /// Roster used in seed mode. Mirrors what the enrollment service returns.
    pub students: Vec<SeedStudent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryMode {
    Seed,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedStudent {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub status: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            mode: DirectoryMode::Seed,
            base_url: "http://localhost:4001".to_string(),
            request_timeout_seconds: 10,
            students: vec![
                SeedStudent {
                    student_id: "2024-00001".to_string(),
                    name: "Juan Dela Cruz".to_string(),
                    email: "juan@student.edu".to_string(),
                    status: "active".to_string(),
                },
                SeedStudent {
                    student_id: "2024-00002".to_string(),
                    name: "Maria Santos".to_string(),
                    email: "maria@student.edu".to_string(),
                    status: "active".to_string(),
                },
                SeedStudent {
                    student_id: "2024-00003".to_string(),
                    name: "Pedro Reyes".to_string(),
                    email: "pedro@student.edu".to_string(),
                    status: "inactive".to_string(),
                },
                SeedStudent {
                    student_id: "2024-00004".to_string(),
                    name: "Ana Garcia".to_string(),
                    email: "ana@student.edu".to_string(),
                    status: "active".to_string(),
                },
            ],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("uniauth").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".uniauth").join("config.toml"));
        }

        paths
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from("config.toml");
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.jwt_secret.is_empty() {
            anyhow::bail!("security.jwt_secret cannot be empty");
        }

        if self.security.session_ttl_minutes <= 0 {
            anyhow::bail!("security.session_ttl_minutes must be > 0");
        }

        if self.security.reset_ttl_minutes <= 0 {
            anyhow::bail!("security.reset_ttl_minutes must be > 0");
        }

        if self.directory.mode == DirectoryMode::Http && self.directory.base_url.is_empty() {
            anyhow::bail!("directory.base_url cannot be empty in http mode");
        }

        Ok(())
    }
}
