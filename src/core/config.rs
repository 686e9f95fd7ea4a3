use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use uuid::Uuid;

use crate::models::schedule::ClassSchedule;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub kiosk: KioskConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub classes: Vec<ClassSchedule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub unix_socket: Option<PathBuf>,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub data_endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[allow(dead_code)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_console")]
    pub console: bool,
}

/// The embedded kiosk loop: which zones its entrada/salida buttons point
/// at, and how long a scan result stays on screen.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct KioskConfig {
    #[serde(default)]
    pub enabled: bool,
    pub entry_zone: Option<Uuid>,
    pub exit_zone: Option<Uuid>,
    #[serde(default = "default_display_clear_secs")]
    pub display_clear_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// Base URL for credential photos; unset means image resolution
    /// degrades to "no image".
    pub public_base_url: Option<String>,
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_max_connections() -> usize {
    10000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

fn default_display_clear_secs() -> u64 {
    4
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port.is_none() && self.server.unix_socket.is_none() {
            bail!("Either port or unix_socket must be specified in server config");
        }

        if let Some(port) = self.server.port {
            if port == 0 {
                bail!("Server port must be greater than 0");
            }
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if self.server.max_connections == 0 {
            bail!("max_connections must be greater than 0");
        }

        if self.sync.data_endpoint.is_empty() {
            bail!("data_endpoint must not be empty");
        }

        if self.sync.api_key.is_empty() {
            bail!("api_key must not be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        if self.kiosk.enabled {
            if self.kiosk.entry_zone.is_none() {
                bail!("kiosk.entry_zone is required when the kiosk is enabled");
            }
            if self.kiosk.exit_zone.is_none() {
                bail!("kiosk.exit_zone is required when the kiosk is enabled");
            }
        }

        // The display must clear quickly enough for the next person in
        // line but stay long enough to be read.
        if !(3..=5).contains(&self.kiosk.display_clear_secs) {
            bail!(
                "kiosk.display_clear_secs must be between 3 and 5, got {}",
                self.kiosk.display_clear_secs
            );
        }

        let mut seen_ids = HashSet::new();
        for class in &self.classes {
            if class.start_hour >= 24 {
                bail!(
                    "Class '{}' has invalid start_hour {}",
                    class.nombre,
                    class.start_hour
                );
            }
            if class.start_minute >= 60 {
                bail!(
                    "Class '{}' has invalid start_minute {}",
                    class.nombre,
                    class.start_minute
                );
            }
            if class.weekday >= 7 {
                bail!(
                    "Class '{}' has invalid weekday {} (expected 0=domingo..6=sábado)",
                    class.nombre,
                    class.weekday
                );
            }
            if !seen_ids.insert(class.id) {
                bail!("Duplicate class id {} in [[classes]]", class.id);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server: ServerConfig {
                port: Some(3000),
                unix_socket: None,
                num_threads: 4,
                max_connections: 1000,
            },
            sync: SyncConfig {
                data_endpoint: "http://localhost:8000/api/kiosk/data".to_string(),
                api_key: "test-api-key".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "console".to_string(),
                path: None,
                console: true,
            },
            kiosk: KioskConfig {
                enabled: false,
                entry_zone: None,
                exit_zone: None,
                display_clear_secs: 4,
            },
            storage: StorageConfig::default(),
            classes: vec![],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_requires_some_listener() {
        let mut config = base_config();
        config.server.port = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_kiosk_enabled_requires_zones() {
        let mut config = base_config();
        config.kiosk.enabled = true;
        assert!(config.validate().is_err());

        config.kiosk.entry_zone = Some(Uuid::new_v4());
        config.kiosk.exit_zone = Some(Uuid::new_v4());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_display_clear_bounds() {
        let mut config = base_config();
        config.kiosk.display_clear_secs = 2;
        assert!(config.validate().is_err());
        config.kiosk.display_clear_secs = 5;
        assert!(config.validate().is_ok());
        config.kiosk.display_clear_secs = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_class_schedule() {
        let mut config = base_config();
        config.classes.push(ClassSchedule {
            id: Uuid::new_v4(),
            nombre: "Aula 1".to_string(),
            grupo: Some("IDGS15".to_string()),
            start_hour: 25,
            start_minute: 0,
            weekday: 1,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_class_ids() {
        let mut config = base_config();
        let id = Uuid::new_v4();
        for _ in 0..2 {
            config.classes.push(ClassSchedule {
                id,
                nombre: "Aula 1".to_string(),
                grupo: None,
                start_hour: 18,
                start_minute: 0,
                weekday: 1,
            });
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_from_toml() {
        let raw = r#"
            [server]
            port = 3000

            [sync]
            data_endpoint = "http://localhost:8000/api/kiosk/data"
            api_key = "secret"

            [logging]
            level = "debug"
            format = "console"

            [kiosk]
            enabled = true
            entry_zone = "b8f5178d-6864-4865-ab43-295fe5dca7c6"
            exit_zone = "3f71b6a1-41ce-4f3d-9bb3-0e6f2a7c55aa"

            [[classes]]
            id = "d9a94c99-aa9e-45d1-a30f-7f17483639e0"
            nombre = "Aula 1 - Lunes 6:00 pm"
            grupo = "IDGS15"
            start_hour = 18
            start_minute = 0
            weekday = 1
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.classes.len(), 1);
        assert_eq!(config.kiosk.display_clear_secs, 4);
        assert_eq!(config.classes[0].grupo.as_deref(), Some("IDGS15"));
    }
}
