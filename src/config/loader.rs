//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ControlPlaneConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ControlPlaneConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ControlPlaneConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Path::new("/nonexistent/control-plane.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_valid_file() {
        let path = std::env::temp_dir().join(format!("cp-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
            [source]
            path = "/etc/routes.json"
            watch = false

            [reconcile]
            interval_secs = 1
            cluster_name_prefix = "test-cluster"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.source.path, "/etc/routes.json");
        assert!(!config.source.watch);
        assert_eq!(config.reconcile.cluster_name_prefix, "test-cluster");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = std::env::temp_dir().join(format!("cp-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
            [reconcile]
            interval_secs = 0
            "#,
        )
        .unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(errors)) if errors.len() == 1
        ));

        let _ = fs::remove_file(&path);
    }
}
