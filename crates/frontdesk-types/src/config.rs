//! Configuration loading for the Frontdesk assistant.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/frontdesk/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::FrontdeskError;

/// Nearest-neighbor backend used by vector stores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexBackend {
    /// Exact brute-force L2 scan (default)
    #[default]
    Flat,
    /// Approximate HNSW graph via usearch
    Hnsw,
}

impl IndexBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexBackend::Flat => "flat",
            IndexBackend::Hnsw => "hnsw",
        }
    }
}

impl std::str::FromStr for IndexBackend {
    type Err = FrontdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(IndexBackend::Flat),
            "hnsw" => Ok(IndexBackend::Hnsw),
            other => Err(FrontdeskError::InvalidInput(format!(
                "unknown index backend '{}', expected 'flat' or 'hnsw'",
                other
            ))),
        }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSettings {
    /// Embedding dimension (384 = all-MiniLM-L6-v2)
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Index backend
    #[serde(default)]
    pub backend: IndexBackend,

    /// HNSW connections per layer (M)
    #[serde(default = "default_connectivity")]
    pub connectivity: usize,

    /// HNSW build-time search depth (ef_construction)
    #[serde(default = "default_expansion_add")]
    pub expansion_add: usize,

    /// HNSW query-time search depth (ef_search)
    #[serde(default = "default_expansion_search")]
    pub expansion_search: usize,
}

fn default_dimension() -> usize {
    384
}

fn default_connectivity() -> usize {
    16
}

fn default_expansion_add() -> usize {
    200
}

fn default_expansion_search() -> usize {
    100
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            backend: IndexBackend::default(),
            connectivity: default_connectivity(),
            expansion_add: default_expansion_add(),
            expansion_search: default_expansion_search(),
        }
    }
}

impl VectorSettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.dimension == 0 {
            return Err("dimension must be > 0".to_string());
        }
        if self.connectivity == 0 {
            return Err("connectivity must be > 0".to_string());
        }
        if self.expansion_add == 0 || self.expansion_search == 0 {
            return Err("expansion_add and expansion_search must be > 0".to_string());
        }
        Ok(())
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding one sub-directory per named vector store
    #[serde(default = "default_vector_index_path")]
    pub vector_index_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Vector store configuration
    #[serde(default)]
    pub vector: VectorSettings,
}

fn default_vector_index_path() -> String {
    ProjectDirs::from("", "", "frontdesk")
        .map(|p| p.data_local_dir().join("vector-index"))
        .unwrap_or_else(|| PathBuf::from("./vector-index"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vector_index_path: default_vector_index_path(),
            log_level: default_log_level(),
            vector: VectorSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/frontdesk/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (FRONTDESK_*, nested keys joined with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, FrontdeskError> {
        let config_dir = ProjectDirs::from("", "", "frontdesk")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("vector_index_path", default_vector_index_path())
            .map_err(|e| FrontdeskError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| FrontdeskError::Config(e.to_string()))?
            .set_default("vector.dimension", default_dimension() as i64)
            .map_err(|e| FrontdeskError::Config(e.to_string()))?
            .set_default("vector.backend", IndexBackend::default().as_str())
            .map_err(|e| FrontdeskError::Config(e.to_string()))?
            .set_default("vector.connectivity", default_connectivity() as i64)
            .map_err(|e| FrontdeskError::Config(e.to_string()))?
            .set_default("vector.expansion_add", default_expansion_add() as i64)
            .map_err(|e| FrontdeskError::Config(e.to_string()))?
            .set_default("vector.expansion_search", default_expansion_search() as i64)
            .map_err(|e| FrontdeskError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // FRONTDESK_LOG_LEVEL, FRONTDESK_VECTOR__DIMENSION, ...
        builder = builder.add_source(
            Environment::with_prefix("FRONTDESK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| FrontdeskError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| FrontdeskError::Config(e.to_string()))?;

        settings.vector.validate().map_err(FrontdeskError::Config)?;
        Ok(settings)
    }

    /// Expand ~ in vector_index_path to the user's home directory
    pub fn expanded_vector_index_path(&self) -> PathBuf {
        if let Some(rest) = self.vector_index_path.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new() {
                return home.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.vector_index_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.vector.dimension, 384);
        assert_eq!(settings.vector.backend, IndexBackend::Flat);
        assert!(settings.vector_index_path.ends_with("vector-index"));
    }

    #[test]
    fn test_load_with_defaults() {
        let settings = Settings::load(None).unwrap();
        assert!(settings.vector.dimension > 0);
    }

    #[test]
    fn test_load_from_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "vector_index_path = \"/tmp/frontdesk-test\"\n\n[vector]\ndimension = 64\nbackend = \"hnsw\""
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.vector_index_path, "/tmp/frontdesk-test");
        assert_eq!(settings.vector.dimension, 64);
        assert_eq!(settings.vector.backend, IndexBackend::Hnsw);
        // Untouched keys keep their defaults
        assert_eq!(settings.vector.connectivity, 16);
    }

    #[test]
    fn test_missing_cli_config_file_fails() {
        let result = Settings::load(Some("/nonexistent/frontdesk/config.toml"));
        assert!(matches!(result, Err(FrontdeskError::Config(_))));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[vector]\ndimension = 0").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let result = Settings::load(Some(&path));
        assert!(matches!(result, Err(FrontdeskError::Config(_))));
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("FRONTDESK_VECTOR__EXPANSION_SEARCH", "321");
        let settings = Settings::load(None).unwrap();
        std::env::remove_var("FRONTDESK_VECTOR__EXPANSION_SEARCH");
        assert_eq!(settings.vector.expansion_search, 321);
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("flat".parse::<IndexBackend>().unwrap(), IndexBackend::Flat);
        assert_eq!("HNSW".parse::<IndexBackend>().unwrap(), IndexBackend::Hnsw);
        assert!(matches!(
            "annoy".parse::<IndexBackend>(),
            Err(FrontdeskError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_vector_settings_validation() {
        let mut config = VectorSettings::default();
        assert!(config.validate().is_ok());

        config.dimension = 0;
        assert!(config.validate().is_err());

        config.dimension = 8;
        config.connectivity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expanded_path_without_tilde() {
        let settings = Settings {
            vector_index_path: "/var/lib/frontdesk".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.expanded_vector_index_path(),
            PathBuf::from("/var/lib/frontdesk")
        );
    }
}
