//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file at the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// Main site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Dates without an offset are read in this zone
    pub timezone: String,

    // Writing
    pub new_post_name: String,
    pub default_collection: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "src/content".to_string(),
            public_dir: "public".to_string(),

            timezone: "UTC".to_string(),

            new_post_name: ":title.md".to_string(),
            default_collection: "blog".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.timezone()?;
        Ok(config)
    }

    /// Load `_config.yml` from the site root, or defaults if there is none
    pub fn load_or_default<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parsed timezone; an empty string means UTC
    pub fn timezone(&self) -> Result<Tz> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(Tz::UTC);
        }
        name.parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone `{}`: {}", name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "src/content");
        assert_eq!(config.default_collection, "blog");
        assert_eq!(config.timezone().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
content_dir: content
timezone: Europe/London
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::London);
    }

    #[test]
    fn test_invalid_timezone_fails_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "timezone: Mars/Olympus\n").unwrap();
        assert!(SiteConfig::load_or_default(dir.path()).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(SiteConfig::load_or_default(dir.path()).unwrap(), SiteConfig::default());
    }
}
