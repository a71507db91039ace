use markdown_cmark_engine::{Options, parse_document, render_html, render_man, render_xml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Output format used by [`Config::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Xml,
    Man,
}

/// Default render options; each flag maps onto an engine [`Options`] bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub sourcepos: bool,
    pub hardbreaks: bool,
    pub normalize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub format: OutputFormat,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-cmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Engine options for the configured render flags.
    pub fn options(&self) -> Options {
        let mut options = Options::DEFAULT;
        if self.render.sourcepos {
            options |= Options::SOURCEPOS;
        }
        if self.render.hardbreaks {
            options |= Options::HARDBREAKS;
        }
        if self.render.normalize {
            options |= Options::NORMALIZE;
        }
        options
    }

    /// Parses `md` and renders it in the configured format.
    pub fn render(&self, md: &str) -> String {
        let options = self.options();
        let tree = parse_document(md, options);
        match self.format {
            OutputFormat::Html => render_html(&tree, tree.root(), options),
            OutputFormat::Xml => render_xml(&tree, tree.root(), options),
            OutputFormat::Man => render_man(&tree, tree.root(), options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markdown-cmark/config.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            render: RenderConfig {
                sourcepos: true,
                hardbreaks: false,
                normalize: true,
            },
            format: OutputFormat::Man,
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("format = \"xml\"\n").unwrap();
        assert_eq!(config.format, OutputFormat::Xml);
        assert_eq!(config.render, RenderConfig::default());

        let config: Config = toml::from_str("[render]\nhardbreaks = true\n").unwrap();
        assert_eq!(config.format, OutputFormat::Html);
        assert!(config.render.hardbreaks);
        assert!(!config.render.sourcepos);
    }

    #[test]
    fn test_unknown_format_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "format = \"pdf\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_options_mapping() {
        let mut config = Config::default();
        assert_eq!(config.options(), Options::DEFAULT);

        config.render.sourcepos = true;
        config.render.normalize = true;
        assert_eq!(config.options(), Options::SOURCEPOS | Options::NORMALIZE);
        assert_eq!(config.options().bits(), 5);
    }

    #[test]
    fn test_render_uses_configured_format() {
        let mut config = Config::default();
        assert_eq!(config.render("Boo\n==="), "<h1>Boo</h1>\n");

        config.format = OutputFormat::Man;
        assert_eq!(config.render("Boo\n==="), ".SH\nBoo\n");

        config.format = OutputFormat::Xml;
        config.render.sourcepos = true;
        let xml = config.render("Boo\n===");
        assert!(xml.contains(r#"<header sourcepos="1:1-2:3" level="1">"#), "{xml}");
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            render: RenderConfig {
                hardbreaks: true,
                ..RenderConfig::default()
            },
            format: OutputFormat::Xml,
        };

        test_config.save_to_path(&config_file).unwrap();
        assert!(config_file.exists(), "Config file should exist");

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded_config, test_config);
    }
}
