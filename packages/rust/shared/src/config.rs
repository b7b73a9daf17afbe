//! Application configuration for notedown.
//!
//! User config lives at `~/.notedown/notedown.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{NotedownError, Result};
use crate::types::CodeLanguage;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "notedown.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".notedown";

// ---------------------------------------------------------------------------
// Config structs (matching notedown.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default input notes file.
    #[serde(default = "default_input")]
    pub input: String,

    /// Default output Markdown file for flat note arrays.
    #[serde(default = "default_output")]
    pub output: String,

    /// Course language selecting the code-fence hint: `"js"` or `"css"`.
    #[serde(default = "default_course")]
    pub course: String,

    /// Base URL the course page link is built from.
    #[serde(default = "default_course_url_base")]
    pub course_url_base: String,

    /// Whether grouped exports keep timestamp footnote links.
    #[serde(default = "default_true")]
    pub time_links: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            course: default_course(),
            course_url_base: default_course_url_base(),
            time_links: default_true(),
        }
    }
}

fn default_input() -> String {
    "./sources/notes.json".into()
}
fn default_output() -> String {
    "./dist/notes.md".into()
}
fn default_course() -> String {
    "js".into()
}
fn default_course_url_base() -> String {
    "https://courses.joshwcomeau.com".into()
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Render config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime rendering configuration — merged from config file + CLI flags
/// and threaded explicitly through the composer and converter.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Code-fence language hint for converted `<pre>` blocks.
    pub code_language: CodeLanguage,
    /// Base URL the course page link is built from.
    pub course_url_base: Url,
    /// Whether grouped exports keep timestamp footnote links.
    pub time_links: bool,
}

impl TryFrom<&AppConfig> for RenderConfig {
    type Error = NotedownError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let base = Url::parse(&config.defaults.course_url_base).map_err(|e| {
            NotedownError::config(format!(
                "invalid course_url_base '{}': {e}",
                config.defaults.course_url_base
            ))
        })?;

        Ok(Self {
            code_language: CodeLanguage::from_course(&config.defaults.course),
            course_url_base: base,
            time_links: config.defaults.time_links,
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.notedown/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| NotedownError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.notedown/notedown.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| NotedownError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| NotedownError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| NotedownError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| NotedownError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| NotedownError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("input"));
        assert!(toml_str.contains("courses.joshwcomeau.com"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.input, "./sources/notes.json");
        assert_eq!(parsed.defaults.output, "./dist/notes.md");
        assert!(parsed.defaults.time_links);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
course = "css"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.course, "css");
        assert_eq!(config.defaults.output, "./dist/notes.md");
    }

    #[test]
    fn render_config_from_app_config() {
        let app = AppConfig::default();
        let render = RenderConfig::try_from(&app).expect("render config");
        assert_eq!(render.code_language, CodeLanguage::Jsx);
        assert_eq!(render.course_url_base.as_str(), "https://courses.joshwcomeau.com/");
        assert!(render.time_links);
    }

    #[test]
    fn render_config_rejects_bad_base_url() {
        let mut app = AppConfig::default();
        app.defaults.course_url_base = "not a url".into();
        let result = RenderConfig::try_from(&app);
        assert!(result.is_err());
    }
}
