use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Serper.dev API key
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Default two-letter country code (gl)
    #[serde(default = "default_gl")]
    pub gl: String,

    /// Default two-letter language code (hl)
    #[serde(default = "default_hl")]
    pub hl: String,

    /// Default location; "Auto" lets the provider choose
    #[serde(default = "default_location")]
    pub location: String,

    /// Default maximum result count (clamped to 10-100 at request time)
    #[serde(default = "default_num")]
    pub num: u32,

    /// Enable debug logging to file
    #[serde(default)]
    pub debug: bool,

    /// Optional debug log file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            gl: default_gl(),
            hl: default_hl(),
            location: default_location(),
            num: default_num(),
            debug: false,
            debug_log_path: None,
        }
    }
}

impl Config {
    /// Whether the key field still holds the placeholder.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != default_api_key()
    }
}

fn default_api_key() -> String {
    "YOUR_API_KEY_HERE".to_string()
}

fn default_gl() -> String {
    "us".to_string()
}

fn default_hl() -> String {
    "en".to_string()
}

fn default_location() -> String {
    crate::search::AUTO_LOCATION.to_string()
}

fn default_num() -> u32 {
    20
}
