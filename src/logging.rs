use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
pub struct LogGuard(tracing_appender::non_blocking::WorkerGuard);

/// Initialize debug logging.
///
/// When `debug` is enabled, logs are appended to
/// `~/.config/serper-hub/serper-hub-debug.log` (or `debug_log_path`).
/// When `debug` is disabled, this is a no-op.
pub fn init(config: &crate::config::Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let log_path = match config.debug_log_path.as_deref() {
        Some(raw) => PathBuf::from(expand_tilde(raw)),
        None => default_log_path()?,
    };

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    // Default: debug our crate, warn for everything else.
    let filter =
        EnvFilter::try_new("serper_hub=debug,warn").unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // If already initialized (e.g., in tests), don't crash.

    tracing::info!(log_file = %log_path.display(), "debug logging enabled");

    Ok(Some(LogGuard(guard)))
}

fn default_log_path() -> Result<PathBuf> {
    let config_path = crate::config::config_path()?;
    Ok(config_path.with_file_name("serper-hub-debug.log"))
}

fn expand_tilde(raw: &str) -> String {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let suffix = raw.strip_prefix('~').unwrap_or("");
            return format!("{}{}", home.display(), suffix);
        }
    }
    raw.to_string()
}

/// Best-effort redaction of the configured API key in provider-supplied
/// text before it reaches a log line. The key itself is never logged.
pub fn redact_credential(input: &str, api_key: &str) -> String {
    // Require a minimum length to avoid shredding ordinary words.
    if api_key.len() < 8 {
        return input.to_string();
    }
    input.replace(api_key, "***REDACTED***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_key_occurrences() {
        let key = "8fe8ee3a04b802df8239";
        let body = format!("{{\"message\":\"key {key} rejected\"}}");
        let redacted = redact_credential(&body, key);
        assert!(!redacted.contains(key));
        assert!(redacted.contains("***REDACTED***"));
    }

    #[test]
    fn short_keys_are_left_alone() {
        assert_eq!(redact_credential("the word the", "the"), "the word the");
    }
}
