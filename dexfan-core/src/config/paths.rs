//! Default path resolution for the configuration file
//!
//! Uses XDG Base Directory specification when available, with sensible fallbacks.

use std::path::PathBuf;

/// Returns the default path for the plugin configuration file.
///
/// Uses the platform config directory if available:
/// - Linux: `~/.config/dexfan/plugin.toml`
/// - Windows: `%APPDATA%\dexfan\plugin.toml`
/// - Fallback: `./dexfan/plugin.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dexfan")
        .join("plugin.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_is_toml() {
        let path = default_config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        assert!(path.ends_with("dexfan/plugin.toml"));
    }
}
