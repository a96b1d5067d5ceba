use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory name used under the platform configuration directory.
pub const APP_DIR_NAME: &str = "regdesk";

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// `~/.config/regdesk` on most platforms, falling back to `./regdesk`.
pub fn regdesk_config_dir() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

/// Resolve a path from an environment override, or a file inside the config directory.
pub fn path_from_env_or_config_dir(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = std::env::var(env_var)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }
    regdesk_config_dir().join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_over_config_dir() {
        temp_env::with_var("REGDESK_TEST_PATH", Some("/tmp/regdesk/custom.json"), || {
            let path = path_from_env_or_config_dir("REGDESK_TEST_PATH", "default.json");
            assert_eq!(path, PathBuf::from("/tmp/regdesk/custom.json"));
        });
    }

    #[test]
    fn blank_override_falls_back_to_config_dir() {
        temp_env::with_var("REGDESK_TEST_PATH", Some("   "), || {
            let path = path_from_env_or_config_dir("REGDESK_TEST_PATH", "default.json");
            assert!(path.ends_with("regdesk/default.json"));
        });
    }
}
