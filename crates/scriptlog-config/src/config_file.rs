use std::path::Path;

use crate::paths;

pub const CONFIG_FILE: &str = ".scriptlog.toml";

/// Load config file content from CWD first, then the config directory
///
/// Searches for the configuration in:
/// 1. Current working directory as .scriptlog.toml
/// 2. The platform config directory as scriptlog/config.toml
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    if let Some(content) = read_config(Path::new(CONFIG_FILE)) {
        return Some(content);
    }

    paths::global_config_path().and_then(|path| read_config(&path))
}

fn read_config(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(content)
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_config() {
        assert!(read_config(Path::new("does-not-exist/.scriptlog.toml")).is_none());
    }

    #[test]
    fn test_read_existing_config() {
        let path = std::env::temp_dir().join(format!("scriptlog-test-{}.toml", std::process::id()));
        std::fs::write(&path, "print_mode = \"NONE\"").unwrap();
        assert_eq!(read_config(&path).as_deref(), Some("print_mode = \"NONE\""));
        std::fs::remove_file(&path).unwrap();
    }
}
