use std::fs;
use std::path::{Path, PathBuf};

use super::{ConfigError, SiteRateConfig};

pub const CONFIG_FILE_NAME: &str = ".siterate.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Parse and validate config contents. `origin` only labels errors.
pub(crate) fn parse_config(contents: &str, origin: &str) -> Result<SiteRateConfig, ConfigError> {
    let config = toml::from_str::<SiteRateConfig>(contents).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly named config file. Unlike discovery, every failure is an error.
pub fn load_config_from(path: &Path) -> Result<SiteRateConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = parse_config(&contents, &path.display().to_string())?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<SiteRateConfig> {
    match load_config_from(config_path) {
        Ok(config) => Some(config),
        Err(ConfigError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            None
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// The directory itself followed by its parents, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find `.siterate.toml` in the working directory or one of its ancestors.
pub fn load_config() -> SiteRateConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return SiteRateConfig::default();
        }
    };
    discover_config(current)
}

pub(crate) fn discover_config(start: PathBuf) -> SiteRateConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| config_path_in(&dir))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No {} found after checking {} directories. Using default config.",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            SiteRateConfig::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b"),
            ]
        );
    }

    #[test]
    fn test_discovers_config_in_parent_directory() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("sites").join("batch");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            config_path_in(root.path()),
            "default_charset = \"utf-8\"\n",
        )
        .unwrap();

        let config = discover_config(nested);
        assert_eq!(config.default_charset, "utf-8");
    }

    #[test]
    fn test_invalid_discovered_config_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        fs::write(config_path_in(root.path()), "similarity_threshold = 7.0\n").unwrap();

        let config = discover_config(root.path().to_path_buf());
        assert_eq!(config, SiteRateConfig::default());
    }

    #[test]
    fn test_explicit_path_reports_parse_errors() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("broken.toml");
        fs::write(&path, "user_agent = [").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_explicit_missing_path_is_read_error() {
        let root = TempDir::new().unwrap();
        let err = load_config_from(&root.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
