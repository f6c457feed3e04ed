//! Configuration lookup: `--config`, then `REFNORM_CONFIG`, then the XDG
//! config file, then built-in defaults.

use anyhow::{Context, Result};
use refnorm_canonical::{NormalizeConfig, Normalizer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "REFNORM_CONFIG";

/// Picks the config file to load, if any.
pub fn resolve_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(Some(PathBuf::from(path)));
    }
    xdg_config_file()
}

#[cfg(unix)]
fn xdg_config_file() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("refnorm")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

#[cfg(not(unix))]
fn xdg_config_file() -> Result<Option<PathBuf>> {
    Ok(None)
}

/// Load configuration from `path`; missing keys take their defaults.
pub fn load_from(path: &Path) -> Result<NormalizeConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: NormalizeConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    info!("loaded config from {}", path.display());
    Ok(cfg)
}

/// Resolve, load and validate configuration into a normalizer.
pub fn load_normalizer(explicit: Option<&Path>) -> Result<Normalizer> {
    let cfg = match resolve_path(explicit)? {
        Some(path) => load_from(&path)?,
        None => {
            debug!("no config file; using built-in defaults");
            NormalizeConfig::default()
        }
    };
    Normalizer::new(cfg).context("invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/refnorm-explicit.toml");
        assert_eq!(resolve_path(Some(path)).unwrap(), Some(path.to_path_buf()));
    }

    #[test]
    fn loads_partial_config() {
        let file = write_config(
            r#"
                default_domain = "registry.internal:5000"
                default_namespace = ""
            "#,
        );
        let cfg = load_from(file.path()).unwrap();
        assert_eq!(cfg.default_domain, "registry.internal:5000");
        assert_eq!(cfg.namespace(), None);
        assert!(cfg.legacy_domains().is_empty());
    }

    #[test]
    fn normalizer_uses_loaded_defaults() {
        let file = write_config(r#"default_domain = "registry.internal:5000""#);
        let normalizer = load_normalizer(Some(file.path())).unwrap();
        assert_eq!(
            normalizer.canonicalize("app").unwrap(),
            "registry.internal:5000/library/app"
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        let file = write_config(r#"default_domain = "-bad""#);
        let err = load_normalizer(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("default_domain '-bad'"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let file = write_config("default_domain = ");
        let err = load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_from(Path::new("/nonexistent/refnorm/config.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
