//! Locating and reading `cellgraph.toml`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use cellgraph_core::SheetConfig;

const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;
const CONFIG_FILE_NAME: &str = "cellgraph.toml";

/// Load configuration from `path`, or from the user config dir when `None`.
///
/// Problems never abort: the defaults are returned along with a warning for
/// each thing that went wrong, for the host to show.
pub fn load_config(path: Option<&Path>) -> (SheetConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = path.map(Path::to_path_buf).or_else(user_config_path) else {
        return (SheetConfig::default(), warnings);
    };
    if !path.exists() {
        return (SheetConfig::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match SheetConfig::from_toml_str(&content) {
                Ok(config) => Some(config),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to stat {}: {}", path.display(), err));
            None
        }
    };

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    (config.unwrap_or_default(), warnings)
}

/// `cellgraph.toml` inside the platform config directory.
pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellgraph")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push(CONFIG_FILE_NAME);
    Some(path)
}
