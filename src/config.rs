use std::path::{Path, PathBuf};

use facet::Facet;

use crate::error::PlaceError;
use crate::paths;

/// External tools and how they are invoked.
#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct ToolConfig {
    /// Privilege-elevation program prefixed to every tool invocation.
    /// Empty runs the tools directly.
    #[facet(default = "sudo")]
    pub elevate: String,
    #[facet(default = "virsh")]
    pub virsh: String,
    #[facet(default = "virt-copy-in")]
    pub copy_in: String,
    /// Passed to both tools as `-c <uri>` when non-empty.
    #[facet(default)]
    pub libvirt_uri: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            elevate: "sudo".into(),
            virsh: "virsh".into(),
            copy_in: "virt-copy-in".into(),
            libvirt_uri: String::new(),
        }
    }
}

impl ToolConfig {
    /// The elevation program, if one is configured.
    pub fn elevation(&self) -> Option<&str> {
        let elevate = self.elevate.trim();
        (!elevate.is_empty()).then_some(elevate)
    }

    /// `-c <uri>` connection arguments shared by both tools.
    pub fn connect_args(&self) -> Vec<String> {
        if self.libvirt_uri.is_empty() {
            Vec::new()
        } else {
            vec!["-c".into(), self.libvirt_uri.clone()]
        }
    }
}

fn validate_config(config: &ToolConfig) -> Result<(), PlaceError> {
    if config.virsh.trim().is_empty() {
        return Err(PlaceError::Validation {
            message: "virsh must not be empty".into(),
        });
    }
    if config.copy_in.trim().is_empty() {
        return Err(PlaceError::Validation {
            message: "copy_in must not be empty".into(),
        });
    }
    Ok(())
}

/// Parse and validate config file contents.
pub fn parse_config(path: &Path, contents: &str) -> Result<ToolConfig, PlaceError> {
    let config: ToolConfig = facet_toml::from_str(contents).map_err(|e| PlaceError::ConfigParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

fn load_file(path: &Path) -> Result<ToolConfig, PlaceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PlaceError::ConfigLoad {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(path, &contents)
}

/// Resolve the tool config.
///
/// An explicit path must exist. Without one, the per-user config file is
/// used when present and the built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<ToolConfig, PlaceError> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => match paths::default_config_path() {
            Some(path) if path.is_file() => path,
            _ => {
                tracing::debug!("no config file, using defaults");
                return Ok(ToolConfig::default());
            }
        },
    };

    let config = load_file(&path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
