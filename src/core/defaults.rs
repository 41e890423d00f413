use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::paths;

/// Root configuration structure for repackage.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepackageConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Source-tree conventions that can be overridden via repackage.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// File extensions (without the dot) treated as namespace-declaring source.
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Source directories, relative to the project root.
    #[serde(default = "default_source_dirs")]
    pub source_dirs: Vec<String>,

    /// Descriptor files whose quoted attributes carry the namespace.
    #[serde(default = "default_descriptors")]
    pub descriptors: Vec<DescriptorConfig>,

    /// Globs (relative to a source dir) the reference rewriter never touches.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            source_extensions: default_source_extensions(),
            source_dirs: default_source_dirs(),
            descriptors: default_descriptors(),
            exclude: default_exclude(),
        }
    }
}

impl Defaults {
    /// Reject configurations the package engine cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.source_extensions.is_empty() {
            return Err(crate::Error::config_invalid_value(
                "defaults.source_extensions",
                None,
                "At least one source extension is required",
            ));
        }

        if let Some(ext) = self
            .source_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(crate::Error::config_invalid_value(
                "defaults.source_extensions",
                Some(ext.clone()),
                "Extensions are written without a leading dot",
            ));
        }

        if let Some(descriptor) = self.descriptors.iter().find(|d| d.attributes.is_empty()) {
            return Err(crate::Error::config_invalid_value(
                "defaults.descriptors",
                Some(descriptor.file.clone()),
                "Descriptor entries need at least one attribute",
            ));
        }

        Ok(())
    }
}

/// A descriptor file and the attribute keys to rewrite in it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptorConfig {
    /// Path relative to the project root.
    pub file: String,
    pub attributes: Vec<String>,
}

fn default_source_extensions() -> Vec<String> {
    vec!["java".to_string(), "kt".to_string()]
}

fn default_source_dirs() -> Vec<String> {
    ["main", "test", "androidTest"]
        .iter()
        .flat_map(|set| {
            [
                format!("src/{}/java", set),
                format!("src/{}/kotlin", set),
            ]
        })
        .collect()
}

fn default_descriptors() -> Vec<DescriptorConfig> {
    vec![
        DescriptorConfig {
            file: "build.gradle".to_string(),
            attributes: vec!["applicationId".to_string(), "namespace".to_string()],
        },
        DescriptorConfig {
            file: "build.gradle.kts".to_string(),
            attributes: vec!["applicationId".to_string(), "namespace".to_string()],
        },
        DescriptorConfig {
            file: "src/main/AndroidManifest.xml".to_string(),
            attributes: vec!["package".to_string()],
        },
    ]
}

fn default_exclude() -> Vec<String> {
    vec!["**/build/**".to_string(), "**/.gradle/**".to_string()]
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If repackage.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full repackage.json config, falling back to defaults on any error.
pub fn load_config() -> RepackageConfig {
    load_config_from_file().unwrap_or_default()
}

/// Attempt to load config from the global repackage.json file.
fn load_config_from_file() -> crate::Result<RepackageConfig> {
    let path = paths::repackage_json()?;

    if !path.exists() {
        return Err(crate::Error::other("repackage.json not found"));
    }

    load_config_from(&path)
}

/// Load config from an explicit file. Unlike [`load_config`], errors are
/// reported: a file the user pointed at must exist and parse.
pub fn load_config_from(path: &Path) -> crate::Result<RepackageConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))
}

/// Check if repackage.json file exists
pub fn config_exists() -> bool {
    paths::repackage_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Get the path to repackage.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::repackage_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
