//! Generation config validation.
//!
//! Every `.ron` file in a directory must parse into
//! [`GenerationParams`] and pass its validation. Keys that are not
//! parameter names are reported as warnings, since serde would otherwise
//! silently fall back to defaults for a misspelled key.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ron::Value;
use terrain_core::config::GenerationParams;
use terrain_core::error::TerrainError;
use thiserror::Error;

/// Errors that stop validation of a whole directory.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The directory does not exist or is not a directory.
    #[error("Config directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Reading the directory failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The directory has no `.ron` files.
    #[error("No .ron config files in {0}")]
    Empty(PathBuf),

    /// One or more files failed validation.
    #[error("{failed} of {total} config files are invalid")]
    Invalid {
        /// Files that failed.
        failed: usize,
        /// Files checked.
        total: usize,
    },

    /// Building the list of known keys failed.
    #[error("Failed to enumerate parameter names: {0}")]
    Schema(String),
}

/// Outcome for one config file.
#[derive(Debug)]
pub struct FileReport {
    /// File that was checked.
    pub path: PathBuf,
    /// Parse or validation error, if any.
    pub error: Option<TerrainError>,
    /// Top-level keys that are not parameter names.
    pub unknown_keys: Vec<String>,
}

impl FileReport {
    /// Whether the file parsed and validated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome for a whole directory.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Per-file results, sorted by path.
    pub files: Vec<FileReport>,
}

impl ValidationReport {
    /// Files that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.is_valid())
    }

    /// Total unknown keys across all files.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.unknown_keys.len()).sum()
    }
}

/// Top-level keys [`GenerationParams`] understands.
pub fn known_keys() -> Result<BTreeSet<String>, ValidationError> {
    let ron = GenerationParams::default()
        .to_ron_string()
        .map_err(|e| ValidationError::Schema(e.to_string()))?;
    let value: Value = ron::from_str(&ron).map_err(|e| ValidationError::Schema(e.to_string()))?;
    Ok(top_level_keys(&value).into_iter().collect())
}

fn top_level_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Map(map) => map
            .keys()
            .filter_map(|k| match k {
                Value::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Validate a single config source.
#[must_use]
pub fn validate_config_str(path: &Path, contents: &str, known: &BTreeSet<String>) -> FileReport {
    let error = GenerationParams::from_ron_str(contents).err();
    let unknown_keys = ron::from_str::<Value>(contents)
        .map(|value| {
            top_level_keys(&value)
                .into_iter()
                .filter(|k| !known.contains(k))
                .collect()
        })
        .unwrap_or_default();

    FileReport {
        path: path.to_path_buf(),
        error,
        unknown_keys,
    }
}

/// Check every `.ron` file in `path` and collect the results.
pub fn check_config_directory(path: &Path) -> Result<ValidationReport, ValidationError> {
    if !path.is_dir() {
        return Err(ValidationError::DirectoryNotFound(path.to_path_buf()));
    }
    let io_err = |source| ValidationError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_err)? {
        let file = entry.map_err(io_err)?.path();
        if file.extension().is_some_and(|e| e == "ron") {
            files.push(file);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(ValidationError::Empty(path.to_path_buf()));
    }

    let known = known_keys()?;
    let mut report = ValidationReport::default();
    for file in files {
        let contents = std::fs::read_to_string(&file).map_err(|source| ValidationError::Io {
            path: file.clone(),
            source,
        })?;
        let result = validate_config_str(&file, &contents, &known);
        match &result.error {
            None => tracing::debug!(path = %file.display(), "Config valid"),
            Some(e) => tracing::warn!(path = %file.display(), error = %e, "Config invalid"),
        }
        for key in &result.unknown_keys {
            tracing::warn!(path = %file.display(), key, "Unknown parameter ignored");
        }
        report.files.push(result);
    }
    Ok(report)
}

/// Validate all generation configs in a directory.
pub fn validate_config_directory(path: &Path) -> Result<ValidationReport, ValidationError> {
    let report = check_config_directory(path)?;
    let failed = report.failures().count();
    if failed > 0 {
        return Err(ValidationError::Invalid {
            failed,
            total: report.files.len(),
        });
    }
    Ok(report)
}
