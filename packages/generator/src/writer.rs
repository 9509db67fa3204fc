use crate::settings::GeneratorSettings;
use sigen_common::{FileSystem, GenerateError, GenerateResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_EXTENSION: &str = "cs";

/// Path of the generated unit for `interface_name`, placed beside the source file
pub fn output_path(source_path: &Path, interface_name: &str, settings: &GeneratorSettings) -> PathBuf {
    let extension = source_path
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION);
    let file_name = settings.file_name(interface_name, extension);

    match source_path.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Commits rendered units, skipping writes whose content is already on disk
pub struct OutputWriter<'a, F: FileSystem> {
    fs: &'a F,
}

impl<'a, F: FileSystem> OutputWriter<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Returns `true` when the file was written, `false` when it was already current
    pub fn commit(&self, path: &Path, content: &str) -> GenerateResult<bool> {
        if self.is_current(path, content)? {
            debug!(path = %path.display(), "Generated file unchanged");
            return Ok(false);
        }

        self.fs
            .write(path, content)
            .map_err(|source| GenerateError::io(path, source))?;

        info!(path = %path.display(), bytes = content.len(), "Wrote generated file");
        Ok(true)
    }

    /// Whether the file at `path` already holds exactly `content`
    pub fn is_current(&self, path: &Path, content: &str) -> GenerateResult<bool> {
        if !self.fs.exists(path) {
            return Ok(false);
        }

        // Non-UTF-8 content compares unequal rather than failing
        let existing = self
            .fs
            .read(path)
            .map_err(|source| GenerateError::io(path, source))?;
        Ok(existing == content.as_bytes())
    }
}
