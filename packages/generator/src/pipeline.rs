//! Batch generation: source file in, one committed unit per marked interface out.

use crate::emitter::render;
use crate::extractor::extract;
use crate::model::InterfaceDeclaration;
use crate::settings::GeneratorSettings;
use crate::writer::{output_path, OutputWriter};
use sigen_common::{FileSystem, GenerateError, GenerateResult};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Rendered text for one interface and where it belongs on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub interface: InterfaceDeclaration,
    pub output_path: PathBuf,
    pub text: String,
}

/// Result of generating and committing one interface
#[derive(Debug)]
pub struct InterfaceOutcome {
    pub interface: String,
    pub output_path: PathBuf,
    /// `Ok(true)` written, `Ok(false)` already current
    pub result: GenerateResult<bool>,
}

impl InterfaceOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn was_written(&self) -> bool {
        matches!(self.result, Ok(true))
    }

    pub fn error(&self) -> Option<&GenerateError> {
        self.result.as_ref().err()
    }
}

/// Extract and render every marked interface without touching the filesystem
pub fn render_source(
    source: &str,
    path: &Path,
    settings: &GeneratorSettings,
) -> GenerateResult<Vec<RenderedUnit>> {
    let interfaces = extract(source, path)?;

    Ok(interfaces
        .into_iter()
        .map(|interface| RenderedUnit {
            output_path: output_path(path, &interface.name, settings),
            text: render(&interface, settings),
            interface,
        })
        .collect())
}

/// Generate and commit a unit for every marked interface in `source`.
///
/// Only a parse error fails the call. Each interface is committed on its own,
/// so a write failure is reported in that interface's outcome and the rest
/// still run.
#[instrument(skip(source, settings, fs), fields(path = %path.display()))]
pub fn generate_source<F: FileSystem>(
    source: &str,
    path: &Path,
    settings: &GeneratorSettings,
    fs: &F,
) -> GenerateResult<Vec<InterfaceOutcome>> {
    let units = render_source(source, path, settings)?;
    let writer = OutputWriter::new(fs);

    let outcomes: Vec<_> = units
        .into_iter()
        .map(|unit| {
            let result = writer.commit(&unit.output_path, &unit.text);
            if let Err(e) = &result {
                warn!(interface = %unit.interface.name, error = %e, "Failed to commit generated unit");
            }

            InterfaceOutcome {
                interface: unit.interface.name,
                output_path: unit.output_path,
                result,
            }
        })
        .collect();

    info!(
        interfaces = outcomes.len(),
        written = outcomes.iter().filter(|o| o.was_written()).count(),
        "Generated source file"
    );
    Ok(outcomes)
}

/// Read `path` through `fs` and generate from its contents
pub fn generate_file<F: FileSystem>(
    path: &Path,
    settings: &GeneratorSettings,
    fs: &F,
) -> GenerateResult<Vec<InterfaceOutcome>> {
    let source = fs
        .read_to_string(path)
        .map_err(|source| GenerateError::io(path, source))?;
    generate_source(&source, path, settings, fs)
}
