use crate::emitter::render;
use crate::extractor::extract_from_unit;
use crate::settings::GeneratorSettings;
use serde::Serialize;
use sigen_parser::ast::CompilationUnit;
use tracing::debug;

/// In-memory unit handed back to a host compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSource {
    /// File name the host should register the text under, e.g. `SIFoo.g.cs`
    pub hint_name: String,
    pub text: String,
}

/// Generator for hosts that already hold parsed compilation units.
///
/// Shares extraction and rendering with the batch pipeline but never touches
/// the filesystem.
#[derive(Debug, Clone, Default)]
pub struct IncrementalGenerator {
    settings: GeneratorSettings,
}

impl IncrementalGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn execute(&self, unit: &CompilationUnit) -> Vec<GeneratedSource> {
        extract_from_unit(unit)
            .iter()
            .map(|interface| {
                let hint_name = self.settings.file_name(&interface.name, "cs");
                debug!(hint_name = %hint_name, "Rendered generated source");
                GeneratedSource {
                    hint_name,
                    text: render(interface, &self.settings),
                }
            })
            .collect()
    }
}
