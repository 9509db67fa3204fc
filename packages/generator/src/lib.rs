//! Generates serializable forwarding classes for C# interfaces marked with
//! `[SerializableInterface]`.
//!
//! Marked interfaces are extracted from the declaration tree into plain
//! models, rendered into `S{Name}` classes that forward every member to
//! `Value`, and committed beside their source file.

mod context;
mod emitter;
mod extractor;
mod incremental;
mod marker;
mod model;
mod pipeline;
mod settings;
mod writer;

pub use context::{EmitContext, IndentGuard, INDENT_WIDTH};
pub use emitter::{render, AUTO_GENERATED_HEADER};
pub use extractor::{extract, extract_from_unit, InterfaceReceiver};
pub use incremental::{GeneratedSource, IncrementalGenerator};
pub use marker::{has_marker, MARKER_ATTRIBUTE};
pub use model::{ConstraintClause, InterfaceDeclaration, MethodMember, Parameter, PropertyMember, VOID};
pub use pipeline::{generate_file, generate_source, render_source, InterfaceOutcome, RenderedUnit};
pub use settings::GeneratorSettings;
pub use writer::{output_path, OutputWriter};

#[cfg(test)]
mod tests;
