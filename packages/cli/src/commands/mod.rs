pub mod generate;
pub mod init;
pub mod list;

pub use generate::{generate, GenerateArgs};
pub use init::{init, InitArgs};
pub use list::{list, ListArgs};

use crate::config::Config;
use anyhow::{anyhow, Result};
use sigen_common::GenerateError;
use sigen_generator::{GeneratorSettings, AUTO_GENERATED_HEADER};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Explicit path argument relative to `cwd`, else the configured source directory
fn resolve_input(path: Option<&str>, config: &Config, cwd: &str) -> Result<PathBuf> {
    let input = match path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_src_dir(cwd),
    };

    if !input.exists() {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    }

    Ok(input)
}

/// `.cs` files under `input` (or `input` itself), skipping our own output
fn find_source_files(input: &Path, settings: &GeneratorSettings) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(input)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|s| s.to_str()) != Some("cs") {
            continue;
        }

        if !is_generated_output(path, settings) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// A file is ours when it is named `{prefix}{Name}{suffix}.cs` and starts
/// with the auto-generated header. The name alone is not enough, since an
/// empty suffix matches every `.cs` file.
fn is_generated_output(path: &Path, settings: &GeneratorSettings) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    let generated_ending = format!("{}.cs", settings.filename_suffix);
    let named_like_output = name.len() > settings.class_prefix.len() + generated_ending.len()
        && name.starts_with(&settings.class_prefix)
        && name.ends_with(&generated_ending);

    named_like_output && starts_with_header(path)
}

fn starts_with_header(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };

    let mut first_line = String::new();
    if BufReader::new(file).read_line(&mut first_line).is_err() {
        return false;
    }
    first_line.trim_start_matches('\u{feff}').trim_end() == AUTO_GENERATED_HEADER
}

/// Render a generation failure, using a labelled report for parse errors
fn describe_error(error: &GenerateError, file_path: &Path, source: &str) -> String {
    match error {
        GenerateError::Parse(e) => {
            use sigen_parser::error::pretty;
            let file_name = file_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown");
            format!("\n{}", pretty::format_error(e, file_name, source))
        }
        other => other.to_string(),
    }
}
