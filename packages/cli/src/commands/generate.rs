use super::{describe_error, find_source_files, resolve_input};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use sigen_common::RealFileSystem;
use sigen_generator::{generate_source, render_source, GeneratorSettings, OutputWriter};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// File or directory to scan (defaults to srcDir from the config)
    pub path: Option<String>,

    /// Compare generated output with what is on disk without writing
    #[arg(long)]
    pub check: bool,

    /// Print generated units instead of writing files
    #[arg(long, conflicts_with = "check")]
    pub stdout: bool,

    /// Class name prefix (overrides config)
    #[arg(long)]
    pub prefix: Option<String>,

    /// File name suffix before the extension (overrides config)
    #[arg(long)]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Write,
    Check,
    Stdout,
}

impl Mode {
    fn from_args(args: &GenerateArgs) -> Self {
        if args.stdout {
            Mode::Stdout
        } else if args.check {
            Mode::Check
        } else {
            Mode::Write
        }
    }
}

/// Per-interface tallies across one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Summary {
    written: usize,
    unchanged: usize,
    stale: usize,
    failed: usize,
}

pub fn generate(args: GenerateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let settings = resolve_settings(&args, &config);
    let input = resolve_input(args.path.as_deref(), &config, cwd)?;
    let mode = Mode::from_args(&args);

    let files = find_source_files(&input, &settings)?;
    debug!(input = %input.display(), files = files.len(), ?mode, "Discovered source files");

    if mode != Mode::Stdout {
        let heading = if mode == Mode::Check {
            "🔍 Checking generated interfaces..."
        } else {
            "🔨 Generating serializable interfaces..."
        };
        println!("{}", heading.bright_blue().bold());
    }

    if files.is_empty() {
        println!("{}", "⚠️  No .cs files found".yellow());
        return Ok(());
    }

    let mut summary = Summary::default();
    for file in &files {
        let display_path = file.strip_prefix(cwd).unwrap_or(file);
        process_file(file, display_path, mode, &settings, &mut summary);
    }

    if mode != Mode::Stdout {
        print_summary(files.len(), mode, &summary);
    }

    if summary.failed > 0 {
        return Err(anyhow!("{} interface(s) failed to generate", summary.failed));
    }
    if summary.stale > 0 {
        return Err(anyhow!(
            "{} generated file(s) are out of date, run `sigen generate`",
            summary.stale
        ));
    }

    Ok(())
}

fn resolve_settings(args: &GenerateArgs, config: &Config) -> GeneratorSettings {
    let mut settings = config.generator.clone();
    if let Some(prefix) = &args.prefix {
        settings.class_prefix = prefix.clone();
    }
    if let Some(suffix) = &args.suffix {
        settings.filename_suffix = suffix.clone();
    }
    settings
}

fn process_file(
    file: &Path,
    display_path: &Path,
    mode: Mode,
    settings: &GeneratorSettings,
    summary: &mut Summary,
) {
    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            summary.failed += 1;
            report_failure(display_path, &e.to_string());
            return;
        }
    };

    match mode {
        Mode::Write => write_file(file, display_path, &source, settings, summary),
        Mode::Check => check_file(file, display_path, &source, settings, summary),
        Mode::Stdout => print_file(file, display_path, &source, settings, summary),
    }
}

fn write_file(
    file: &Path,
    display_path: &Path,
    source: &str,
    settings: &GeneratorSettings,
    summary: &mut Summary,
) {
    let outcomes = match generate_source(source, file, settings, &RealFileSystem) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            summary.failed += 1;
            report_failure(display_path, &describe_error(&e, file, source));
            return;
        }
    };

    for outcome in outcomes {
        let output_name = file_name(&outcome.output_path);
        match &outcome.result {
            Ok(true) => {
                summary.written += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    outcome.interface,
                    output_name
                );
            }
            Ok(false) => {
                summary.unchanged += 1;
                println!(
                    "  {} {} {}",
                    "·".dimmed(),
                    outcome.interface,
                    "(unchanged)".dimmed()
                );
            }
            Err(e) => {
                summary.failed += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    outcome.interface,
                    e.to_string().red()
                );
            }
        }
    }
}

fn check_file(
    file: &Path,
    display_path: &Path,
    source: &str,
    settings: &GeneratorSettings,
    summary: &mut Summary,
) {
    let units = match render_source(source, file, settings) {
        Ok(units) => units,
        Err(e) => {
            summary.failed += 1;
            report_failure(display_path, &describe_error(&e, file, source));
            return;
        }
    };

    let fs = RealFileSystem;
    let writer = OutputWriter::new(&fs);
    for unit in units {
        match writer.is_current(&unit.output_path, &unit.text) {
            Ok(true) => summary.unchanged += 1,
            Ok(false) => {
                summary.stale += 1;
                println!(
                    "  {} {} {}",
                    "✗".yellow(),
                    file_name(&unit.output_path),
                    "(stale)".yellow()
                );
            }
            Err(e) => {
                summary.failed += 1;
                eprintln!("  {} {} - {}", "✗".red(), unit.interface.name, e.to_string().red());
            }
        }
    }
}

fn print_file(
    file: &Path,
    display_path: &Path,
    source: &str,
    settings: &GeneratorSettings,
    summary: &mut Summary,
) {
    match render_source(source, file, settings) {
        Ok(units) => {
            for unit in units {
                println!("// {}", unit.output_path.display());
                print!("{}", unit.text);
                summary.written += 1;
            }
        }
        Err(e) => {
            summary.failed += 1;
            report_failure(display_path, &describe_error(&e, file, source));
        }
    }
}

fn report_failure(display_path: &Path, message: &str) {
    eprintln!(
        "  {} {} - {}",
        "✗".red(),
        display_path.display(),
        message.red()
    );
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(file_count: usize, mode: Mode, summary: &Summary) {
    println!();
    if summary.failed > 0 {
        println!(
            "{} Scanned {} files, {} failed",
            "⚠️".yellow(),
            file_count,
            summary.failed
        );
    } else if mode == Mode::Check {
        println!(
            "{} {} up to date, {} stale",
            if summary.stale == 0 { "✅".green() } else { "⚠️".yellow() },
            summary.unchanged,
            summary.stale
        );
    } else {
        println!(
            "{} Scanned {} files: {} written, {} unchanged",
            "✅".green(),
            file_count,
            summary.written,
            summary.unchanged
        );
    }
}
