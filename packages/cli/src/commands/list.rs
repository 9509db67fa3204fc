use super::{describe_error, find_source_files, resolve_input};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use sigen_generator::{extract, InterfaceDeclaration};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// File or directory to scan (defaults to srcDir from the config)
    pub path: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedInterface {
    file: PathBuf,
    #[serde(flatten)]
    interface: InterfaceDeclaration,
}

pub fn list(args: ListArgs, cwd: &str) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        return Err(anyhow!("Unknown format: {}. Use: text or json", args.format));
    }

    let config = Config::load(cwd)?;
    let input = resolve_input(args.path.as_deref(), &config, cwd)?;
    let files = find_source_files(&input, &config.generator)?;

    let (listed, failures) = collect_interfaces(&files, cwd);

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&listed)?);
    } else {
        print_text(&listed);
    }

    if failures > 0 {
        return Err(anyhow!("{} file(s) could not be parsed", failures));
    }

    Ok(())
}

fn collect_interfaces(files: &[PathBuf], cwd: &str) -> (Vec<ListedInterface>, usize) {
    let mut listed = Vec::new();
    let mut failures = 0;

    for file in files {
        let display_path = file.strip_prefix(cwd).unwrap_or(file).to_path_buf();
        let source = match fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                failures += 1;
                report_failure(&display_path, &e.to_string());
                continue;
            }
        };

        match extract(&source, file) {
            Ok(interfaces) => listed.extend(interfaces.into_iter().map(|interface| ListedInterface {
                file: display_path.clone(),
                interface,
            })),
            Err(e) => {
                failures += 1;
                report_failure(&display_path, &describe_error(&e, file, &source));
            }
        }
    }

    (listed, failures)
}

fn report_failure(display_path: &Path, message: &str) {
    eprintln!("{} {} - {}", "✗".red(), display_path.display(), message.red());
}

fn print_text(listed: &[ListedInterface]) {
    if listed.is_empty() {
        println!("{}", "No marked interfaces found".yellow());
        return;
    }

    for entry in listed {
        let interface = &entry.interface;
        let qualified = if interface.namespace.is_empty() {
            interface.type_name()
        } else {
            format!("{}.{}", interface.namespace, interface.type_name())
        };

        println!("{} {}", qualified.bright_white().bold(), format!("({})", entry.file.display()).dimmed());

        for property in &interface.properties {
            let accessors = match (property.has_getter, property.has_setter) {
                (true, true) => "get; set;",
                (true, false) => "get;",
                _ => "set;",
            };
            println!("  {} {} {{ {} }}", property.ty.cyan(), property.name, accessors);
        }

        for method in &interface.methods {
            let parameters: Vec<_> = method
                .parameters
                .iter()
                .map(|p| format!("{} {}", p.ty, p.name))
                .collect();
            let generics = if method.type_parameters.is_empty() {
                String::new()
            } else {
                format!("<{}>", method.type_parameters.join(", "))
            };
            println!(
                "  {} {}{}({})",
                method.return_type.cyan(),
                method.name,
                generics,
                parameters.join(", ")
            );
        }
    }

    println!();
    println!("{} marked interface(s)", listed.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_settings() -> sigen_generator::GeneratorSettings {
        Config::default().generator
    }

    #[test]
    fn test_collects_interfaces_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("A.cs"),
            "namespace N { [SerializableInterface] interface IA { int X { get; } } }",
        )
        .unwrap();
        fs::write(
            dir.path().join("B.cs"),
            "[SerializableInterface] interface IB { void Run(); } interface IPlain {}",
        )
        .unwrap();
        let cwd = dir.path().display().to_string();

        let files = find_source_files(dir.path(), &config_settings()).unwrap();
        let (listed, failures) = collect_interfaces(&files, &cwd);

        assert_eq!(failures, 0);
        let names: Vec<_> = listed.iter().map(|l| l.interface.name.as_str()).collect();
        assert_eq!(names, vec!["IA", "IB"]);
        assert_eq!(listed[0].file, PathBuf::from("A.cs"));
    }

    #[test]
    fn test_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("A.cs"),
            "namespace N { [SerializableInterface] interface IA { int X { get; } } }",
        )
        .unwrap();
        let cwd = dir.path().display().to_string();

        let (listed, _) = collect_interfaces(&[dir.path().join("A.cs")], &cwd);
        let json: serde_json::Value = serde_json::to_value(&listed).unwrap();

        assert_eq!(json[0]["file"], "A.cs");
        assert_eq!(json[0]["name"], "IA");
        assert_eq!(json[0]["namespace"], "N");
        assert_eq!(json[0]["properties"][0]["has_getter"], true);
    }

    #[test]
    fn test_parse_failures_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Broken.cs"), "interface IBroken {").unwrap();
        let cwd = dir.path().display().to_string();

        let (listed, failures) = collect_interfaces(&[dir.path().join("Broken.cs")], &cwd);
        assert!(listed.is_empty());
        assert_eq!(failures, 1);
    }

    #[test]
    fn test_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let result = list(
            ListArgs {
                path: None,
                format: "yaml".to_string(),
            },
            &dir.path().display().to_string(),
        );

        assert!(result.is_err());
    }
}
