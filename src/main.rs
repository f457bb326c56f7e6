use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use testinfo::{lookup_namespace, parse_str, parse_with_reporting};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

const DESC_FILE_NAME: &str = "testinfo.desc";

#[derive(Parser)]
#[command(name = "testinfo")]
#[command(version)]
#[command(about = "Check, inspect and classify testinfo.desc test metadata files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every problem in testinfo.desc files
    Lint {
        /// Files to check; directories are searched for testinfo.desc files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Parse one file and print its canonical form
    Show {
        file: PathBuf,

        /// Print the parsed record as JSON
        #[arg(long)]
        json: bool,

        /// Fail on the first error or warning
        #[arg(long)]
        strict: bool,
    },

    /// Print the namespace a package belongs to
    Namespace { package: String },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lint { paths } => lint(&paths),
        Commands::Show { file, json, strict } => show(&file, json, strict),
        Commands::Namespace { package } => Ok(namespace(&package)),
    }
}

fn read_desc(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Expand directories into the testinfo.desc files below them
fn collect_desc_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file() && entry.file_name() == DESC_FILE_NAME {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

fn lint(paths: &[PathBuf]) -> Result<ExitCode> {
    let files = collect_desc_files(paths)?;
    tracing::debug!(files = files.len(), "linting");

    let (mut errors, mut warnings) = (0, 0);
    let stderr = io::stderr();

    for file in &files {
        let text = read_desc(file)?;
        let source = file.display().to_string();
        let (_, file_errors, file_warnings) =
            parse_with_reporting(text.lines(), &source, stderr.lock());

        errors += file_errors;
        warnings += file_warnings;
    }

    println!(
        "{} file(s) checked: {} error(s), {} warning(s)",
        files.len(),
        errors,
        warnings
    );

    Ok(if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn show(file: &Path, json: bool, strict: bool) -> Result<ExitCode> {
    let text = read_desc(file)?;

    let info =
        parse_str(&text, strict).with_context(|| format!("Failed to parse {}", file.display()))?;

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &info).context("Failed to write JSON")?;
        writeln!(stdout)?;
    } else {
        info.write_to(&mut stdout).context("Failed to write record")?;
    }

    Ok(ExitCode::SUCCESS)
}

fn namespace(package: &str) -> ExitCode {
    match lookup_namespace(package) {
        Some(ns) => {
            println!("{}", ns);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("{}: no namespace known for this package", package);
            ExitCode::FAILURE
        }
    }
}
