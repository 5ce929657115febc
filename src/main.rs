//! soldoc: turn Solidity compiler ASTs into documentation records.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `soldoc < build-info.json` prints every page to stdout
//! - **file mode**: `soldoc -o docs/api --pages items artifacts/build-info/*.json`

use anyhow::{Context, Result};
use clap::Parser;
use soldoc::input::{self, SourceAst};
use soldoc::render;
use soldoc::site::{self, PageMode, SiteConfig};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "soldoc",
    about = "Derive documentation records from Solidity compiler syntax trees"
)]
struct Cli {
    /// Compiler JSON files: bare ASTs, standard-JSON output or build-info
    /// (glob patterns supported). If omitted, reads one document from stdin.
    files: Vec<String>,

    /// Output directory. Pages are printed to stdout when omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default), jsonl
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Page grouping: single (default), items, files
    #[arg(long, default_value = "single")]
    pages: String,

    /// Skip source files whose path matches this glob. Can be repeated.
    #[arg(long)]
    exclude: Vec<String>,

    /// Keep Test*/*Test/Mock*/*Mock contracts
    #[arg(long)]
    include_tests: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// RUST_LOG takes precedence.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = site_config(&cli)?;
    let units = if cli.files.is_empty() {
        read_stdin()?
    } else {
        read_files(&cli.files)?
    };

    let pages = site::build_pages(&units, &config)?;
    let renderer = render::create_renderer(&cli.format)?;

    match cli.output.as_deref() {
        None => {
            for page in &pages {
                print!("{}", renderer.render(page)?);
            }
        }
        Some(output_dir) => {
            fs::create_dir_all(output_dir).with_context(|| {
                format!("failed to create output directory: {}", output_dir.display())
            })?;
            for page in &pages {
                let file_name = format!("{}.{}", page.id, renderer.file_extension());
                let out_path = output_dir.join(file_name);
                if let Some(parent) = out_path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                fs::write(&out_path, renderer.render(page)?)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                debug!(path = %out_path.display(), "wrote page");
            }
        }
    }

    Ok(())
}

/// Log to stderr; stdout carries the records in stdin mode.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn site_config(cli: &Cli) -> Result<SiteConfig> {
    let pages: PageMode = cli.pages.parse()?;
    let exclude = cli
        .exclude
        .iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("invalid exclude pattern: {}", p)))
        .collect::<Result<Vec<_>>>()?;
    Ok(SiteConfig {
        pages,
        exclude,
        include_tests: cli.include_tests,
    })
}

/// stdin mode: one compiler JSON document.
fn read_stdin() -> Result<Vec<SourceAst>> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("failed to read stdin")?;
    input::parse_document(&content, "<stdin>")
        .context("stdin is not valid JSON")?
        .context("stdin does not contain a Solidity AST, standard-JSON output or build-info")
}

/// file mode: every matched file; unrecognised documents are skipped.
fn read_files(patterns: &[String]) -> Result<Vec<SourceAst>> {
    let mut units = Vec::new();
    for path in expand_globs(patterns)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let fallback = path.to_string_lossy();
        match input::parse_document(&content, &fallback)
            .with_context(|| format!("{} is not valid JSON", path.display()))?
        {
            Some(found) => {
                debug!(path = %path.display(), units = found.len(), "loaded");
                units.extend(found);
            }
            None => warn!("skipping {}: no Solidity AST found", path.display()),
        }
    }
    // The same source may appear in several build-info files.
    units.sort_by(|a, b| a.path.cmp(&b.path));
    units.dedup_by(|a, b| a.path == b.path);
    Ok(units)
}

/// File extensions recognized as compiler output.
const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for JSON files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
