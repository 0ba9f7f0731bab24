//! dtsdoc: generate ambient TypeScript declarations from JSDoc comments.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `dtsdoc < app.js > app.d.ts`
//! - **file mode**: `dtsdoc -o types src/*.js`
//!
//! `--inline` switches either mode from declarations to an in-place
//! rewrite of the source with `/* : T*/` type comments.

use anyhow::{Context, Result};
use clap::Parser;
use dtsdoc::parser::{is_javascript, SUPPORTED_EXTENSIONS};
use dtsdoc::render::create_renderer;
use dtsdoc::Mode;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dtsdoc",
    about = "Generate TypeScript declarations from JSDoc-annotated JavaScript"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Declaration format: dts (default), json
    #[arg(short = 'f', long, default_value = "dts", env = "DTSDOC_FORMAT")]
    format: String,

    /// Rewrite the source with inline type comments instead of declaring
    #[arg(long)]
    inline: bool,

    /// Log every located construct (same as DTSDOC_LOG=debug)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.inline {
            Mode::Inline
        } else {
            Mode::Declaration
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// Log to stderr. `DTSDOC_LOG` takes precedence over `-v`.
fn init_tracing(verbose: bool) {
    let filter = match std::env::var("DTSDOC_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// stdin mode: read one source from stdin, write the result to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let output = dtsdoc::run(&input, cli.mode(), &cli.format).context("failed to process stdin")?;
    print!("{}", output);
    Ok(())
}

/// file mode: process every input file, one output file each.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    // Validate the format before touching the filesystem.
    let renderer = match cli.mode() {
        Mode::Declaration => Some(create_renderer(&cli.format)?),
        Mode::Inline => None,
    };

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;

    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let context = || format!("failed to process {}", path.display());

        let (output, ext) = match &renderer {
            Some(renderer) => {
                let root = dtsdoc::build_tree(&content).with_context(context)?;
                // Skip files with no documented constructs
                if root.is_empty() {
                    debug!(input = %path.display(), "nothing documented, skipping");
                    continue;
                }
                let output = renderer.render(&root).with_context(context)?;
                (output, renderer.file_extension())
            }
            None => {
                let output = dtsdoc::annotate(&content).with_context(context)?;
                (output, path.extension().and_then(|e| e.to_str()).unwrap_or("js"))
            }
        };

        let source = path.to_string_lossy();
        let name = derive_output_name(&source);
        let out_path = output_dir.join(format!("{}.{}", name, ext));
        debug!(input = %path.display(), output = %out_path.display(), "writing");

        fs::write(&out_path, &output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for JavaScript files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively.
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            files.extend(
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|p| p.is_file() && is_javascript(p)),
            );
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from a source path.
/// "src/app.js" → "app", "lib/index.mjs" → "index"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit(['/', '\\']).next().unwrap_or(source);
    SUPPORTED_EXTENSIONS
        .iter()
        .find_map(|ext| {
            filename
                .strip_suffix(ext)
                .and_then(|stem| stem.strip_suffix('.'))
        })
        .unwrap_or(filename)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_from_js() {
        assert_eq!(derive_output_name("src/app.js"), "app");
        assert_eq!(derive_output_name("app.js"), "app");
    }

    #[test]
    fn output_name_from_module_extensions() {
        assert_eq!(derive_output_name("lib/index.mjs"), "index");
        assert_eq!(derive_output_name("lib/config.cjs"), "config");
        assert_eq!(derive_output_name("ui/view.jsx"), "view");
    }

    #[test]
    fn output_name_keeps_inner_dots() {
        assert_eq!(derive_output_name("vendor/jquery.min.js"), "jquery.min");
    }

    #[test]
    fn output_name_no_extension() {
        assert_eq!(derive_output_name("Makefile"), "Makefile");
    }

    #[test]
    fn inline_flag_selects_mode() {
        let cli = Cli::parse_from(["dtsdoc", "--inline"]);
        assert_eq!(cli.mode(), Mode::Inline);
        let cli = Cli::parse_from(["dtsdoc", "a.js", "-o", "out"]);
        assert_eq!(cli.mode(), Mode::Declaration);
    }
}
