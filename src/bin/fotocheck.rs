//! CLI binary for fotocheck.
//!
//! A thin shim over the library crate that collects input files, maps CLI
//! flags to a `PhotoSpec` and prints per-photo results.

use anyhow::{Context, Result};
use clap::Parser;
use fotocheck::{
    process_batch_to_file, validate, BatchProgressCallback, PhotoSpec, ProgressCallback,
    UploadedItem, ValidationReport, ARCHIVE_FILENAME,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and a per-photo
/// log line using [indicatif].
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new(total: usize) -> Arc<Self> {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} photos  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Processing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_item_start(&self, _index: usize, _total: usize, filename: &str) {
        self.bar.set_message(filename.to_string());
    }

    fn on_item_complete(
        &self,
        _index: usize,
        _total: usize,
        filename: &str,
        report: &ValidationReport,
        corrected: bool,
    ) {
        let status = if corrected {
            yellow("~ corrected")
        } else {
            green("✓ ok")
        };
        let findings = if report.is_clean() {
            String::new()
        } else {
            dim(&format!(
                "  ({} warning{}, {} error{})",
                report.warnings.len(),
                if report.warnings.len() == 1 { "" } else { "s" },
                report.errors.len(),
                if report.errors.len() == 1 { "" } else { "s" },
            ))
        };
        self.bar
            .println(format!("  {status}  {filename}{findings}"));
        self.bar.inc(1);
    }

    fn on_item_error(&self, _index: usize, _total: usize, filename: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {filename}  {}", red("✗"), red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_items: usize, failed_items: usize) {
        self.bar.finish_and_clear();
        if failed_items == 0 {
            eprintln!(
                "{} {} photos processed",
                green("✔"),
                bold(&total_items.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} photos processed  ({} failed)",
                if failed_items == total_items {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&(total_items - failed_items).to_string()),
                total_items,
                red(&failed_items.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Correct a folder of photos into fotos_corregidas.zip
  fotocheck ./fotos/

  # Individual files, custom archive name
  fotocheck 41803077.jpg 001234567_retrato.png -o lote_marzo.zip

  # Validation report only, nothing written
  fotocheck --check-only ./fotos/

  # Machine-readable report alongside the archive
  fotocheck --json ./fotos/ -o fotos.zip > reporte.json

  # Tighter size ceiling (KB)
  fotocheck --max-kb 40 ./fotos/

FILENAME RULES:
  The document identifier is taken from the filename (extension dropped):
  text before the first '-' , then text after the last '_'.
    41803077.jpg            → DNI 41803077
    001234567-2.png         → carné de extranjería 001234567
    scan_final_AB123456.jpg → pasaporte AB123456
  Files with no recognisable identifier are archived as SIN_ID.jpg.

OUTPUT PROFILE:
  240×288 px · 300 DPI · JPEG ≤ 50 KB · white background
"#;

/// Validate, auto-correct and package credential photos.
#[derive(Parser, Debug)]
#[command(
    name = "fotocheck",
    version,
    about = "Validate, auto-correct and package credential photos",
    long_about = "Check credential photos against the registry submission profile \
(240×288 px, 300 DPI, JPEG under 50 KB, white background), automatically fix the ones \
that miss it, and pack everything into a single ZIP named by document identifier.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Photo files or directories (directories are scanned, not recursed).
    inputs: Vec<PathBuf>,

    /// Write the ZIP archive to this path.
    #[arg(short, long, env = "FOTOCHECK_OUTPUT", default_value = ARCHIVE_FILENAME)]
    output: PathBuf,

    /// Validate only: print reports, write nothing.
    #[arg(long)]
    check_only: bool,

    /// Output size ceiling in kilobytes.
    #[arg(long, env = "FOTOCHECK_MAX_KB", default_value_t = 50)]
    max_kb: u32,

    /// Output structured JSON (per-photo reports + batch stats) to stdout.
    #[arg(long, env = "FOTOCHECK_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "FOTOCHECK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FOTOCHECK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FOTOCHECK_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.check_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let spec = PhotoSpec::builder()
        .max_kilobytes(cli.max_kb as usize)
        .build()
        .context("Invalid configuration")?;

    // ── Collect inputs ───────────────────────────────────────────────────
    let items = collect_items(&cli.inputs, &spec)?;
    if items.is_empty() {
        anyhow::bail!("No photo files found in the given inputs");
    }

    // ── Check-only mode ──────────────────────────────────────────────────
    if cli.check_only {
        return run_check_only(&cli, &items, &spec);
    }

    // ── Full run ─────────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new(items.len()) as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let output = process_batch_to_file(&items, &spec, &cli.output, progress_cb.as_ref())
        .context("Batch processing failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    }

    if !cli.quiet {
        eprintln!(
            "{}  {} corrected, {} passed through, {} failed  {}ms  →  {}",
            if output.stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            output.stats.corrected,
            output.stats.passed_through,
            output.stats.failed,
            output.stats.duration_ms,
            bold(&cli.output.display().to_string()),
        );
        eprintln!(
            "   archive: {}",
            dim(&format!("{} bytes", output.stats.archive_size_bytes))
        );
    }

    if output.stats.failed > 0 && output.stats.failed == output.stats.total_items {
        anyhow::bail!("All {} photos failed", output.stats.failed);
    }
    Ok(())
}

/// Validate every item, print reports, exit non-zero if anything is dirty.
fn run_check_only(cli: &Cli, items: &[UploadedItem], spec: &PhotoSpec) -> Result<()> {
    let mut reports = Vec::with_capacity(items.len());
    let mut dirty = 0usize;

    for item in items {
        let id = fotocheck::extract_identifier(&item.filename);
        let report = validate(&item.bytes, &item.filename, id.as_ref(), spec);
        if !report.is_clean() {
            dirty += 1;
        }
        reports.push((item.filename.clone(), report));
    }

    if cli.json {
        let json: Vec<serde_json::Value> = reports
            .iter()
            .map(|(filename, report)| {
                serde_json::json!({ "filename": filename, "report": report })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if !cli.quiet {
        for (filename, report) in &reports {
            if report.is_clean() {
                println!("{} {filename}", green("✓"));
                continue;
            }
            println!("{} {filename}", yellow("~"));
            for e in &report.errors {
                println!("    {} {e}", red("error:"));
            }
            for w in &report.warnings {
                println!("    {} {w}", dim("warning:"));
            }
        }
        eprintln!(
            "{}/{} photos conform",
            reports.len() - dirty,
            reports.len()
        );
    }

    if dirty > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Expand files and directories into uploaded items.
///
/// Directories are scanned one level deep for files with an allowed
/// extension, sorted by name so runs are reproducible. Explicitly named
/// files are read regardless of extension — the validator will flag them.
fn collect_items(inputs: &[PathBuf], spec: &PhotoSpec) -> Result<Vec<UploadedItem>> {
    let mut items = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_allowed_extension(p, spec))
                .collect();
            paths.sort();
            for path in paths {
                items.push(read_item(&path)?);
            }
        } else {
            items.push(read_item(input)?);
        }
    }

    Ok(items)
}

fn has_allowed_extension(path: &Path, spec: &PhotoSpec) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            spec.allowed_extensions.iter().any(|a| a == &e)
        })
        .unwrap_or(false)
}

fn read_item(path: &Path) -> Result<UploadedItem> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid filename: {}", path.display()))?
        .to_string();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(UploadedItem::new(filename, bytes))
}
