//! preflight CLI - print-production PDF auditing tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use preflight::{
    AuditOptions, AuditReport, CheckSet, Document, DocumentLocator, FsStore, ImageAudit,
    ImageAuditor, MetadataResolver, MonthTable, Preflight, ToolRunner,
};

#[derive(Parser)]
#[command(name = "preflight")]
#[command(version)]
#[command(about = "Audit production PDFs against metadata and print-quality rules", long_about = None)]
struct Cli {
    /// Collection directory to audit
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Checks definition file (JSON array of {page, target})
    #[arg(short, long, value_name = "FILE")]
    checks: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both auditors over a collection directory
    Audit {
        /// Collection directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Checks definition file (JSON array of {page, target});
        /// defaults to the built-in example set
        #[arg(short, long, value_name = "FILE")]
        checks: Option<PathBuf>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Audit documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Minimum print resolution per axis, in ppi
        #[arg(long, default_value = "300")]
        min_ppi: u32,

        /// Per-tool-invocation timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,

        /// Localization language for derived month names
        #[arg(long, default_value = "it")]
        language: String,
    },

    /// Audit image resolution of a single PDF or a collection directory
    Images {
        /// PDF file or collection directory
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Minimum print resolution per axis, in ppi
        #[arg(long, default_value = "300")]
        min_ppi: u32,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Locate, enrich and validate the metadata record of a collection
    Metadata {
        /// Collection directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Emit the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a collection's files into an app-friendly directory tree
    Dump {
        /// Collection directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Export root; the collection lands in a subdirectory named
        /// after the publication title
        #[arg(short, long, value_name = "ROOT")]
        output: PathBuf,
    },

    /// Show version and external tool availability
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Audit {
            dir,
            checks,
            json,
            sequential,
            min_ppi,
            timeout,
            language,
        }) => cmd_audit(
            &dir,
            checks.as_deref(),
            json,
            sequential,
            min_ppi,
            timeout,
            &language,
        ),
        Some(Commands::Images {
            input,
            min_ppi,
            json,
        }) => cmd_images(&input, min_ppi, json),
        Some(Commands::Metadata { dir, json }) => cmd_metadata(&dir, json),
        Some(Commands::Dump { dir, output }) => cmd_dump(&dir, &output),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: audit if a directory is provided
            if let Some(dir) = cli.dir {
                cmd_audit(&dir, cli.checks.as_deref(), false, false, 300, 30, "it")
            } else {
                println!("{}", "Usage: preflight <DIR> [--checks FILE]".yellow());
                println!("       preflight --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_audit(
    dir: &Path,
    checks: Option<&Path>,
    json: bool,
    sequential: bool,
    min_ppi: u32,
    timeout: u64,
    language: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let checks = match checks {
        Some(path) => CheckSet::from_file(path)?,
        None => CheckSet::example(),
    };

    let options = AuditOptions::new()
        .with_min_ppi(min_ppi)
        .with_tool_timeout(Duration::from_secs(timeout))
        .with_parallel(!sequential)
        .with_language(language);

    let store = FsStore::new(dir);
    let engine = Preflight::new(&store)
        .with_options(options)
        .with_checks(checks);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Auditing {}...", dir.display()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let report = engine.run("")?;
    spinner.finish_and_clear();

    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    if !report.is_clean() {
        std::process::exit(2);
    }
    Ok(())
}

fn print_report(report: &AuditReport) {
    if !report.metadata_found {
        println!(
            "{}",
            "No metadata record found: ensure a single record exists in a container named \"XML\". Text checks were skipped."
                .yellow()
        );
    }
    if report.is_empty() {
        println!("{}", "No PDF documents to audit.".yellow());
        return;
    }

    for doc in &report.documents {
        println!("\n{}", doc.document.bold());
        if let Some(error) = &doc.error {
            println!("  {} {}", "skipped:".red(), error);
            continue;
        }
        for audit in &doc.images {
            if audit.good {
                println!("  {} {}", "ok ".green(), audit.image);
            } else {
                println!("  {} {}", "low".red().bold(), audit.image);
            }
        }
        for check in &doc.checks {
            let line = if check.good {
                format!(
                    "found {:?} on {}",
                    check.resolved,
                    check.page_label()
                )
                .green()
            } else {
                format!("no {:?} on {}", check.resolved, check.page_label())
                    .red()
            };
            if check.warning.is_empty() {
                println!("  {line}");
            } else {
                println!("  {} {line}", check.warning.yellow());
            }
        }
    }

    let findings = report.finding_count();
    if findings == 0 {
        println!("\n{}", "All documents are clean.".green().bold());
    } else {
        println!(
            "\n{}",
            format!(
                "{} finding(s) across {} document(s).",
                findings,
                report.documents.len()
            )
            .red()
            .bold()
        );
    }
}

fn cmd_images(input: &Path, min_ppi: u32, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let options = AuditOptions::new().with_min_ppi(min_ppi);
    let runner = ToolRunner::new(options.tool_timeout);
    let auditor = ImageAuditor::new(&runner, &options);

    let mut results: Vec<(String, Vec<ImageAudit>)> = Vec::new();
    if input.is_dir() {
        let store = FsStore::new(input);
        for document in DocumentLocator::new(&store).list_candidates("")? {
            let audits = auditor.audit_document(&document)?;
            results.push((document.filename, audits));
        }
    } else {
        let document = Document::from_path(input)?;
        let audits = auditor.audit_document(&document)?;
        results.push((document.filename, audits));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let mut bad = 0;
    for (filename, audits) in &results {
        println!("\n{}", filename.bold());
        if audits.is_empty() {
            println!("  {}", "no embedded images".dimmed());
        }
        for audit in audits {
            if audit.good {
                println!("  {} {}", "ok ".green(), audit.image);
            } else {
                bad += 1;
                println!("  {} {}", "low".red().bold(), audit.image);
            }
        }
    }
    if bad > 0 {
        println!(
            "\n{}",
            format!("{bad} image(s) below {min_ppi} ppi.").red().bold()
        );
        std::process::exit(2);
    }
    println!("\n{}", "All images meet the threshold.".green().bold());
    Ok(())
}

fn cmd_metadata(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = FsStore::new(dir);
    let options = AuditOptions::default();
    let resolver = MetadataResolver::new(&store, &MonthTable, &options);

    let Some(record) = resolver.locate("")? else {
        println!(
            "{}",
            "No metadata record found: ensure a single record exists in a container named \"XML\"."
                .yellow()
        );
        std::process::exit(1);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    if let serde_json::Value::Object(fields) = serde_json::to_value(&record)? {
        for (name, value) in fields {
            match value {
                serde_json::Value::Null => continue,
                serde_json::Value::Array(items) if items.is_empty() => continue,
                other => println!("{}: {}", name.bold(), other),
            }
        }
    }
    for (name, value) in &record.derived {
        println!("{}: {} {}", name.bold(), value, "(derived)".dimmed());
    }

    let problems = record.validate();
    if problems.is_empty() {
        println!("\n{}", "Record is consistent.".green());
    } else {
        for problem in &problems {
            println!("{} {problem}", "warning:".yellow().bold());
        }
    }
    Ok(())
}

fn cmd_dump(dir: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = FsStore::new(dir);
    let options = AuditOptions::default();
    let record = MetadataResolver::new(&store, &MonthTable, &options).locate("")?;

    let title = record
        .as_ref()
        .and_then(|r| r.title.clone())
        .unwrap_or_else(|| {
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "collection".into())
        });
    let target = output.join(slugify(&title));

    // Destructive on the filesystem: the target is rebuilt from scratch.
    if target.exists() {
        fs::remove_dir_all(&target)?;
    }
    fs::create_dir_all(&target)?;

    let documents = preflight::CollectionStore::documents(&store, "")?;
    let bar = ProgressBar::new(documents.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    for document in &documents {
        bar.set_message(document.filename.clone());
        fs::write(target.join(&document.filename), &document.content)?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!(
        "{} {} file(s) written to {}",
        "Done:".green().bold(),
        documents.len(),
        target.display()
    );
    Ok(())
}

fn cmd_version() {
    println!("preflight {}", env!("CARGO_PKG_VERSION"));
    for tool in ["pdfimages", "pdftotext"] {
        if ToolRunner::available(tool) {
            println!("  {} {}", "found  ".green(), tool);
        } else {
            println!("  {} {}", "missing".red().bold(), tool);
        }
    }
}

/// Lowercased, space-free directory name for a publication title.
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
