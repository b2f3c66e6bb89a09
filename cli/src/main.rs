//! pagewise CLI - manual structure and page-aware search tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagewise::render::{describe_error, describe_outcome, describe_page, DocumentSummary};
use pagewise::{
    Document, DocumentId, ExtractorRegistry, IngestOptions, Ingestor, JsonFormat, PageCategory,
    QueryContext, SearchEngine, SearchOptions, TextExtractor,
};

#[derive(Parser)]
#[command(name = "pagewise")]
#[command(version)]
#[command(about = "Infer manual structure and search by printed page", long_about = None)]
struct Cli {
    /// Ingest options as a JSON file
    #[arg(long, global = true, value_name = "FILE", env = "PAGEWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Disable parallel processing
    #[arg(long, global = true)]
    sequential: bool,

    /// Extractor to use for every input, regardless of file extension
    #[arg(long, global = true, value_name = "NAME")]
    extractor: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a manual and show its inferred structure
    Ingest {
        /// Input file (pages separated by form feeds)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the full document as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Search one or more manuals
    #[command(alias = "find")]
    Search {
        /// Query text
        #[arg(value_name = "QUERY")]
        query: String,

        /// Manuals to search, in tie-break order
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value = "5")]
        max_results: usize,

        /// Maximum results per manual
        #[arg(long, default_value = "3")]
        per_document: usize,

        /// Skip a manual (by file stem) as if it were not loaded
        #[arg(long, value_name = "NAME")]
        exclude: Vec<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a page by the number printed in the manual
    Page {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Printed page number
        #[arg(value_name = "PAGE", allow_negative_numbers = true)]
        page: i32,

        /// Treat PAGE as a physical page index instead
        #[arg(long)]
        physical: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let options = match load_options(cli.config.as_deref(), cli.sequential) {
        Ok(options) => options,
        Err(e) => fail(e),
    };

    let source = Source::new(cli.extractor.as_deref());

    let result = match cli.command {
        Some(Commands::Ingest {
            input,
            json,
            compact,
            output,
        }) => cmd_ingest(&input, &source, &options, json, compact, output.as_deref()),
        Some(Commands::Search {
            query,
            inputs,
            max_results,
            per_document,
            exclude,
            json,
        }) => {
            let mut search_options = SearchOptions::new()
                .with_max_results(max_results)
                .with_per_document(per_document);
            if cli.sequential {
                search_options = search_options.sequential();
            }
            cmd_search(&query, &inputs, &source, &options, search_options, &exclude, json)
        }
        Some(Commands::Page {
            input,
            page,
            physical,
        }) => cmd_page(&input, &source, &options, page, physical),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pagewise <COMMAND>".yellow());
            println!("       pagewise --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        fail(e);
    }
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    match e.downcast_ref::<pagewise::Error>() {
        Some(err) => eprintln!("{}: {}", "Error".red().bold(), describe_error(err)),
        None => eprintln!("{}: {}", "Error".red().bold(), e),
    }
    std::process::exit(1);
}

fn load_options(
    config: Option<&Path>,
    sequential: bool,
) -> Result<IngestOptions, Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => IngestOptions::from_json(&fs::read_to_string(path)?)?,
        None => IngestOptions::default(),
    };
    if sequential {
        options = options.sequential();
    }
    Ok(options)
}

/// Where page text comes from: the default registry, optionally pinned to
/// one extractor by name.
struct Source<'a> {
    registry: ExtractorRegistry,
    extractor: Option<&'a str>,
}

impl<'a> Source<'a> {
    fn new(extractor: Option<&'a str>) -> Self {
        Self {
            registry: ExtractorRegistry::with_defaults(),
            extractor,
        }
    }

    fn pinned(&self) -> pagewise::Result<Option<Arc<dyn TextExtractor>>> {
        match self.extractor {
            Some(name) => self
                .registry
                .get_by_name(name)
                .map(Some)
                .ok_or_else(|| pagewise::Error::UnsupportedFormat(name.to_string())),
            None => Ok(None),
        }
    }

    fn ingest(&self, ingestor: &Ingestor, input: &Path) -> pagewise::Result<Document> {
        match self.pinned()? {
            Some(extractor) => ingestor.ingest_file_with(input, extractor.as_ref()),
            None => ingestor.ingest_file(input, &self.registry),
        }
    }
}

fn ingest(
    input: &Path,
    source: &Source<'_>,
    options: &IngestOptions,
) -> Result<Document, Box<dyn std::error::Error>> {
    Ok(source.ingest(&Ingestor::new(options.clone()), input)?)
}

/// Document id for an input: its file stem.
fn document_id(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Ingest every input, skipping files that fail.
///
/// Two inputs with the same stem would share an id, so the second one is
/// rejected outright.
fn ingest_inputs(
    inputs: &[PathBuf],
    source: &Source<'_>,
    ingestor: &Ingestor,
    pb: &ProgressBar,
) -> pagewise::Result<Vec<Arc<Document>>> {
    source.pinned()?;

    let mut documents: Vec<Arc<Document>> = Vec::with_capacity(inputs.len());
    for input in inputs {
        pb.set_message(input.display().to_string());
        let id = document_id(input);
        if documents.iter().any(|d| d.id().as_str() == id) {
            return Err(pagewise::Error::DuplicateDocument(id));
        }

        match source.ingest(ingestor, input) {
            Ok(doc) => documents.push(Arc::new(doc.with_id(id))),
            Err(e) => {
                log::warn!("Skipping {}: {}", input.display(), e);
                pb.suspend(|| {
                    eprintln!(
                        "{} {}: {}",
                        "Skipped".yellow(),
                        input.display(),
                        describe_error(&e)
                    )
                });
            }
        }
        pb.inc(1);
    }
    Ok(documents)
}

fn cmd_ingest(
    input: &Path,
    source: &Source<'_>,
    options: &IngestOptions,
    json: bool,
    compact: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = ingest(input, source, options)?;

    if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        let json = pagewise::render::to_json(&doc, format)?;
        if let Some(path) = output {
            fs::write(path, &json)?;
            println!("{} {}", "Saved to".green(), path.display());
        } else {
            println!("{}", json);
        }
        return Ok(());
    }

    print_summary(input, &DocumentSummary::new(&doc));
    Ok(())
}

fn print_summary(input: &Path, summary: &DocumentSummary) {
    println!("{}", "Document Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), summary.title);
    println!("{}: {}", "Pages".bold(), summary.page_count);
    println!(
        "{}: {} ({:?})",
        "Content starts".bold(),
        summary.content_start_page,
        summary.start_method
    );
    println!("{}: {}", "Page offset".bold(), summary.offset);

    println!();
    println!("{}", "Page Categories".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for category in [
        PageCategory::Title,
        PageCategory::Toc,
        PageCategory::Preface,
        PageCategory::Main,
        PageCategory::Appendix,
        PageCategory::Glossary,
        PageCategory::Blank,
        PageCategory::Unknown,
    ] {
        let count = summary.count(category);
        if count > 0 {
            println!("{}: {}", category.as_str().bold(), count);
        }
    }

    if !summary.toc.is_empty() {
        println!();
        println!("{}", "Table of Contents".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for entry in &summary.toc {
            let section = entry.section.as_deref().unwrap_or("");
            println!(
                "{:>10} {} {}",
                section.dimmed(),
                entry.title,
                format!("p. {}", entry.page).dimmed()
            );
        }
    }
}

fn cmd_search(
    query: &str,
    inputs: &[PathBuf],
    source: &Source<'_>,
    options: &IngestOptions,
    search_options: SearchOptions,
    exclude: &[String],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let ingestor = Ingestor::new(options.clone());
    let documents = ingest_inputs(inputs, source, &ingestor, &pb)?;
    pb.finish_and_clear();

    let mut context =
        QueryContext::new(documents).with_engine(SearchEngine::new(search_options));
    for name in exclude {
        context.exclude(&DocumentId::from(name.as_str()))?;
    }

    let outcome = context.search(query)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.is_found() {
        println!("{}", describe_outcome(&outcome).green());
    } else {
        println!("{}", describe_outcome(&outcome).yellow());
    }
    Ok(())
}

fn cmd_page(
    input: &Path,
    source: &Source<'_>,
    options: &IngestOptions,
    page: i32,
    physical: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Arc::new(ingest(input, source, options)?);
    let id = doc.id().clone();

    let mut context = QueryContext::new(vec![doc]);
    context.select(&id)?;
    let view = if physical {
        context.show_physical_page(u32::try_from(page).unwrap_or(0))?
    } else {
        context.show_printed_page(page)?
    };

    log::debug!(
        "Physical page {} is printed page {}",
        view.physical_page,
        view.printed_page
    );
    println!("{}", describe_page(&view));
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagewise".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Manual structure inference and page-aware search");
    println!();
    println!("License: MIT");
}
