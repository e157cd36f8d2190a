use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use compass_matrix::{
    ExtractOptions, ExtractionReport, PageSelection, PdfSource, build_prompt, extract_form_fields,
    extract_tables_from_path, read_csv_as_string, read_questions, write_table_csv,
};
use tracing_subscriber::EnvFilter;

const EXIT_EMPTY: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "compass-matrix",
    version,
    about = "Prepare PDF tables and spreadsheet questions for model analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract every table row and write them as CSV.
    Extract(ExtractArgs),
    /// Print the text form fields of a PDF.
    Fields(FieldsArgs),
    /// Print the questions of a spreadsheet, one per line.
    Questions(QuestionsArgs),
    /// Build the model prompt from a PDF and a question spreadsheet.
    Prompt(PromptArgs),
}

#[derive(Debug, Args)]
struct TableArgs {
    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// List extraction warnings.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path.
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    table: TableArgs,
}

#[derive(Debug, Args)]
struct FieldsArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Debug, Args)]
struct QuestionsArgs {
    /// Input .xlsx path.
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Debug, Args)]
struct PromptArgs {
    /// Input PDF path.
    #[arg(short, long)]
    document: PathBuf,

    /// Spreadsheet with a Questions column.
    #[arg(short, long)]
    questions: PathBuf,

    /// Ask the model for explanation and confidence_score per answer.
    #[arg(long)]
    include_explanation: bool,

    /// Write the prompt here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    table: TableArgs,
}

fn parse_options(args: &TableArgs) -> Result<ExtractOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .context("failed to parse --pages")?;

    Ok(ExtractOptions {
        pages,
        min_cols: args.min_cols,
    })
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!("  - {warning}");
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExitCode> {
    let options = parse_options(&args.table)?;
    let (rows, report) = extract_tables_from_path(&args.input, &options)
        .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))?;
    log_report(&report, args.table.verbose);
    if rows.is_empty() {
        eprintln!("No tables found in the PDF.");
        return Ok(ExitCode::from(EXIT_EMPTY));
    }

    write_table_csv(&args.output, &rows)
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;
    eprintln!(
        "wrote {} row(s) from {} table(s)",
        report.row_count, report.table_count
    );
    Ok(ExitCode::SUCCESS)
}

fn run_fields(args: &FieldsArgs) -> Result<ExitCode> {
    let fields = extract_form_fields(PdfSource::Path(&args.input))
        .with_context(|| format!("failed to read form fields of '{}'", args.input.display()))?;
    for (name, value) in &fields {
        println!("{name}\t{value}");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_questions(args: &QuestionsArgs) -> Result<ExitCode> {
    let questions = read_questions(&args.input)
        .with_context(|| format!("failed to read questions from '{}'", args.input.display()))?;
    if questions.is_empty() {
        eprintln!("Please ensure the Excel file contains questions in a 'Questions' column.");
        return Ok(ExitCode::from(EXIT_EMPTY));
    }
    for question in &questions {
        println!("{question}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Copies the document into `workdir`, extracts its tables into a CSV file
/// there, and reads the file back as the prompt blob.
fn stage_table_blob(
    document: &Path,
    workdir: &Path,
    args: &TableArgs,
) -> Result<Option<String>> {
    let options = parse_options(args)?;
    let staged_pdf = workdir.join("document.pdf");
    fs::copy(document, &staged_pdf)
        .with_context(|| format!("failed to stage '{}'", document.display()))?;

    let (rows, report) = extract_tables_from_path(&staged_pdf, &options)
        .with_context(|| format!("failed to extract tables from '{}'", document.display()))?;
    log_report(&report, args.verbose);
    if rows.is_empty() {
        return Ok(None);
    }

    let csv_path = workdir.join("extracted_table_data.csv");
    write_table_csv(&csv_path, &rows).context("failed to write extracted table CSV")?;
    let blob = read_csv_as_string(&csv_path).context("failed to read extracted table CSV")?;
    Ok(Some(blob))
}

fn run_prompt(args: &PromptArgs) -> Result<ExitCode> {
    let workdir = tempfile::Builder::new()
        .prefix("compass-matrix-")
        .tempdir()
        .context("failed to create scratch directory")?;

    let Some(blob) = stage_table_blob(&args.document, workdir.path(), &args.table)? else {
        eprintln!("No tables found in the PDF.");
        return Ok(ExitCode::from(EXIT_EMPTY));
    };

    let questions = read_questions(&args.questions).with_context(|| {
        format!(
            "failed to read questions from '{}'",
            args.questions.display()
        )
    })?;
    if questions.is_empty() {
        eprintln!("Please ensure the Excel file contains questions in a 'Questions' column.");
        return Ok(ExitCode::from(EXIT_EMPTY));
    }

    let prompt = build_prompt(&blob, &questions, args.include_explanation);
    match &args.output {
        Some(path) => fs::write(path, &prompt)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => println!("{prompt}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("compass_matrix=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Fields(args) => run_fields(args),
        Commands::Questions(args) => run_questions(args),
        Commands::Prompt(args) => run_prompt(args),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
