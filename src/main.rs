use std::path::PathBuf;

use clap::{Parser, Subcommand};
use timetable_tools::assign;
use timetable_tools::config::PipelineConfig;
use timetable_tools::io::template::{packaged_template, save_template_json};
use timetable_tools::{Result, logging};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: {err}");
    }
    if let Err(err) = run(cli) {
        error!(client_error = err.is_client_error(), "{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Assign(args) => execute_assign(args),
        Command::Template(args) => execute_template(args),
    }
}

fn execute_assign(args: AssignArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(marker) = args.term_marker {
        config.term_marker = marker;
    }
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output_file_name));

    let report = assign::assign_file(
        &args.input,
        &args.reference,
        args.template.as_deref(),
        &output,
        &config,
    )?;

    for summary in &report.sheets {
        info!(
            sheet = %summary.sheet,
            assignments = summary.assignments,
            warnings = report.diagnostics.for_sheet(&summary.sheet).count(),
            "sheet summary"
        );
    }
    println!(
        "wrote {} assignments to {} ({} warnings)",
        report.total_assignments(),
        output.display(),
        report.diagnostics.len()
    );
    Ok(())
}

fn execute_template(args: TemplateArgs) -> Result<()> {
    let template = packaged_template()?;
    save_template_json(&args.output, &template)?;
    println!("wrote template to {}", args.output.display());
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Expand class schedule workbooks into teacher assignment sheets."
)]
struct Cli {
    /// Increase log output (-v debug, -vv trace); overrides RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the assignment workbook for a schedule.
    Assign(AssignArgs),
    /// Write the packaged template model as editable JSON.
    Template(TemplateArgs),
}

#[derive(clap::Args)]
struct AssignArgs {
    /// Uploaded schedule workbook (XLSX).
    #[arg(long)]
    input: PathBuf,

    /// Reference data with courses, classes and teachers (JSON or XLSX).
    #[arg(long)]
    reference: PathBuf,

    /// Output workbook path; defaults to the configured file name.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Template to use instead of the packaged one (JSON model or XLSX).
    #[arg(long)]
    template: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Term marker appended to the grade when selecting course variants.
    #[arg(long)]
    term_marker: Option<String>,
}

#[derive(clap::Args)]
struct TemplateArgs {
    /// Destination of the JSON template model.
    #[arg(long)]
    output: PathBuf,
}
