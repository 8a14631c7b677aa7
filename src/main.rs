//! iosrec CLI entrypoint.
//!
//! This is the main entrypoint for the iosrec command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ios_reconcile::cli::{Cli, Commands, OutputFormatter};
use ios_reconcile::config::{ConfigValidator, DocumentParser, TaskDocument, find_document};
use ios_reconcile::error::{ReconError, Result, SchemaError};
use ios_reconcile::planner::normalize::denormalize;
use ios_reconcile::reconciler::Reconciler;
use ios_reconcile::resources::ResourceKind;
use ios_reconcile::tree::Value;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // The working directory's .env must be visible to clap's env fallbacks.
    let early_env = DocumentParser::new().load_dotenv();
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let formatter = OutputFormatter::new(cli.output);
    match early_env.and_then(|()| run(cli, &formatter)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{}", formatter.format_error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Initializes logging on stderr.
fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Dispatches a subcommand.
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    match cli.command {
        Commands::Validate { warnings } => cmd_validate(cli.document.as_ref(), warnings, formatter),
        Commands::Run { running_config } => {
            cmd_run(cli.document.as_ref(), running_config.as_deref(), formatter)
        }
        Commands::Parse { resource, file } => cmd_parse(resource, &file, formatter),
        Commands::Resources => {
            println!("{}", formatter.format_resources());
            Ok(())
        }
    }
}

/// Validates the task document and its config.
fn cmd_validate(
    document_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let document = load_document(document_path)?;
    let validator = ConfigValidator::new();
    let mut result = validator.validate_document(&document)?;

    let resource = document.resource.resource();
    let raw = document.config.as_ref().and_then(Value::from_json);
    let (_, params) = validator.check_params(resource.schema, raw.as_ref());
    result.warnings.extend(params.warnings);

    for problem in &params.errors {
        eprintln!("{}", formatter.format_error(&problem.to_string()));
    }
    if let Some(first) = params.errors.first() {
        return Err(ReconError::Schema(SchemaError::invalid(
            first.field.clone(),
            first.message.clone(),
        )));
    }

    // Runs the normalizer too, which rejects duplicate identifiers.
    Reconciler::new(resource).prepare(raw.as_ref())?;

    println!(
        "{}",
        formatter.format_validation(document.resource, document.state, &result, show_warnings)
    );
    Ok(())
}

/// Runs the task document.
fn cmd_run(
    document_path: Option<&PathBuf>,
    running_config: Option<&Path>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let document = load_document(document_path)?;

    let device = match running_config {
        Some(path) if document.state.reads_device() => {
            Some(DocumentParser::new().load_running_config(path)?)
        }
        Some(path) => {
            debug!("Ignoring running config {} for state {}", path.display(), document.state);
            None
        }
        None => None,
    };

    let outcome = Reconciler::for_kind(document.resource).run(&document, device.as_deref())?;
    print!("{}", formatter.format_outcome(&outcome));
    Ok(())
}

/// Parses a device configuration file.
fn cmd_parse(resource: ResourceKind, file: &Path, formatter: &OutputFormatter) -> Result<()> {
    let text = DocumentParser::new().load_running_config(file)?;
    let have = Reconciler::for_kind(resource).parse(&text)?;
    info!("Parsed {resource} from {}", file.display());
    println!("{}", formatter.format_structured(&denormalize(have)));
    Ok(())
}

/// Locates and loads the task document, with the `.env` next to it.
fn load_document(document_path: Option<&PathBuf>) -> Result<TaskDocument> {
    let path = document_path.map_or_else(|| find_document("."), |path| Ok(path.clone()))?;
    debug!("Loading task document from: {}", path.display());

    DocumentParser::new()
        .with_base_path(path.parent().unwrap_or_else(|| Path::new(".")))
        .load_dotenv()?;

    DocumentParser::new().load_file(&path)
}
