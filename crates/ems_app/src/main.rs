use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use ems_client::{ApiClient, Credential};
use ems_core::ExportConfig;
use ems_core::logging;
use ems_export::{ExportArtifact, ExportDirectory, ExportError, Exporter, FAILURE_NOTICE};

#[derive(Parser, Debug)]
#[command(
    name = "ems",
    about = "Export employee records to spreadsheets, PDFs, Word documents and archives",
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Config file (defaults to ~/.ems/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Bearer token for the records service
    #[arg(long, env = "EMS_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,
    /// Override the configured service URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Override the configured export directory
    #[arg(long, global = true)]
    exports_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and print a bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "EMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// All employees as one spreadsheet
    Excel,
    /// All employees as one PDF, a page each
    Pdf,
    /// One profile PDF per employee, zipped
    Zip,
    /// One employee's profile as a Word document
    Word { id: i64 },
    /// One employee's profile as a PDF
    Profile { id: i64 },
    /// List artifacts in the export directory
    List,
    /// Delete an artifact from the export directory
    Remove { file: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match logging::init_logging(&config.logs_dir, &config.log_level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {e:#}");
            None
        }
    };
    info!("Starting ems v{}", env!("CARGO_PKG_VERSION"));

    match run(cli, &config) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(global: &GlobalArgs) -> Result<ExportConfig> {
    let path = match &global.config {
        Some(path) => path.clone(),
        None => ExportConfig::config_path()?,
    };
    let mut config = ExportConfig::load_or_default(&path);
    config.apply_env();
    if let Some(url) = &global.base_url {
        config.base_url = url.clone();
    }
    if let Some(dir) = &global.exports_dir {
        config.exports_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Exit status for an export that produced no artifact.
const NO_ARTIFACT: u8 = 1;
/// Exit status when the export directory cannot be written.
const DIRECTORY_UNWRITABLE: u8 = 2;

fn run(cli: Cli, config: &ExportConfig) -> Result<ExitCode> {
    let directory = ExportDirectory::new(&config.exports_dir);
    let token = cli.global.token;

    let code = match cli.command {
        Command::Login { email, password } => {
            let client = ApiClient::from_config(config)?;
            let credential = client.login(&email, &password)?;
            println!("{}", credential.token());
            0
        }
        Command::List => {
            for artifact in directory.list()? {
                println!("{}", describe(&artifact)?);
            }
            0
        }
        Command::Remove { file } => {
            directory
                .remove(&file)
                .with_context(|| format!("Failed to remove {file}"))?;
            info!(file = %file, "artifact removed");
            0
        }
        Command::Excel => export(token, config, directory, |e, c| e.export_all_excel(c))?,
        Command::Pdf => export(token, config, directory, |e, c| e.export_all_pdf(c))?,
        Command::Zip => export(token, config, directory, |e, c| e.export_all_pdfs_zip(c))?,
        Command::Word { id } => export(token, config, directory, |e, c| {
            e.export_employee_word(id, c)
        })?,
        Command::Profile { id } => export(token, config, directory, |e, c| {
            e.export_employee_pdf(id, c)
        })?,
    };
    Ok(ExitCode::from(code))
}

fn export<F>(
    token: Option<String>,
    config: &ExportConfig,
    directory: ExportDirectory,
    operation: F,
) -> Result<u8>
where
    F: FnOnce(&Exporter<ApiClient>, &Credential) -> Result<Option<ExportArtifact>, ExportError>,
{
    let credential = token
        .map(Credential::new)
        .context("A token is required: pass --token or set EMS_TOKEN")?;
    let exporter = Exporter::new(ApiClient::from_config(config)?, directory);
    report(operation(&exporter, &credential))
}

/// Map an export outcome to an exit status. The exporter has already
/// logged failures; only the user-facing notice is printed here.
fn report(result: Result<Option<ExportArtifact>, ExportError>) -> Result<u8> {
    match result {
        Ok(Some(artifact)) => {
            println!("{}", describe(&artifact)?);
            Ok(0)
        }
        Ok(None) => {
            eprintln!("{FAILURE_NOTICE}");
            Ok(NO_ARTIFACT)
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(DIRECTORY_UNWRITABLE)
        }
    }
}

fn describe(artifact: &ExportArtifact) -> Result<String> {
    let size = artifact
        .byte_size()
        .with_context(|| format!("Failed to stat {}", artifact.path().display()))?;
    Ok(format!("{} ({size} bytes)", artifact.path().display()))
}
