//! Certificate store role inspector CLI
//!
//! Loads the CA/RA certificates returned by an enrollment server and reports
//! which certificate signs messages, which one receives encrypted messages and
//! which one issues certificates.

use certstore_roles::{
    ConfigManager, ExportFormat, InspectWorkflow, InspectorConfiguration, OutputFormat,
};
use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "certstore-roles")]
#[command(about = "Resolve signer, recipient and issuer certificates from a CA/RA certificate set")]
#[command(long_about = "
certstore-roles - classify CA/RA certificate collections

EXAMPLES:
    # Inspect a PEM bundle returned by GetCACert
    certstore-roles inspect ca-certs.pem

    # Inspect a directory of certificates, list everything, JSON output
    certstore-roles inspect ./certs --list --format json

    # Create a configuration file with default certificate paths
    certstore-roles config init

ROLE RULES:
    issuer     first CA certificate (basicConstraints cA=TRUE, pathLen >= 0)
    signer     first end entity with keyUsage:digitalSignature, else issuer
    recipient  first end entity with keyUsage:keyEncipherment, then
               keyUsage:dataEncipherment, else issuer

ENVIRONMENT VARIABLES:
    RUST_LOG        Logging level (debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve roles for certificate files or directories
    Inspect {
        /// PEM bundles, DER certificates or directories (defaults to config)
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormatArg>,

        /// List every certificate in the collection
        #[arg(short, long)]
        list: bool,

        /// Verbose output (debug logging of every selection step)
        #[arg(short, long)]
        verbose: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Create default configuration file
    Init,

    /// Print the configuration file path
    Path,

    /// Export configuration
    Export {
        /// Export format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ExportFormatArg,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum ExportFormatArg {
    Toml,
    Json,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Toml => ExportFormat::Toml,
            ExportFormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };

    match cli.command {
        Commands::Inspect {
            paths,
            format,
            list,
            verbose,
        } => {
            let config = config_manager.load_or_default()?;
            init_logging(&config, verbose);
            handle_inspect_command(&config, paths, format, list)
        }
        Commands::Config(config_cmd) => {
            init_logging(&InspectorConfiguration::default(), false);
            handle_config_command(&config_manager, config_cmd)
        }
    }
}

fn init_logging(config: &InspectorConfiguration, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn handle_inspect_command(
    config: &InspectorConfiguration,
    paths: Vec<PathBuf>,
    format: Option<OutputFormatArg>,
    list: bool,
) -> Result<()> {
    let paths = if paths.is_empty() {
        config.certificate_paths.clone()
    } else {
        paths
    };
    let format = format.map_or(config.output_format, OutputFormat::from);

    let workflow = InspectWorkflow::new();
    let report = workflow.run_paths(paths)?;

    match format {
        OutputFormat::Text => print!("{}", report.render_text(list || config.list_certificates)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn handle_config_command(config_manager: &ConfigManager, config_cmd: ConfigCommands) -> Result<()> {
    match config_cmd {
        ConfigCommands::Show => match config_manager.load_existing()? {
            Some(config) => {
                println!("📋 Current Configuration:");
                if config.certificate_paths.is_empty() {
                    println!("  Certificate paths: (none)");
                } else {
                    println!("  Certificate paths:");
                    for path in &config.certificate_paths {
                        println!("    {}", path.display());
                    }
                }
                println!("  Output format: {}", config.output_format);
                println!("  Log level: {}", config.log_level);
                println!("  List certificates: {}", config.list_certificates);
                println!(
                    "  Configuration file: {}",
                    config_manager.config_path().display()
                );
            }
            None => {
                println!("📋 No configuration file found. Use 'config init' to create one.");
            }
        },

        ConfigCommands::Init => {
            let _config = config_manager.load_or_create_default()?;
            println!(
                "✅ Configuration initialized: {}",
                config_manager.config_path().display()
            );
        }

        ConfigCommands::Path => {
            println!("{}", config_manager.config_path().display());
        }

        ConfigCommands::Export { format, output } => {
            let content = config_manager.export_config(format.into())?;

            if let Some(output_path) = output {
                std::fs::write(&output_path, content).into_diagnostic()?;
                println!("✅ Configuration exported to: {}", output_path.display());
            } else {
                println!("{content}");
            }
        }
    }
    Ok(())
}
