use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use reqlens_cli::commands::{execute_envs, execute_init, execute_request, execute_scan};
use reqlens_cli::config::Config;
use reqlens_cli::ReportFormat;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "reqlens",
    version,
    about = "Recovers the HTTP surface of ASP.NET projects from source text and synthesizes ready-to-fire requests"
)]
struct Cli {
    /// Path to the configuration file (defaults to ./reqlens.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (debug-level logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to this file in addition to the console
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan C# sources and list the endpoints they declare
    Scan {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Synthesize a request for one endpoint of a source file
    Request {
        /// C# source file containing the controller
        file: PathBuf,

        /// Endpoint to use: an index from `scan`, or "METHOD /route"
        #[arg(short, long)]
        endpoint: String,

        /// Environment name (defaults to the active one)
        #[arg(long)]
        env: Option<String>,

        /// Resolve body/form parameter types across the workspace first
        #[arg(long)]
        resolve: bool,

        /// Print a curl command instead of the request JSON
        #[arg(long)]
        curl: bool,
    },
    /// List configured environments
    Envs,
    /// Write a default reqlens.toml
    Init {
        /// Where to write the config file
        #[arg(default_value = "reqlens.toml")]
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) =
        reqlens_core::logging::init_from_args(cli.log_level.clone(), cli.log_file.clone(), cli.verbose)
    {
        eprintln!("{} failed to initialize logging: {:#}", "error:".red().bold(), e);
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan {
            paths,
            format,
            output,
        } => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            execute_scan(&paths, format, output.as_deref(), &config)
        }
        Command::Request {
            file,
            endpoint,
            env,
            resolve,
            curl,
        } => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            execute_request(&file, &endpoint, env.as_deref(), resolve, curl, &config)
        }
        Command::Envs => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            execute_envs(&config)
        }
        Command::Init { path } => execute_init(&path),
    }
}
