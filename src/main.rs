mod cli;

use clap::Parser;
use cli::{AccountCommands, Cli, Commands};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use steampunk_scanner::api::{self, Client, Credentials};
use steampunk_scanner::config::Config;
use steampunk_scanner::entity::Resolver;
use steampunk_scanner::error::{Error, Result};
use steampunk_scanner::output::{self, OutputFormat};
use steampunk_scanner::scan::{self, ScanInputs};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Scan {
            paths,
            tasks,
            playbooks,
            roles,
            collections,
            format,
            output: output_path,
            config: config_path,
            raw_paths,
        } => {
            let inputs = ScanInputs {
                tasks,
                playbooks,
                roles,
                collections,
                detect: paths,
            };
            run_scan(
                &inputs,
                &format,
                output_path.as_deref(),
                config_path.as_deref(),
                raw_paths,
            )
        }

        Commands::Account {
            command,
            config: config_path,
        } => run_account(command, config_path.as_deref()).map(|()| true),
    };

    match outcome {
        Ok(passed) => std::process::exit(if passed { 0 } else { 1 }),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

/// Initialize logging based on verbosity level. Logs go to stderr so stdout
/// only ever carries the report.
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = Config::load(path).map_err(Error::Config)?;
    config.apply_env();
    Ok(config)
}

/// Resolves, scans and reports. Returns whether the scan passed.
fn run_scan(
    inputs: &ScanInputs,
    format: &OutputFormat,
    output_path: Option<&Path>,
    config_path: Option<&Path>,
    raw_paths: bool,
) -> Result<bool> {
    if inputs.is_empty() {
        return Err(Error::Config(
            "nothing to scan: pass paths, or use --tasks, --playbooks, --roles or --collections"
                .to_string(),
        ));
    }

    let config = load_config(config_path)?;
    let resolver = if raw_paths {
        Resolver::new()
    } else {
        Resolver::from_current_dir()?
    };

    let tasks = inputs.resolve(&resolver)?;

    let mut client = Client::new(&config.api)?;
    if !tasks.is_empty() {
        client = client.with_credentials(Credentials::from_env_or_prompt()?);
    }
    let report = scan::run_scan(&client, &tasks)?;

    if output_path.is_some() || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    let formatted = output::format_report(&report, format);

    if let Some(out_path) = output_path {
        std::fs::write(out_path, &formatted).map_err(|source| Error::Io {
            path: PathBuf::from(out_path),
            source,
        })?;
        eprintln!("Output written to {}", out_path.display());
    } else {
        print!("{formatted}");
    }

    Ok(report.passed)
}

fn run_account(command: AccountCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let client = Client::new(&config.api)?;

    let message = match command {
        AccountCommands::Register { username } => {
            let password = api::prompt_password()?;
            client.register(&username, &password)?
        }
        AccountCommands::Activate {
            username,
            verification_code,
        } => client.activate(&username, &verification_code)?,
    };

    println!("{message}");
    Ok(())
}
