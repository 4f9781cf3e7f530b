use clap::{Parser, Subcommand};
use std::path::PathBuf;
use steampunk_scanner::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "steampunk-scanner",
    version,
    about = "Quality scanner for Ansible playbooks, roles and collections"
)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan Ansible content and report findings per file and line
    Scan {
        /// Files or directories to search for playbooks
        paths: Vec<PathBuf>,

        /// Task files
        #[arg(long, short = 't', num_args = 1..)]
        tasks: Vec<PathBuf>,

        /// Playbook files
        #[arg(long, short = 'p', num_args = 1..)]
        playbooks: Vec<PathBuf>,

        /// Role directories
        #[arg(long, short = 'r', num_args = 1..)]
        roles: Vec<PathBuf>,

        /// Collection directories
        #[arg(long, short = 'c', num_args = 1..)]
        collections: Vec<PathBuf>,

        /// Output format
        #[arg(long, short, default_value = "text", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report file paths exactly as given instead of relative to the
        /// working directory
        #[arg(long)]
        raw_paths: bool,
    },

    /// Manage your scanner account
    Account {
        #[command(subcommand)]
        command: AccountCommands,

        /// Custom config file path
        #[arg(long, global = true)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Register a new account (the password is prompted for)
    Register {
        /// User email
        username: String,
    },

    /// Activate a pending account
    Activate {
        /// User email
        username: String,

        /// Verification code from the activation email
        verification_code: String,
    },
}
