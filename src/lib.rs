//! # steampunk-scanner
//!
//! Quality scanning for Ansible content.
//!
//! `steampunk-scanner` reads Ansible task files, playbooks, roles and
//! collections, reduces every task to its structure (which modules and
//! directives it uses, with which parameter names), submits those task
//! descriptors to a remote scanning service, and reports the service's
//! findings against the file and line each task came from.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use steampunk_scanner::{api, config::Config, entity::Resolver, output, scan};
//!
//! let mut config = Config::load(None).expect("failed to load config");
//! config.apply_env();
//!
//! let inputs = scan::ScanInputs {
//!     playbooks: vec!["site.yml".into()],
//!     ..Default::default()
//! };
//! let tasks = inputs.resolve(&Resolver::from_current_dir()?)?;
//!
//! let client = api::Client::new(&config.api)?
//!     .with_credentials(api::Credentials::from_env_or_prompt()?);
//! let report = scan::run_scan(&client, &tasks)?;
//!
//! print!("{}", output::format_report(&report, &output::OutputFormat::Text));
//! # Ok::<(), steampunk_scanner::error::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline:
//!
//! 1. **[`yaml`]**: parse YAML, tagging every mapping with its start line.
//! 2. **[`task`]**: normalize raw tasks into [`task::TaskRecord`]s.
//! 3. **[`entity`]**: resolve task files, playbooks, roles and collections
//!    (or auto-detect playbooks) into task lists.
//! 4. **[`api`]**: talk to the scanning service.
//! 5. **[`scan`]**: submit tasks and pair findings with them by position.
//! 6. **[`finding`]**: core data types ([`finding::Diagnostic`], [`finding::ScanReport`]).
//! 7. **[`output`]**: format reports as text, pretty text, JSON, or SARIF.
//!
//! [`config`] and [`error`] support the whole pipeline.

pub mod api;
pub mod config;
pub mod entity;
pub mod error;
pub mod finding;
pub mod output;
pub mod scan;
pub mod task;
pub mod yaml;
