use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use blogmatter::config::Config;
use blogmatter::loader::{load_dir, LoadReport};
use blogmatter::logger::configure_logger;
use blogmatter::manifest::ContentManifest;

use crate::config::open_config;
use crate::post::{post_cmd, PostArgs};

mod config;
mod post;

const CFG_FILE_NAME: &str = "blogmatter.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse every post and write the manifest
    Build(BuildArgs),
    /// Parse every post and report the broken ones
    Check,
    /// Create a new draft post
    New(PostArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Include drafts in the manifest
    #[arg(short, long)]
    drafts: bool,

    /// Manifest file. Defaults to `manifest_file` from the configuration
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn load(config: &Config) -> Result<LoadReport> {
    info!("Loading content from {}", config.paths.content_dir.display());
    load_dir(&config.paths.content_dir, &config.content.extensions, config.content.worker_threads())
}

fn build_cmd(config: &Config, args: BuildArgs) -> Result<ExitCode> {
    let report = load(config)?;
    for (path, err) in report.failures.iter() {
        warn!("{}: {}", path.display(), err);
    }

    let manifest = ContentManifest::build(&report.records)?;
    let output = args.output.unwrap_or_else(|| config.paths.manifest_file.clone());
    let include_drafts = args.drafts || config.content.include_drafts;
    manifest.write_json(&output, include_drafts, &config.content.summary_fold, config.content.page_size)?;

    info!("{} published, {} drafts, {} failed",
        manifest.published().count(), manifest.drafts().count(), report.failures.len());
    Ok(ExitCode::SUCCESS)
}

fn check_cmd(config: &Config) -> Result<ExitCode> {
    let report = load(config)?;
    for (path, err) in report.failures.iter() {
        eprintln!("{}: {}", path.display(), err);
    }

    let manifest = ContentManifest::build(&report.records)?;
    println!("{} posts ok ({} drafts), {} broken",
             manifest.len(), manifest.drafts().count(), report.failures.len());

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Loads the configuration and installs the logger. `None` means the error was already
/// reported to the user.
fn setup(config_path: Option<String>, verbose: bool) -> Option<Config> {
    let config = match open_config(config_path.map(PathBuf::from)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:#}", err);
            eprintln!("Please run blogmatter --help");
            return None;
        }
    };

    if let Err(err) = configure_logger(&config, verbose) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }
    Some(config)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Command::New(post_args) => post_cmd(post_args).map(|_| ExitCode::SUCCESS),
        Command::Build(build_args) => match setup(args.config_path, args.verbose) {
            Some(config) => build_cmd(&config, build_args),
            None => Ok(ExitCode::FAILURE),
        },
        Command::Check => match setup(args.config_path, args.verbose) {
            Some(config) => check_cmd(&config),
            None => Ok(ExitCode::FAILURE),
        },
    }
}
