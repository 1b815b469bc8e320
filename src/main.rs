//! Sequent CLI - dependency-aware task labeling for Todoist.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use sequent::{Dispatcher, Labeler, ResilientApi, RestApi, ServerConfig, TaskStore, server, sweep};
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sequent")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("sequent.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_api() -> Result<ResilientApi<RestApi>> {
    let token =
        std::env::var("TODOIST_ACCESS_TOKEN").context("TODOIST_ACCESS_TOKEN is not set")?;
    Ok(ResilientApi::new(RestApi::new(token)))
}

fn run(cli: Cli) -> Result<()> {
    let labeler = Labeler::new(&cli.label);

    match cli.command {
        Command::Serve { port } => {
            let store = TaskStore::new(build_api()?);
            let dispatcher = Dispatcher::new(store, labeler);

            println!("{} Listening for webhooks on port {}", "→".blue(), port);

            let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
            rt.block_on(server::run(ServerConfig::new(port), dispatcher))
                .context("Webhook server error")?;
        }

        Command::Sweep => {
            let mut store = TaskStore::new(build_api()?);
            let report = sweep::run(&mut store, &labeler).context("Sweep failed")?;

            println!(
                "{} Examined {} task(s), updated {}",
                "✓".green(),
                report.examined,
                report.updated
            );
        }

        Command::Check { id } => {
            let mut store = TaskStore::new(build_api()?);
            let task = store.task(&id).context("Failed to fetch task")?;

            match task {
                Some(mut task) => {
                    let changed = labeler
                        .reconcile(&mut store, &mut task, None)
                        .context("Failed to reconcile task")?;

                    let marker = if task.has_label(labeler.label()) {
                        format!("@{}", labeler.label()).yellow()
                    } else {
                        "unmarked".dimmed()
                    };
                    let status = if changed { "updated" } else { "unchanged" };
                    println!("{} {} {} ({})", "✓".green(), task.id.cyan(), marker, status);
                }
                None => {
                    eprintln!("{} Task not found: {}", "✗".red(), id);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
