use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use owo_colors::OwoColorize;
use todology_core::assignment::{filter_assignments, start_of_previous_month};
use todology_core::auth::{MAX_LOGIN_RETRIES, login_with_retry};
use todology_core::config::{Config, DEFAULT_CONFIG_FILE};
use todology_core::feed::fetch_feed;
use todology_core::import::import_assignments;
use todology_core::ledger::ImportLedger;
use todology_core::push::TaskPusher;
use todology_todoist::TodoistClient;

#[derive(Parser)]
#[command(name = "todology")]
#[command(about = "Import Schoology calendar assignments into Todoist")]
struct Cli {
    /// Config file to read
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Show what would be imported without touching Todoist or the ledger
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let mut ledger = ImportLedger::load(&config.ledger_path());
    log::debug!("{} assignments imported by earlier runs", ledger.len());

    let cutoff = start_of_previous_month(Local::now().date_naive());

    if cli.dry_run {
        return dry_run(&config, &ledger, cutoff).await;
    }

    let client = login_with_retry(MAX_LOGIN_RETRIES, || {
        TodoistClient::login(&config.api_token)
    })
    .await
    .context("Could not log in to Todoist")?;

    let http = reqwest::Client::new();
    let components = fetch_feed(&http, &config.feed_address)
        .await
        .context("Could not fetch the calendar feed")?;

    let mut pusher = TaskPusher::new(client);
    let stats = import_assignments(&config, &components, &mut ledger, &mut pusher, cutoff).await?;

    if stats.push.created > 0 {
        println!(
            "\nImported {} assignments into {}",
            stats.push.created.green(),
            config.project.bold()
        );
    } else {
        println!("\nNothing new to import");
    }

    Ok(())
}

async fn dry_run(config: &Config, ledger: &ImportLedger, cutoff: NaiveDate) -> Result<()> {
    let http = reqwest::Client::new();
    let components = fetch_feed(&http, &config.feed_address)
        .await
        .context("Could not fetch the calendar feed")?;

    let report = filter_assignments(&components, ledger, cutoff);
    for assignment in &report.assignments {
        println!(
            "Would import: {} {}",
            assignment.due_date.dimmed(),
            assignment.title
        );
    }
    println!(
        "\n{} new, {} already imported, {} before {}",
        report.assignments.len().green(),
        report.already_imported,
        report.before_cutoff,
        cutoff
    );

    Ok(())
}

/// Log to stdout, `info` unless `RUST_LOG` says otherwise.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
