use std::{fmt::Write as _, path::PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{load_settings, run_load, DirectoryClient, DirectorySession, SessionPhase};
use shared::domain::UserRecord;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Fetch a batch of random users and print the ones matching the filters")]
struct Cli {
    /// Case-insensitive substring of "first last".
    #[arg(long, default_value = "")]
    name: String,
    /// Exact country; empty accepts all.
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long)]
    json: bool,
    /// Print the distinct countries of the batch instead of users.
    #[arg(long)]
    countries: bool,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    settings.apply_overrides(cli.api_url.clone(), cli.timeout_secs);
    tracing::debug!(api_url = %settings.api_url, "fetching user batch");
    let client = DirectoryClient::from_settings(&settings)?;

    let mut session = DirectorySession::new();
    run_load(&mut session, &client).await;
    if session.phase() == SessionPhase::Errored {
        tracing::warn!("user batch load failed");
        return Err(anyhow!(session
            .error()
            .unwrap_or(shared::error::FETCH_FAILED_MESSAGE)
            .to_string()));
    }

    session.set_query(cli.name.as_str());
    session.set_country(cli.country.as_str());
    tracing::info!(
        users = session.users().len(),
        countries = session.countries().len(),
        visible = session.visible_indices().len(),
        "user batch loaded"
    );

    let output = if cli.countries {
        render_countries(session.countries(), cli.json)?
    } else {
        let users: Vec<&UserRecord> = session.visible_users().collect();
        render_users(&users, cli.json)?
    };
    print!("{output}");
    Ok(())
}

fn render_users(users: &[&UserRecord], json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(users)?));
    }

    let mut out = String::new();
    for user in users {
        writeln!(out, "{}", user.full_name())?;
        writeln!(out, "  {}", user.email)?;
        writeln!(out, "  {}", user.country)?;
    }
    writeln!(out, "{} user(s)", users.len())?;
    Ok(out)
}

fn render_countries(countries: &[String], json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(countries)?));
    }
    Ok(countries.iter().map(|country| format!("{country}\n")).collect())
}
