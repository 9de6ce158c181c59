#![allow(clippy::print_stdout)]

use std::time::Instant;

use clap::Parser;
use eyre::Context;
use futures::{StreamExt, stream::FuturesUnordered};
use persimmon_unit::{PersistenceConfig, PersistenceUnit};
use serde::Serialize;
use sqlx::{AnyConnection, Connection};
use tracing::{error, info};

/// Probe the databases declared in a persistence unit file
#[derive(Parser, Debug)]
pub struct Check {
    /// Path to the unit file.
    #[arg(short, long, value_name = "PATH", default_value = "persistence.toml")]
    config: String,

    /// Probe only the named unit instead of all declared ones.
    #[arg(short, long, value_name = "NAME")]
    unit: Option<String>,

    /// Print the report as JSON on stdout instead of log lines.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct ProbeReport {
    unit: String,
    backend: String,
    ok: bool,
    latency_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Check {
    pub async fn run(&self) -> eyre::Result<()> {
        let config =
            PersistenceConfig::load(&self.config).context("Failed to load persistence unit file")?;

        let selected = match &self.unit {
            Some(name) => vec![config.unit(name)?],
            None => config.units().collect::<Vec<_>>(),
        };

        if selected.is_empty() {
            return Err(eyre::eyre!(
                "The unit file declares no units, add a [unit.NAME] table to {}",
                self.config
            ));
        }

        sqlx::any::install_default_drivers();

        let mut reports = selected
            .into_iter()
            .map(probe)
            .collect::<FuturesUnordered<_>>()
            .collect::<Vec<_>>()
            .await;

        reports.sort_by(|a, b| a.unit.cmp(&b.unit));

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&reports).context("Failed to serialize report")?
            );
        } else {
            for report in &reports {
                match &report.error {
                    None => info!(
                        "{}: ok ({}, {} ms)",
                        report.unit, report.backend, report.latency_ms
                    ),
                    Some(e) => error!(
                        "{}: failed after {} ms: {e}",
                        report.unit, report.latency_ms
                    ),
                }
            }
        }

        if reports.iter().any(|e| !e.ok) {
            return Err(eyre::eyre!("One or more probes failed."));
        }

        Ok(())
    }
}

async fn probe(unit: &PersistenceUnit) -> ProbeReport {
    let backend = unit
        .kind()
        .map_or_else(|_| "unknown".to_string(), |e| e.to_string());

    let started = Instant::now();
    let outcome = try_probe(unit).await;

    ProbeReport {
        unit: unit.name.clone(),
        backend,
        ok: outcome.is_ok(),
        latency_ms: started.elapsed().as_millis(),
        error: outcome.err().map(|e| format!("{e:#}")),
    }
}

async fn try_probe(unit: &PersistenceUnit) -> eyre::Result<()> {
    unit.kind()
        .context("Failed to determine the backend from the URL")?;

    let url = unit
        .resolve_url()
        .context("Failed to resolve the connection URL")?;

    let mut conn = AnyConnection::connect(&url)
        .await
        .context("Failed to connect to database")?;

    sqlx::query("SELECT 1")
        .fetch_one(&mut conn)
        .await
        .context("Probe query failed")?;

    Ok(())
}
