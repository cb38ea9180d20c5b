use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use safer_snapshot::loader::{load_results, load_snapshot, page_files};
use safer_snapshot::pipeline::Pipeline;
use safer_snapshot::utils::{self, fmt_number, fmt_pct};
use safer_snapshot::{AppConfig, CarrierSource, CompanySnapshot, InspectionSummary, SaferClient};

#[derive(Parser)]
#[command(name = "safer-snapshot", about = "FMCSA SAFER company snapshots", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print a readable summary instead of JSON (snapshot commands)
    #[arg(short, long, global = true)]
    summary: bool,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Snapshot by USDOT number
    Dot { dot_number: String },

    /// Snapshot by MC/MX number (with or without the MC- prefix)
    Mcmx { mc_mx: String },

    /// Search carriers by name
    Search {
        name: String,

        /// Also fetch the snapshot of the first result
        #[arg(long)]
        first: bool,
    },

    /// Snapshots for several USDOT numbers, fetched concurrently
    Batch {
        #[arg(required = true)]
        dot_numbers: Vec<String>,
    },

    /// Extract from saved HTML pages (a file or a directory of .html files)
    Parse {
        path: PathBuf,

        /// Treat the pages as name search results
        #[arg(long)]
        listing: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "safer_snapshot=info,warn",
        1 => "safer_snapshot=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Dot { dot_number } => {
            let client = SaferClient::new(&config.client)?;
            let snapshot = client
                .get_company_by_dot_number(&dot_number)
                .await
                .with_context(|| format!("USDOT {}", dot_number))?;
            print_snapshot(&snapshot, cli.summary)?;
        }

        Command::Mcmx { mc_mx } => {
            let client = SaferClient::new(&config.client)?;
            let snapshot = client
                .get_company_by_mc_mx(&mc_mx)
                .await
                .with_context(|| format!("MC/MX {}", mc_mx))?;
            print_snapshot(&snapshot, cli.summary)?;
        }

        Command::Search { name, first } => {
            let client = SaferClient::new(&config.client)?;
            let results = client.search_companies_by_name(&name).await?;
            if results.is_empty() {
                info!("No carriers match {:?}", name);
            }

            match results.first() {
                Some(top) if first => {
                    let snapshot = client.snapshot_for_result(top).await?;
                    print_snapshot(&snapshot, cli.summary)?;
                }
                _ => print_json(&results)?,
            }
        }

        Command::Batch { dot_numbers } => {
            let _t = utils::Timer::start(format!("Batch of {}", dot_numbers.len()));
            let client = Arc::new(SaferClient::new(&config.client)?);
            let report = Pipeline::new(client, &config.pipeline).run(&dot_numbers).await;

            let snapshots: BTreeMap<_, _> = report.snapshots.into_iter().collect();
            print_json(&snapshots)?;

            for dot in &report.not_found {
                warn!("{}: not found", dot);
            }
            for (dot, e) in &report.errors {
                warn!("{}: {}", dot, e);
            }
        }

        Command::Parse { path, listing } => {
            let _t = utils::Timer::start(format!("Parse {:?}", path));
            let files = page_files(&path)?;
            info!("Found {} pages in {:?}", files.len(), path);

            let mut pages = BTreeMap::new();
            let mut errors = 0usize;

            for file in &files {
                let value = if listing {
                    load_results(file).map(serde_json::to_value)
                } else {
                    load_snapshot(file).map(serde_json::to_value)
                };
                match value {
                    Ok(json) => {
                        pages.insert(file.display().to_string(), json?);
                    }
                    Err(e) => {
                        warn!("{:#}", e);
                        errors += 1;
                    }
                }
            }

            match (pages.len(), path.is_dir()) {
                (1, false) => {
                    if let Some(json) = pages.into_values().next() {
                        print_json(&json)?;
                    }
                }
                _ => print_json(&pages)?,
            }
            info!("Done: {} pages extracted, {} errors", files.len() - errors, errors);
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "—".to_string())
}

fn list(items: &[String]) -> String {
    if items.is_empty() { "—".to_string() } else { items.join(", ") }
}

fn print_snapshot(snapshot: &CompanySnapshot, summary: bool) -> Result<()> {
    if !summary {
        return print_json(snapshot);
    }

    let inspections = |label: &str, s: &InspectionSummary| {
        println!(
            "  {:<16}: {:>8} inspected  {:>6} OOS  {:>6}  (avg {})",
            label,
            fmt_number(s.inspections),
            fmt_number(s.out_of_service),
            fmt_pct(s.out_of_service_pct),
            fmt_pct(s.national_average),
        );
    };

    println!("─────────────────────────────────────────────────────────────");
    println!("  {}", snapshot.legal_name);
    if !snapshot.dba_name.is_empty() {
        println!("  dba {}", snapshot.dba_name);
    }
    println!("─────────────────────────────────────────────────────────────");
    println!("  USDOT           : {}", snapshot.dot_number);
    println!("  MC/MX/FF        : {}", list(&snapshot.mc_mx_ff_numbers));
    println!("  Status          : {}", snapshot.operating_status);
    println!("  Out of service  : {}", date(snapshot.out_of_service_date));
    println!("  Entity type     : {}", snapshot.entity_type);
    println!("  Physical address: {}", snapshot.physical_address);
    println!("  Mailing address : {}", snapshot.mailing_address);
    println!("  Phone           : {}", snapshot.phone);
    println!("  Power units     : {}", fmt_number(snapshot.power_units));
    println!("  Drivers         : {}", fmt_number(snapshot.drivers));
    println!(
        "  MCS-150         : {} ({} mi in {})",
        date(snapshot.mcs150_form_date),
        fmt_number(snapshot.mcs150_mileage),
        snapshot.mcs150_year
    );
    println!("  Operation       : {}", list(&snapshot.carrier_operation));
    println!("  Classification  : {}", list(&snapshot.operation_classification));
    println!("  Cargo           : {}", list(&snapshot.cargo_carried));
    println!("─────────────────────────────────────────────────────────────");
    inspections("US vehicle", &snapshot.us_vehicle_inspections);
    inspections("US driver", &snapshot.us_driver_inspections);
    inspections("US hazmat", &snapshot.us_hazmat_inspections);
    inspections("US IEP", &snapshot.us_iep_inspections);
    inspections("Canada vehicle", &snapshot.canada_vehicle_inspections);
    inspections("Canada driver", &snapshot.canada_driver_inspections);
    println!(
        "  US crashes      : {} total ({} fatal, {} injury, {} tow)",
        snapshot.us_crashes.total,
        snapshot.us_crashes.fatal,
        snapshot.us_crashes.injury,
        snapshot.us_crashes.tow
    );
    println!(
        "  Canada crashes  : {} total ({} fatal, {} injury, {} tow)",
        snapshot.canada_crashes.total,
        snapshot.canada_crashes.fatal,
        snapshot.canada_crashes.injury,
        snapshot.canada_crashes.tow
    );
    println!(
        "  Safety rating   : {} {} (rated {}, reviewed {})",
        snapshot.safety.rating,
        snapshot.safety.rating_type,
        date(snapshot.safety.rating_date),
        date(snapshot.safety.review_date)
    );
    println!("  As of           : {}", date(snapshot.latest_update_date));
    println!("─────────────────────────────────────────────────────────────");
    Ok(())
}
