//! Diagnostics CLI for the curriculum week resolver.
//!
//! Two subcommands mirror the two public operations:
//!
//! ```text
//! cfm list                 print every discovered week as JSON rows
//! cfm week 2025-11-03      resolve a date (snapped to its Monday)
//! cfm week "nov 3–nov 9"   resolve a human week label
//! ```

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use tracing_subscriber::EnvFilter;

use cfm_client::{WeekResolver, monday_from_label, monday_of, noon_utc};
use cfm_core::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = AppConfig::load().context("loading configuration")?;
    let resolver = WeekResolver::new(&config)?;

    match args.first().map(String::as_str) {
        Some("list") => {
            let rows = resolver.list_ranges().await?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Some("week") => {
            let Some(arg) = args.get(1) else {
                bail!("usage: cfm week <YYYY-MM-DD | label like \"nov 3–nov 9\">");
            };

            let monday = parse_target(arg).with_context(|| format!("cannot parse a week from {arg:?}"))?;
            tracing::info!("resolving week of {}", monday.format("%Y-%m-%d"));

            match resolver.resolve_week(monday).await? {
                Some(answer) => println!("{}", serde_json::to_string_pretty(&answer)?),
                None => {
                    let sample: Vec<_> = resolver.list_ranges().await?.into_iter().take(6).collect();
                    eprintln!("not found for this week; known ranges include:");
                    eprintln!("{}", serde_json::to_string_pretty(&sample)?);
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("usage: cfm <list | week <date-or-label>>");
            let sample: Vec<_> = resolver.list_ranges().await?.into_iter().take(6).collect();
            eprintln!("{}", serde_json::to_string_pretty(&sample)?);
        }
    }

    Ok(())
}

/// Accept either an ISO date (snapped to its week's Monday) or a scraped-style
/// label such as "nov 3–nov 9".
fn parse_target(arg: &str) -> Option<chrono::DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(arg, "%Y-%m-%d") {
        use chrono::Datelike;
        return noon_utc(date.year(), date.month(), date.day()).map(monday_of);
    }

    monday_from_label(arg, Utc::now())
}
