use std::path::PathBuf;

use anyhow::{Context, Result};

use hockey_etl::config::Config;
use hockey_etl::{load, logging, report};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = Config::from_env();
    let db_path = parse_path_arg("--db").unwrap_or_else(|| cfg.db_path.clone());
    let chart_path = parse_path_arg("--chart");
    let as_json = std::env::args().skip(1).any(|arg| arg == "--json");

    let subscriber = logging::subscriber(&cfg.log_filter);
    tracing::subscriber::with_default(subscriber, || -> Result<()> {
        let conn = load::open_db(&db_path)?;
        if as_json {
            let rows = load::read_all(&conn).context("read persisted table")?;
            let summary = report::analysis(&rows);
            if let Some(path) = chart_path.as_deref() {
                report::visualize(&rows, path)?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("serialize summary")?
            );
        } else {
            report::do_analysis(&conn, chart_path.as_deref())?;
        }
        Ok(())
    })
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
