use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use reqwest::blocking::Client;
use tracing::{error, info, warn};
use zip::ZipArchive;

use crate::config::Config;
use crate::http_client::archive_client;
use crate::join;
use crate::table::{Table, normalize_cell};

pub const TEAMS_CSV: &str = "Teams.csv";
pub const TEAM_SPLITS_CSV: &str = "TeamSplits.csv";
pub const TEAM_VS_TEAM_CSV: &str = "TeamVsTeam.csv";

#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub teams: Table,
    pub team_splits: Table,
    pub team_vs_team: Table,
}

/// Downloads the archive, reads the three members, joins them and removes
/// the local archive again.
pub fn extract(cfg: &Config) -> Result<Table> {
    let client = archive_client()?;
    download_file(client, &cfg.dataset_url, &cfg.archive_path)
        .with_context(|| format!("unable to download file from: {}", cfg.dataset_url))?;
    info!(target: "extract", path = %cfg.archive_path.display(), "archive downloaded");

    unpack_archive(&cfg.archive_path)
}

/// Reads and joins the members of a local archive. The archive is removed
/// whether or not that succeeds.
pub fn unpack_archive(path: &Path) -> Result<Table> {
    let wide = retrieve_csv_files(path).and_then(|tables| Ok(join::join(&tables)?));
    remove_archive(path);
    wide
}

pub fn download_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let mut resp = client
        .get(url)
        .send()
        .context("request failed")?
        .error_for_status()
        .context("server returned an error status")?;

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok();
        }
    }
    let file = File::create(dest).with_context(|| format!("create {}", dest.display()))?;
    let mut writer = BufWriter::new(file);
    let written = resp
        .copy_to(&mut writer)
        .with_context(|| format!("write {}", dest.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", dest.display()))?;
    Ok(written)
}

pub fn retrieve_csv_files(path: &Path) -> Result<RawTables> {
    let file = File::open(path).with_context(|| format!("open archive {}", path.display()))?;
    let mut archive =
        ZipArchive::new(file).with_context(|| format!("read archive {}", path.display()))?;

    let teams = read_member(&mut archive, TEAMS_CSV)?;
    let team_splits = read_member(&mut archive, TEAM_SPLITS_CSV)?;
    let team_vs_team = read_member(&mut archive, TEAM_VS_TEAM_CSV)?;
    info!(
        target: "extract",
        teams = teams.len(),
        team_splits = team_splits.len(),
        team_vs_team = team_vs_team.len(),
        "csv members parsed"
    );

    Ok(RawTables {
        teams,
        team_splits,
        team_vs_team,
    })
}

fn read_member<R: Read + io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Table> {
    let member = archive
        .by_name(name)
        .with_context(|| format!("archive member {name} missing"))?;
    read_csv_table(member).with_context(|| format!("parse {name}"))
}

/// Parses a CSV stream with a header row into a [`Table`].
pub fn read_csv_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("read csv header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(anyhow!("csv has no header row"));
    }

    let mut table = Table::new(headers);
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("read csv record {idx}"))?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        table.push_row(record.iter().map(normalize_cell).collect());
    }
    Ok(table)
}

/// Best-effort cleanup; a missing file is logged, never fatal.
pub fn remove_archive(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => info!(target: "extract", path = %path.display(), "archive removed"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            error!(
                target: "extract",
                "attempted to delete {}, but could not find it",
                path.display()
            );
        }
        Err(err) => {
            warn!(target: "extract", "failed to delete {}: {err}", path.display());
        }
    }
}
