use std::path::Path;

use anyhow::Context as _;
use rusqlite::{Connection, Row, Transaction, params};
use tracing::{error, info};

use crate::error::{EtlError, Result};
use crate::record::{CleanedRow, Tally, TeamSeason, WinningPercentages};

pub const TABLE_NAME: &str = "hockey_teams";

// STRICT makes SQLite reject any value whose type does not match its column.
const CREATE_TABLE: &str = r#"
    DROP TABLE IF EXISTS hockey_teams;
    CREATE TABLE hockey_teams (
        "index" INTEGER NOT NULL,
        year INTEGER NOT NULL,
        lgID TEXT NOT NULL,
        tmID TEXT NOT NULL,
        oppID TEXT NOT NULL,
        W_TvT INTEGER NOT NULL,
        L_TvT INTEGER NOT NULL,
        T_TvT INTEGER NOT NULL,
        OTL_TvT INTEGER NOT NULL,
        franchID TEXT NOT NULL,
        confID TEXT NOT NULL,
        divID TEXT NOT NULL,
        "rank" TEXT NOT NULL,
        G INTEGER NOT NULL,
        W_split INTEGER NOT NULL,
        L_split INTEGER NOT NULL,
        T_split INTEGER NOT NULL,
        OTL_split INTEGER NOT NULL,
        Pts INTEGER NOT NULL,
        SoW INTEGER NOT NULL,
        SoL INTEGER NOT NULL,
        GF INTEGER NOT NULL,
        GA INTEGER NOT NULL,
        name TEXT NOT NULL,
        hW INTEGER NOT NULL,
        hL INTEGER NOT NULL,
        hT INTEGER NOT NULL,
        hOTL INTEGER NOT NULL,
        rW INTEGER NOT NULL,
        rL INTEGER NOT NULL,
        rT INTEGER NOT NULL,
        rOTL INTEGER NOT NULL,
        WP_TvT REAL NOT NULL,
        WP_split REAL NOT NULL,
        WP_home REAL NOT NULL,
        WP_road REAL NOT NULL
    ) STRICT;
    CREATE INDEX idx_hockey_teams_year ON hockey_teams(year);
"#;

const COLUMNS: &str = r#""index", year, lgID, tmID, oppID,
    W_TvT, L_TvT, T_TvT, OTL_TvT,
    franchID, confID, divID, "rank",
    G, W_split, L_split, T_split, OTL_split, Pts, SoW, SoL, GF, GA, name,
    hW, hL, hT, hOTL, rW, rL, rT, rOTL,
    WP_TvT, WP_split, WP_home, WP_road"#;

pub fn open_db(path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    info!(target: "load", db = %path.display(), "established database connection");
    Ok(conn)
}

/// Replaces the table with `rows`, then checks the stored count matches.
pub fn load(conn: &mut Connection, rows: &[CleanedRow]) -> Result<usize> {
    let written = write_rows(conn, rows)?;
    info!(target: "load", written, table = TABLE_NAME, "rows written");

    ensure_count(conn, rows.len())?;
    info!(target: "load", "successfully loaded all data into database");
    Ok(written)
}

/// Fails with [`EtlError::PersistenceMismatch`] unless the table holds
/// exactly `expected` rows.
pub fn ensure_count(conn: &Connection, expected: usize) -> Result<()> {
    if validate(conn, expected)? {
        return Ok(());
    }
    let found = count_rows(conn)?;
    error!(target: "load", expected, found, "error loading data into database");
    Err(EtlError::PersistenceMismatch {
        table: TABLE_NAME.to_string(),
        expected,
        found,
    })
}

/// Drops and recreates the table and inserts every row in one transaction.
pub fn write_rows(conn: &mut Connection, rows: &[CleanedRow]) -> Result<usize> {
    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_TABLE)?;
    let mut written = 0usize;
    for row in rows {
        written += insert_row(&tx, row)?;
    }
    tx.commit()?;
    Ok(written)
}

fn insert_row(tx: &Transaction<'_>, row: &CleanedRow) -> Result<usize> {
    let s = &row.season;
    let wp = &row.win_pct;
    let sql = format!(
        "INSERT INTO {TABLE_NAME} ({COLUMNS}) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
            ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24,
            ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34, ?35, ?36
        )"
    );
    let mut stmt = tx.prepare_cached(&sql)?;
    let n = stmt.execute(params![
        s.index as i64,
        s.year,
        s.league,
        s.team,
        s.opponent,
        s.tvt.wins,
        s.tvt.losses,
        s.tvt.ties,
        s.tvt.overtime_losses,
        s.franchise,
        s.conference,
        s.division,
        s.rank,
        s.games,
        s.split.wins,
        s.split.losses,
        s.split.ties,
        s.split.overtime_losses,
        s.points,
        s.shootout_wins,
        s.shootout_losses,
        s.goals_for,
        s.goals_against,
        s.name,
        s.home.wins,
        s.home.losses,
        s.home.ties,
        s.home.overtime_losses,
        s.road.wins,
        s.road.losses,
        s.road.ties,
        s.road.overtime_losses,
        wp.tvt,
        wp.split,
        wp.home,
        wp.road,
    ])?;
    Ok(n)
}

pub fn count_rows(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row(
        &format!("SELECT COUNT(*) AS n_lines FROM {TABLE_NAME}"),
        [],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(n).unwrap_or(0))
}

/// True when the persisted table holds exactly `expected` rows.
pub fn validate(conn: &Connection, expected: usize) -> Result<bool> {
    Ok(count_rows(conn)? == expected)
}

/// Full-table read in stored order.
pub fn read_all(conn: &Connection) -> Result<Vec<CleanedRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM {TABLE_NAME} ORDER BY \"index\" ASC"
    ))?;
    let rows = stmt.query_map([], decode_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn decode_row(row: &Row<'_>) -> rusqlite::Result<CleanedRow> {
    let tally = |base: usize| -> rusqlite::Result<Tally> {
        Ok(Tally::new(
            row.get(base)?,
            row.get(base + 1)?,
            row.get(base + 2)?,
            row.get(base + 3)?,
        ))
    };
    let index: i64 = row.get(0)?;
    Ok(CleanedRow {
        season: TeamSeason {
            index: usize::try_from(index).unwrap_or_default(),
            year: row.get(1)?,
            league: row.get(2)?,
            team: row.get(3)?,
            opponent: row.get(4)?,
            tvt: tally(5)?,
            franchise: row.get(9)?,
            conference: row.get(10)?,
            division: row.get(11)?,
            rank: row.get(12)?,
            games: row.get(13)?,
            split: tally(14)?,
            points: row.get(18)?,
            shootout_wins: row.get(19)?,
            shootout_losses: row.get(20)?,
            goals_for: row.get(21)?,
            goals_against: row.get(22)?,
            name: row.get(23)?,
            home: tally(24)?,
            road: tally(28)?,
        },
        win_pct: WinningPercentages {
            tvt: row.get(32)?,
            split: row.get(33)?,
            home: row.get(34)?,
            road: row.get(35)?,
        },
    })
}
