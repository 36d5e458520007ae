use tracing::info;

use crate::config::TransformConfig;
use crate::error::{EtlError, Result};
use crate::record::{
    CleanedRow, Context, RawSeason, SENTINEL, Tally, TeamSeason, WinningPercentages,
};
use crate::table::Table;
use crate::win_pct::winning_percentages;

/// Monthly breakdowns, penalty and special-teams counts, and the playoff flag.
pub const DROPPED_COLUMNS: &[&str] = &[
    "PIM", "BenchMinor", "PPG", "PPC", "SHA", "PKG", "PKC", "SHF", "SepW", "SepL", "SepT",
    "SepOL", "OctW", "OctL", "OctT", "OctOL", "NovW", "NovL", "NovT", "NovOL", "DecW", "DecL",
    "DecT", "DecOL", "JanW", "JanL", "JanT", "JanOL", "FebW", "FebL", "FebT", "FebOL", "MarW",
    "MarL", "MarT", "MarOL", "AprW", "AprL", "AprT", "AprOL", "playoff",
];

/// Count columns whose absence means "not recorded in this era" rather than zero.
pub const SENTINEL_COLUMNS: &[&str] = &[
    "T_TvT", "OTL_TvT", "T_split", "OTL_split", "SoW", "SoL", "hT", "hOTL", "rT", "rOTL",
];

pub const INTEGER_COLUMNS: &[&str] = &[
    "year", "W_TvT", "L_TvT", "T_TvT", "OTL_TvT", "G", "W_split", "L_split", "T_split",
    "OTL_split", "Pts", "SoW", "SoL", "GF", "GA", "hW", "hL", "hT", "hOTL", "rW", "rL", "rT",
    "rOTL",
];

const STEP_DROP: &str = "drop unwanted columns";
const STEP_MISSING: &str = "replace missing data";
const STEP_TYPES: &str = "specify column types";

/// Runs the ordered cleaning steps over the joined table. Pure apart from
/// logging: the same input always produces the same rows.
pub fn transform(table: Table, cfg: &TransformConfig) -> Result<Vec<CleanedRow>> {
    let table = drop_unwanted_cols(table)?;
    info!(target: "transform", "successfully dropped unwanted columns");

    let table = replace_missing_data(table)?;
    info!(target: "transform", "successfully replaced missing data");

    let rows = specify_column_types(&table)?;
    info!(target: "transform", rows = rows.len(), "successfully specified column types");

    let rows = only_league(rows, &cfg.league);
    info!(target: "transform", rows = rows.len(), league = %cfg.league, "dropped entries from other leagues");

    let rows = conferences_and_divisions(rows, cfg.first_year);
    info!(
        target: "transform",
        rows = rows.len(),
        first_year = cfg.first_year,
        "selected years with both conferences and divisions"
    );

    let rows = require_labels(rows)?;
    let rows = reindex(rows);
    let rows = derive_winning_percentages(rows)?;
    info!(target: "transform", rows = rows.len(), "derived winning percentages");

    Ok(rows)
}

pub fn drop_unwanted_cols(table: Table) -> Result<Table> {
    table.drop_columns(STEP_DROP, DROPPED_COLUMNS)
}

pub fn replace_missing_data(table: Table) -> Result<Table> {
    table.fill_missing(STEP_MISSING, SENTINEL_COLUMNS, &SENTINEL.to_string())
}

struct TallyColumns {
    wins: usize,
    losses: usize,
    ties: usize,
    overtime_losses: usize,
}

impl TallyColumns {
    fn resolve(table: &Table, w: &str, l: &str, t: &str, otl: &str) -> Result<Self> {
        Ok(Self {
            wins: table.require_column(STEP_TYPES, w)?,
            losses: table.require_column(STEP_TYPES, l)?,
            ties: table.require_column(STEP_TYPES, t)?,
            overtime_losses: table.require_column(STEP_TYPES, otl)?,
        })
    }
}

/// Coerces the string table into typed rows. Integer columns must parse and
/// `lgID`/`tmID`/`oppID` must be present. Labels may still be missing here:
/// rows of other leagues and early seasons legitimately lack `confID`.
pub fn specify_column_types(table: &Table) -> Result<Vec<RawSeason>> {
    let col = |name: &str| table.require_column(STEP_TYPES, name);

    let year = col("year")?;
    let league = col("lgID")?;
    let team = col("tmID")?;
    let opponent = col("oppID")?;
    let franchise = col("franchID")?;
    let conference = col("confID")?;
    let division = col("divID")?;
    let rank = col("rank")?;
    let games = col("G")?;
    let points = col("Pts")?;
    let shootout_wins = col("SoW")?;
    let shootout_losses = col("SoL")?;
    let goals_for = col("GF")?;
    let goals_against = col("GA")?;
    let name = col("name")?;
    let tvt = TallyColumns::resolve(table, "W_TvT", "L_TvT", "T_TvT", "OTL_TvT")?;
    let split = TallyColumns::resolve(table, "W_split", "L_split", "T_split", "OTL_split")?;
    let home = TallyColumns::resolve(table, "hW", "hL", "hT", "hOTL")?;
    let road = TallyColumns::resolve(table, "rW", "rL", "rT", "rOTL")?;

    let mut out = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let int = |c: usize| parse_int(table, row, c);
        let tally = |cols: &TallyColumns| -> Result<Tally> {
            Ok(Tally::new(
                int(cols.wins)?,
                int(cols.losses)?,
                int(cols.ties)?,
                int(cols.overtime_losses)?,
            ))
        };
        let text = |c: usize| table.cell(row, c).map(str::to_string);

        out.push(TeamSeason {
            index: row,
            year: int(year)?,
            league: required_text(table, row, league)?,
            team: required_text(table, row, team)?,
            opponent: required_text(table, row, opponent)?,
            tvt: tally(&tvt)?,
            franchise: text(franchise),
            conference: text(conference),
            division: text(division),
            rank: text(rank),
            games: int(games)?,
            split: tally(&split)?,
            points: int(points)?,
            shootout_wins: int(shootout_wins)?,
            shootout_losses: int(shootout_losses)?,
            goals_for: int(goals_for)?,
            goals_against: int(goals_against)?,
            name: text(name),
            home: tally(&home)?,
            road: tally(&road)?,
        });
    }
    Ok(out)
}

fn parse_int(table: &Table, row: usize, col: usize) -> Result<i32> {
    let raw = table.cell(row, col);
    raw.and_then(|v| v.trim().parse::<i32>().ok())
        .ok_or_else(|| EtlError::TypeCoercion {
            column: table.headers[col].clone(),
            row,
            value: raw.map(str::to_string),
            expected: "an integer",
        })
}

fn required_text(table: &Table, row: usize, col: usize) -> Result<String> {
    table
        .cell(row, col)
        .map(|v| v.trim().to_string())
        .ok_or_else(|| EtlError::TypeCoercion {
            column: table.headers[col].clone(),
            row,
            value: None,
            expected: "a non-empty code",
        })
}

pub fn only_league<L>(rows: Vec<TeamSeason<L>>, league: &str) -> Vec<TeamSeason<L>> {
    rows.into_iter().filter(|r| r.league == league).collect()
}

/// Inclusive lower bound on the season year.
pub fn conferences_and_divisions<L>(
    rows: Vec<TeamSeason<L>>,
    first_year: i32,
) -> Vec<TeamSeason<L>> {
    rows.into_iter().filter(|r| r.year >= first_year).collect()
}

/// Every row that survived the filters must carry all of its labels.
/// Errors name the row's position in the joined table.
pub fn require_labels(rows: Vec<RawSeason>) -> Result<Vec<TeamSeason>> {
    rows.into_iter().map(labelled).collect()
}

fn labelled(row: RawSeason) -> Result<TeamSeason> {
    let at = row.index;
    let need = |value: Option<String>, column: &str| {
        value.ok_or_else(|| EtlError::TypeCoercion {
            column: column.to_string(),
            row: at,
            value: None,
            expected: "a non-empty label",
        })
    };
    Ok(TeamSeason {
        index: row.index,
        year: row.year,
        league: row.league,
        team: row.team,
        opponent: row.opponent,
        tvt: row.tvt,
        franchise: need(row.franchise, "franchID")?,
        conference: need(row.conference, "confID")?,
        division: need(row.division, "divID")?,
        rank: need(row.rank, "rank")?,
        games: row.games,
        split: row.split,
        points: row.points,
        shootout_wins: row.shootout_wins,
        shootout_losses: row.shootout_losses,
        goals_for: row.goals_for,
        goals_against: row.goals_against,
        name: need(row.name, "name")?,
        home: row.home,
        road: row.road,
    })
}

pub fn reindex(rows: Vec<TeamSeason>) -> Vec<TeamSeason> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| TeamSeason { index, ..row })
        .collect()
}

/// Appends the four winning percentages, one context at a time.
pub fn derive_winning_percentages(rows: Vec<TeamSeason>) -> Result<Vec<CleanedRow>> {
    let mut pcts = vec![WinningPercentages::default(); rows.len()];
    for ctx in Context::ALL {
        let tallies: Vec<Tally> = rows.iter().map(|r| *r.tally(ctx)).collect();
        let values = winning_percentages(&tallies, ctx)?;
        for (slot, value) in pcts.iter_mut().zip(values) {
            slot.set(ctx, value);
        }
    }

    Ok(rows
        .into_iter()
        .zip(pcts)
        .map(|(season, win_pct)| CleanedRow { season, win_pct })
        .collect())
}
