use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::Utc;
use rusqlite::Connection;
use rust_xlsxwriter::{Chart, ChartType, Workbook, Worksheet};
use serde::Serialize;
use tracing::{info, warn};

use crate::load;
use crate::record::{CleanedRow, Context, NO_GAMES};
use crate::win_pct::round3;

const SCATTER_SHEET: &str = "GoalsForAgainst";
const TREND_SHEET: &str = "GoalsByYear";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub n_teams: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub generated_at: String,
    pub rows: usize,
    pub teams_per_year: Vec<YearCount>,
    pub avg_wp_split: Option<f64>,
    pub avg_wp_home: Option<f64>,
    pub avg_wp_road: Option<f64>,
}

/// Reads the persisted table back, prints the summary and optionally
/// renders the chart workbook.
pub fn do_analysis(conn: &Connection, chart_path: Option<&Path>) -> Result<Summary> {
    let rows = load::read_all(conn).context("read persisted table")?;
    info!(target: "report", rows = rows.len(), "loaded rows for analysis");

    let summary = analysis(&rows);
    print_summary(&summary);

    if let Some(path) = chart_path {
        visualize(&rows, path)?;
        info!(target: "report", path = %path.display(), "charts written");
    }
    Ok(summary)
}

pub fn analysis(rows: &[CleanedRow]) -> Summary {
    let mut teams: BTreeMap<i32, HashSet<&str>> = BTreeMap::new();
    for row in rows {
        teams
            .entry(row.season.year)
            .or_default()
            .insert(row.season.team.as_str());
    }
    let teams_per_year = teams
        .into_iter()
        .map(|(year, set)| YearCount {
            year,
            n_teams: set.len(),
        })
        .collect();

    Summary {
        generated_at: Utc::now().to_rfc3339(),
        rows: rows.len(),
        teams_per_year,
        avg_wp_split: mean_distinct(rows, Context::Split),
        avg_wp_home: mean_distinct(rows, Context::Home),
        avg_wp_road: mean_distinct(rows, Context::Road),
    }
}

// Head-to-head rows repeat a team's season figures once per opponent, so
// average over distinct (team, value) pairs. No-games sentinels are skipped.
fn mean_distinct(rows: &[CleanedRow], ctx: Context) -> Option<f64> {
    let mut seen = HashSet::new();
    let mut sum = 0.0;
    let mut n = 0usize;
    for row in rows {
        let value = row.win_pct.get(ctx);
        if value == NO_GAMES {
            continue;
        }
        if seen.insert((row.season.team.as_str(), value.to_bits())) {
            sum += value;
            n += 1;
        }
    }
    if n == 0 {
        return None;
    }
    Some(round3(sum / n as f64))
}

pub fn print_summary(summary: &Summary) {
    let stdout = io::stdout();
    if let Err(err) = write_summary(&mut stdout.lock(), summary) {
        warn!(target: "report", "failed to print summary: {err}");
    }
}

pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    writeln!(out, "\n\nNumber of teams in the league by year")?;
    writeln!(out, "year  n_teams")?;
    for item in &summary.teams_per_year {
        writeln!(out, "{:<5} {:>7}", item.year, item.n_teams)?;
    }

    let fmt = |v: Option<f64>| v.map(|v| format!("{v:.3}")).unwrap_or_else(|| "n/a".into());
    let averages = [
        ("", summary.avg_wp_split),
        ("home ", summary.avg_wp_home),
        ("road ", summary.avg_wp_road),
    ];
    for (label, value) in averages {
        writeln!(
            out,
            "\n\nAverage {label}winning percentage across all teams and years"
        )?;
        writeln!(out, "\t{}", fmt(value))?;
    }
    writeln!(
        out,
        "\n(averages exclude contexts with no games played, reported as -1.000)"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    Winning,
    Even,
    Losing,
}

impl RecordClass {
    pub fn of(wp: f64) -> Self {
        if wp > 0.5 {
            RecordClass::Winning
        } else if wp < 0.5 {
            RecordClass::Losing
        } else {
            RecordClass::Even
        }
    }

    fn label(self) -> &'static str {
        match self {
            RecordClass::Winning => "Above .500",
            RecordClass::Even => ".500",
            RecordClass::Losing => "Below .500",
        }
    }
}

/// One point per team-season: (goals for, goals against, split percentage).
pub fn team_seasons(rows: &[CleanedRow]) -> Vec<(i32, i32, f64)> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|r| r.win_pct.split != NO_GAMES)
        .filter(|r| seen.insert((r.season.year, r.season.team.as_str())))
        .map(|r| (r.season.goals_for, r.season.goals_against, r.win_pct.split))
        .collect()
}

/// Mean goals scored per team, by year.
pub fn goals_by_year(rows: &[CleanedRow]) -> Vec<(i32, f64)> {
    let mut per_team: HashMap<(i32, &str), i32> = HashMap::new();
    for r in rows {
        per_team
            .entry((r.season.year, r.season.team.as_str()))
            .or_insert(r.season.goals_for);
    }
    let mut by_year: BTreeMap<i32, (i64, usize)> = BTreeMap::new();
    for ((year, _), gf) in per_team {
        let slot = by_year.entry(year).or_default();
        slot.0 += i64::from(gf);
        slot.1 += 1;
    }
    by_year
        .into_iter()
        .map(|(year, (total, n))| (year, round3(total as f64 / n as f64)))
        .collect()
}

/// Writes a workbook with a goals-for/against scatter coloured by record
/// and a line chart of mean goals scored per team by year.
pub fn visualize(rows: &[CleanedRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SCATTER_SHEET)?;
        write_scatter(sheet, &team_seasons(rows))?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(TREND_SHEET)?;
        write_trend(sheet, &goals_by_year(rows))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_scatter(sheet: &mut Worksheet, points: &[(i32, i32, f64)]) -> Result<()> {
    let mut chart = Chart::new(ChartType::Scatter);
    chart.title().set_name("Goals for vs goals against");
    chart.x_axis().set_name("Goals for");
    chart.y_axis().set_name("Goals against");

    let classes = [RecordClass::Winning, RecordClass::Even, RecordClass::Losing];
    for (block, class) in classes.into_iter().enumerate() {
        let col = (block * 2) as u16;
        sheet.write_string(0, col, format!("{} GF", class.label()))?;
        sheet.write_string(0, col + 1, format!("{} GA", class.label()))?;

        let mut last = 0u32;
        for (gf, ga, _) in points.iter().filter(|p| RecordClass::of(p.2) == class) {
            last += 1;
            sheet.write_number(last, col, *gf)?;
            sheet.write_number(last, col + 1, *ga)?;
        }
        if last == 0 {
            continue;
        }
        chart
            .add_series()
            .set_name(class.label())
            .set_categories((SCATTER_SHEET, 1, col, last, col))
            .set_values((SCATTER_SHEET, 1, col + 1, last, col + 1));
    }

    sheet.insert_chart(1, 7, &chart)?;
    Ok(())
}

fn write_trend(sheet: &mut Worksheet, series: &[(i32, f64)]) -> Result<()> {
    sheet.write_string(0, 0, "year")?;
    sheet.write_string(0, 1, "mean GF per team")?;
    for (idx, (year, mean)) in series.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_number(row, 0, *year)?;
        sheet.write_number(row, 1, *mean)?;
    }
    if series.is_empty() {
        return Ok(());
    }

    let last = series.len() as u32;
    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name("Mean goals scored per team by year");
    chart
        .add_series()
        .set_name("Goals for")
        .set_categories((TREND_SHEET, 1, 0, last, 0))
        .set_values((TREND_SHEET, 1, 1, last, 1));
    sheet.insert_chart(1, 3, &chart)?;
    Ok(())
}
