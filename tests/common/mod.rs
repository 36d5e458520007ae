#![allow(dead_code)]

use hockey_etl::table::{Table, normalize_cell};
use hockey_etl::transform::DROPPED_COLUMNS;

pub const BASE_HEADERS: &[&str] = &[
    "year", "lgID", "tmID", "oppID", "W_TvT", "L_TvT", "T_TvT", "OTL_TvT", "franchID", "confID",
    "divID", "rank", "G", "W_split", "L_split", "T_split", "OTL_split", "Pts", "SoW", "SoL", "GF",
    "GA", "name", "hW", "hL", "hT", "hOTL", "rW", "rL", "rT", "rOTL",
];

/// One wide row; empty strings become missing cells.
#[derive(Debug, Clone)]
pub struct Season {
    pub year: &'static str,
    pub league: &'static str,
    pub team: &'static str,
    pub opp: &'static str,
    pub tvt: [&'static str; 4],
    pub split: [&'static str; 4],
    pub home: [&'static str; 4],
    pub road: [&'static str; 4],
    pub goals_for: &'static str,
    pub goals_against: &'static str,
    pub conference: &'static str,
    pub division: &'static str,
}

/// Tie era: split .563, TvT .583.
pub fn boston_1980() -> Season {
    Season {
        year: "1980",
        league: "NHL",
        team: "BOS",
        opp: "MTL",
        tvt: ["3", "2", "1", ""],
        split: ["40", "30", "10", ""],
        home: ["25", "10", "5", ""],
        road: ["15", "20", "5", ""],
        goals_for: "316",
        goals_against: "272",
        conference: "WA",
        division: "AD",
    }
}

/// Overtime-loss era: split .476, TvT .667, home .537, road .415.
pub fn boston_2010() -> Season {
    Season {
        year: "2010",
        league: "NHL",
        team: "BOS",
        opp: "MTL",
        tvt: ["4", "1", "", "1"],
        split: ["39", "30", "", "13"],
        home: ["22", "11", "", "8"],
        road: ["17", "19", "", "5"],
        goals_for: "206",
        goals_against: "200",
        conference: "EC",
        division: "NE",
    }
}

pub fn wide_headers() -> Vec<String> {
    BASE_HEADERS
        .iter()
        .chain(DROPPED_COLUMNS.iter())
        .map(|h| h.to_string())
        .collect()
}

pub fn wide_table(seasons: &[Season]) -> Table {
    let headers = wide_headers();
    let mut table = Table::new(headers.clone());
    for s in seasons {
        let row = headers.iter().map(|h| normalize_cell(cell(s, h))).collect();
        table.push_row(row);
    }
    table
}

fn cell(s: &Season, header: &str) -> &'static str {
    match header {
        "year" => s.year,
        "lgID" => s.league,
        "tmID" => s.team,
        "oppID" => s.opp,
        "W_TvT" => s.tvt[0],
        "L_TvT" => s.tvt[1],
        "T_TvT" => s.tvt[2],
        "OTL_TvT" => s.tvt[3],
        "W_split" => s.split[0],
        "L_split" => s.split[1],
        "T_split" => s.split[2],
        "OTL_split" => s.split[3],
        "hW" => s.home[0],
        "hL" => s.home[1],
        "hT" => s.home[2],
        "hOTL" => s.home[3],
        "rW" => s.road[0],
        "rL" => s.road[1],
        "rT" => s.road[2],
        "rOTL" => s.road[3],
        "GF" => s.goals_for,
        "GA" => s.goals_against,
        "franchID" => s.team,
        "confID" => s.conference,
        "divID" => s.division,
        "rank" => "1",
        "name" => "Boston Bruins",
        "G" => "80",
        "Pts" => "90",
        "SoW" | "SoL" => "",
        _ => "0",
    }
}
