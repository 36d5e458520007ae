use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::error::Result;
use crate::extract::RawTables;
use crate::table::Table;

pub const JOIN_KEYS: &[&str] = &["year", "lgID", "tmID"];
pub const TVT_SUFFIX: &str = "_TvT";
pub const SPLIT_SUFFIX: &str = "_split";

const STEP: &str = "join";

/// Joins the three raw tables into the wide season-team table:
/// `TeamVsTeam ⟕ (Teams ⟕ TeamSplits)` on `(year, lgID, tmID)`.
pub fn join(tables: &RawTables) -> Result<Table> {
    let teams = left_join(&tables.teams, &tables.team_splits, JOIN_KEYS, ("_x", "_y"))?;
    let wide = left_join(
        &tables.team_vs_team,
        &teams,
        JOIN_KEYS,
        (TVT_SUFFIX, SPLIT_SUFFIX),
    )?;
    info!(
        target: "extract",
        rows = wide.len(),
        columns = wide.headers.len(),
        "data successfully joined"
    );
    Ok(wide)
}

/// Left join on `keys`. Non-key columns present on both sides get the
/// matching suffix; everything else keeps its name. Output order follows the
/// left table, and a left row with several matches fans out in right order.
pub fn left_join(
    left: &Table,
    right: &Table,
    keys: &[&str],
    suffixes: (&str, &str),
) -> Result<Table> {
    let left_keys = key_columns(left, keys)?;
    let right_keys = key_columns(right, keys)?;

    let right_key_set: HashSet<usize> = right_keys.iter().copied().collect();
    let right_cols: Vec<usize> = (0..right.headers.len())
        .filter(|idx| !right_key_set.contains(idx))
        .collect();

    let left_key_names: HashSet<&str> = keys.iter().copied().collect();
    let right_names: HashSet<&str> = right_cols
        .iter()
        .map(|&idx| right.headers[idx].as_str())
        .collect();
    let left_names: HashSet<&str> = left
        .headers
        .iter()
        .map(String::as_str)
        .filter(|name| !left_key_names.contains(name))
        .collect();

    let mut headers = Vec::with_capacity(left.headers.len() + right_cols.len());
    for name in &left.headers {
        if !left_key_names.contains(name.as_str()) && right_names.contains(name.as_str()) {
            headers.push(format!("{name}{}", suffixes.0));
        } else {
            headers.push(name.clone());
        }
    }
    for &idx in &right_cols {
        let name = &right.headers[idx];
        if left_names.contains(name.as_str()) {
            headers.push(format!("{name}{}", suffixes.1));
        } else {
            headers.push(name.clone());
        }
    }

    let mut index: HashMap<Vec<Option<&str>>, Vec<usize>> = HashMap::new();
    for (row_idx, row) in right.rows.iter().enumerate() {
        let key = right_keys.iter().map(|&c| row[c].as_deref()).collect();
        index.entry(key).or_default().push(row_idx);
    }

    let mut out = Table::new(headers);
    for row in &left.rows {
        let key: Vec<Option<&str>> = left_keys.iter().map(|&c| row[c].as_deref()).collect();
        match index.get(&key) {
            Some(matches) => {
                for &m in matches {
                    let mut joined = row.clone();
                    joined.extend(right_cols.iter().map(|&c| right.rows[m][c].clone()));
                    out.push_row(joined);
                }
            }
            None => {
                let mut joined = row.clone();
                joined.extend(std::iter::repeat_n(None, right_cols.len()));
                out.push_row(joined);
            }
        }
    }

    Ok(out)
}

fn key_columns(table: &Table, keys: &[&str]) -> Result<Vec<usize>> {
    keys.iter()
        .map(|key| table.require_column(STEP, key))
        .collect()
}
