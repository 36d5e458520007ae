use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::extract;
use crate::load;
use crate::report::{self, Summary};
use crate::table::Table;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rows_extracted: usize,
    pub rows_loaded: usize,
    /// `None` when reporting failed; the load has already succeeded by then.
    pub report: Option<Summary>,
}

/// Extract, transform, load, then report. Any error before reporting aborts
/// the run; a reporting failure is only logged.
pub fn run(cfg: &Config) -> Result<RunSummary> {
    info!(target: "pipeline", "start extraction");
    let wide = extract::extract(cfg)?;
    info!(target: "pipeline", rows = wide.len(), "finished extraction");

    run_from_table(cfg, wide)
}

/// Everything after extraction, for callers that already hold the joined table.
pub fn run_from_table(cfg: &Config, wide: Table) -> Result<RunSummary> {
    let rows_extracted = wide.len();

    info!(target: "pipeline", "start transformation");
    let rows = crate::transform::transform(wide, &cfg.transform)?;
    info!(target: "pipeline", rows = rows.len(), "finished transformation");

    info!(target: "pipeline", "start load");
    let mut conn = load::open_db(&cfg.db_path)?;
    let rows_loaded = load::load(&mut conn, &rows)?;
    info!(target: "pipeline", rows = rows_loaded, "finished load");

    let report = match report::do_analysis(&conn, cfg.report_path.as_deref()) {
        Ok(summary) => Some(summary),
        Err(err) => {
            warn!(target: "pipeline", "data analysis failed: {err:#}");
            None
        }
    };

    Ok(RunSummary {
        rows_extracted,
        rows_loaded,
        report,
    })
}
