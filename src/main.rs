use std::process::ExitCode;

use tracing::{error, info};

use hockey_etl::config::Config;
use hockey_etl::{logging, pipeline};

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = Config::from_env();
    let subscriber = logging::subscriber(&cfg.log_filter);

    tracing::subscriber::with_default(subscriber, || match pipeline::run(&cfg) {
        Ok(summary) => {
            info!(
                target: "pipeline",
                extracted = summary.rows_extracted,
                loaded = summary.rows_loaded,
                "pipeline complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(target: "pipeline", "{err:#}");
            ExitCode::FAILURE
        }
    })
}
