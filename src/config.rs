use std::path::PathBuf;

pub const DEFAULT_DATASET_URL: &str = "https://www.kaggle.com/api/v1/datasets/download/open-source-sports/professional-hockey-database";
pub const DEFAULT_ARCHIVE: &str = "professional_hockey_database.zip";
pub const DEFAULT_DB: &str = "data_warehouse.sqlite";
pub const DEFAULT_REPORT: &str = "hockey_report.xlsx";
pub const DEFAULT_LEAGUE: &str = "NHL";
/// First season in which every team sat in both a conference and a division.
pub const DEFAULT_FIRST_YEAR: i32 = 1974;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    pub league: String,
    pub first_year: i32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            league: DEFAULT_LEAGUE.to_string(),
            first_year: DEFAULT_FIRST_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dataset_url: String,
    pub archive_path: PathBuf,
    pub db_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub log_filter: String,
    pub transform: TransformConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE),
            db_path: PathBuf::from(DEFAULT_DB),
            report_path: Some(PathBuf::from(DEFAULT_REPORT)),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            transform: TransformConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank or unparsable values
    /// keep the default. An empty `HOCKEY_ETL_REPORT` disables the workbook.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank("HOCKEY_ETL_DATASET_URL") {
            cfg.dataset_url = url.trim().to_string();
        }
        if let Some(path) = non_blank("HOCKEY_ETL_ARCHIVE") {
            cfg.archive_path = PathBuf::from(path.trim());
        }
        if let Some(path) = non_blank("HOCKEY_ETL_DB") {
            cfg.db_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup("HOCKEY_ETL_REPORT") {
            let trimmed = raw.trim();
            cfg.report_path = if trimmed.is_empty() {
                None
            } else {
                Some(PathBuf::from(trimmed))
            };
        }
        if let Some(filter) = non_blank("HOCKEY_ETL_LOG") {
            cfg.log_filter = filter.trim().to_string();
        }
        if let Some(league) = non_blank("HOCKEY_ETL_LEAGUE") {
            cfg.transform.league = league.trim().to_string();
        }
        if let Some(year) = non_blank("HOCKEY_ETL_FIRST_YEAR").and_then(|v| v.trim().parse().ok()) {
            cfg.transform.first_year = year;
        }
        cfg
    }
}
