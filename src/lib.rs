pub mod config;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod join;
pub mod load;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod table;
pub mod transform;
pub mod win_pct;
