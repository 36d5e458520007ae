use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

// Covers the whole archive transfer, tens of megabytes on a slow link.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
const USER_AGENT: &str = concat!("hockey_etl/", env!("CARGO_PKG_VERSION"));

static ARCHIVE_CLIENT: OnceCell<Client> = OnceCell::new();

/// Client used for the dataset download. The dataset host redirects to
/// signed storage URLs, so redirects are followed, up to a small limit.
pub fn archive_client() -> Result<&'static Client> {
    ARCHIVE_CLIENT.get_or_try_init(|| {
        Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(DOWNLOAD_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build archive download client")
    })
}
