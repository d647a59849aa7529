//! # KR Store Scrape
//!
//! Collects franchise store locations (name, address, phone, hours,
//! services, coordinates) from the public store locators of McDonald's
//! Korea and Subway Korea, and writes one CSV file per site.
//!
//! ## Usage
//!
//! ```sh
//! chromedriver --port=4444 &
//! kr_store_scrape -o ./out
//! ```
//!
//! ## Architecture
//!
//! 1. **Session**: Start one WebDriver browser session for the whole run
//! 2. **Collection**: For every site, search each region (and each alias of
//!    an alias group), walk every result page and parse the listing
//! 3. **Output**: Write the accumulated rows to CSV once a site is complete
//!
//! The session is closed on every exit path, including fatal errors.

use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod session;
mod utils;

use cli::Cli;
use config::{RunConfig, resolve_encoding};
use outputs::csv::write_records;
use scrapers::run_site;
use session::{PageSession, WebDriverSession};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("kr_store_scrape starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = RunConfig::load(args.config.as_deref()).await?;
    config.restrict_regions(&args.regions)?;
    let encoding = resolve_encoding(&args.encoding)?;
    let sites = args.selected_sites();
    info!(
        sites = ?sites,
        regions = config.regions.len(),
        encoding = encoding.name(),
        "Configuration ready"
    );

    // ---- Browser session ----
    let mut session = WebDriverSession::connect(args.webdriver_url.as_str(), &config.browser).await?;
    let outcome = scrape_all(&mut session, &sites, &config, &args, encoding).await;
    if let Err(e) = session.close().await {
        error!(error = %e, "Failed to close WebDriver session");
    }

    let total = match outcome {
        Ok(total) => total,
        Err(e) => {
            error!(error = %e, "Scrape aborted");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        total_rows = total,
        ?elapsed,
        secs = elapsed.as_secs(),
        "Execution complete"
    );
    Ok(())
}

/// Collect and write every selected site; returns the number of rows written.
async fn scrape_all<S: PageSession>(
    session: &mut S,
    sites: &[scrapers::Site],
    config: &RunConfig,
    args: &Cli,
    encoding: &'static encoding_rs::Encoding,
) -> error::Result<usize> {
    let mut total = 0;
    for &site in sites {
        let rows = run_site(session, site, &config.regions, config.pauses).await?;
        let path = args.output_dir.join(site.default_file_name());
        write_records(&path, site.profile().header, &rows, encoding).await?;
        info!(%site, rows = rows.len(), path = %path.display(), "Site written");
        total += rows.len();
    }
    Ok(total)
}
