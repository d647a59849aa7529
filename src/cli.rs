//! Command-line interface definitions.
//!
//! Every option has a default, so a bare invocation scrapes both sites for
//! all regions and writes `mcdonalds.csv` and `subway.csv` in CP949 to the
//! current directory.

use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::scrapers::Site;

/// Collect Korean franchise store locations into CSV.
///
/// # Examples
///
/// ```sh
/// # Both sites, all regions, chromedriver on the default port
/// kr_store_scrape
///
/// # Only Subway, two regions, UTF-8 output
/// kr_store_scrape --site subway --region 서울 --region 충북 --encoding utf-8
///
/// # Override regions, pauses and browser options from a YAML file
/// kr_store_scrape --config scrape.yaml -o ./out
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Store locator to scrape (repeatable; default: all)
    #[arg(short, long = "site", value_enum)]
    pub sites: Vec<Site>,

    /// Directory the CSV files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output text encoding (cp949, euc-kr, utf-8, ...)
    #[arg(short, long, default_value = "cp949")]
    pub encoding: String,

    /// WebDriver server to start the browser session on
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:4444")]
    pub webdriver_url: Url,

    /// Optional path to a YAML run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only scrape regions with this canonical label (repeatable)
    #[arg(short, long = "region")]
    pub regions: Vec<String>,
}

impl Cli {
    /// Sites to scrape, in a fixed order, without duplicates.
    pub fn selected_sites(&self) -> Vec<Site> {
        Site::ALL
            .into_iter()
            .filter(|s| self.sites.is_empty() || self.sites.contains(s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["kr_store_scrape"]);
        assert_eq!(cli.selected_sites(), Site::ALL);
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.encoding, "cp949");
        assert!(cli.config.is_none());
        assert!(cli.regions.is_empty());
    }

    #[test]
    fn test_cli_site_and_regions() {
        let cli = Cli::parse_from([
            "kr_store_scrape",
            "--site",
            "subway",
            "--region",
            "서울",
            "-r",
            "충북",
            "-o",
            "/tmp/out",
            "--webdriver-url",
            "http://127.0.0.1:9515",
        ]);

        assert_eq!(cli.selected_sites(), [Site::Subway]);
        assert_eq!(cli.regions, ["서울", "충북"]);
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cli.webdriver_url.as_str(), "http://127.0.0.1:9515/");
    }

    #[test]
    fn test_cli_rejects_unknown_site() {
        assert!(Cli::try_parse_from(["kr_store_scrape", "--site", "burgerking"]).is_err());
    }
}
