//! Store-locator scraping engine and its site adapters.
//!
//! One engine drives every site. A site adapter only supplies a
//! [`SiteProfile`] (URLs, selectors, pagination strategy, CSV header) and a
//! listing parser; the search, paging and region fan-out live here.
//!
//! # Supported Sites
//!
//! | Site | Module | Pagination | Road address |
//! |------|--------|------------|--------------|
//! | McDonald's Korea | [`mcdonalds`] | [`Pagination::IndexPredicted`] | yes |
//! | Subway Korea | [`subway`] | [`Pagination::SelfReported`] | no |
//!
//! # Flow
//!
//! ```text
//! RegionSpec ──expand_region──▶ collect_region(query) ──▶ parse_page ──▶ Vec<StoreRecord>
//!                                  │  ▲
//!                                  ▼  │ next page
//!                              PageSession
//! ```

pub mod mcdonalds;
pub mod subway;

#[cfg(test)]
pub(crate) mod testing;

use clap::ValueEnum;
use std::fmt;
use tracing::{debug, info, instrument};

use crate::config::Pauses;
use crate::error::{Result, ScrapeError};
use crate::models::{RegionSpec, StoreRecord};
use crate::session::PageSession;
use crate::utils::truncate_for_log;

/// How a site's pager tells us whether another page exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Numbered links in groups of ten plus a `next` link whose `href` is
    /// `javascript:page(N);`. The current page is counted locally.
    IndexPredicted {
        next: &'static str,
        numbered: &'static str,
    },
    /// An `active` link showing the current page and a `next` link whose
    /// `onclick` names its target as the second argument.
    SelfReported {
        active: &'static str,
        next: &'static str,
    },
}

/// Everything the engine needs to know about one store locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteProfile {
    /// Display name used in logs.
    pub name: &'static str,
    /// Short name used for the default output file.
    pub slug: &'static str,
    pub search_url: &'static str,
    pub search_input: &'static str,
    pub search_button: &'static str,
    pub pagination: Pagination,
    /// CSV header, matching [`StoreRecord::to_csv_record`] for this site.
    pub header: &'static [&'static str],
}

/// Supported store locators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Site {
    #[value(name = "mcdonalds")]
    McDonalds,
    #[value(name = "subway")]
    Subway,
}

impl Site {
    pub const ALL: [Site; 2] = [Site::McDonalds, Site::Subway];

    pub fn profile(self) -> &'static SiteProfile {
        match self {
            Site::McDonalds => &mcdonalds::PROFILE,
            Site::Subway => &subway::PROFILE,
        }
    }

    /// Run this site's listing parser over one rendered page.
    ///
    /// # Arguments
    ///
    /// * `html` - Page source as returned by the session
    /// * `region_label` - Canonical label written into every row
    /// * `filter` - Name an address must contain for its row to be kept
    ///
    /// # Returns
    ///
    /// The kept rows in page order. An empty vector means the page had no
    /// relevant stores; a missing mandatory element is an error.
    pub fn parse_page(self, html: &str, region_label: &str, filter: &str) -> Result<Vec<StoreRecord>> {
        match self {
            Site::McDonalds => mcdonalds::parse_page(html, region_label, filter),
            Site::Subway => subway::parse_page(html, region_label, filter),
        }
    }

    /// Default output file name, e.g. `mcdonalds.csv`.
    pub fn default_file_name(self) -> String {
        format!("{}.csv", self.profile().slug)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().name)
    }
}

/// Target page named by a `javascript:page(N);` link.
pub fn href_page_target(href: &str) -> String {
    href.replace("javascript:page(", "").replace(");", "").trim().to_string()
}

/// Target page named by an `onclick` handler such as `goPage(this, N)`.
pub fn onclick_page_target(onclick: &str) -> Result<String> {
    onclick
        .split(',')
        .nth(1)
        .map(|arg| arg.replace(')', "").trim().to_string())
        .ok_or_else(|| ScrapeError::PaginationControl(onclick.to_string()))
}

/// Drives one [`PageSession`] through a site's search and result pages.
#[derive(Debug)]
pub struct Collector<'s, S> {
    session: &'s mut S,
    site: Site,
    pauses: Pauses,
}

impl<'s, S: PageSession> Collector<'s, S> {
    pub fn new(session: &'s mut S, site: Site, pauses: Pauses) -> Self {
        Self {
            session,
            site,
            pauses,
        }
    }

    /// Every row for one region spec.
    ///
    /// A single name is searched, labelled and filtered by itself. An alias
    /// group searches each alias in order, filters by that alias, and labels
    /// every row with the first alias.
    #[instrument(level = "info", skip(self, region), fields(site = %self.site, region = %region))]
    pub async fn expand_region(&mut self, region: &RegionSpec) -> Result<Vec<StoreRecord>> {
        let label = region
            .label()
            .ok_or_else(|| ScrapeError::Config(format!("empty alias group {region}")))?
            .to_string();

        let mut records = Vec::new();
        for query in region.queries() {
            let found = self.collect_region(query, &label, query).await?;
            records.extend(found);
        }
        Ok(records)
    }

    /// Search for `query` and walk every result page.
    #[instrument(level = "info", skip(self), fields(site = %self.site))]
    pub async fn collect_region(
        &mut self,
        query: &str,
        region_label: &str,
        filter: &str,
    ) -> Result<Vec<StoreRecord>> {
        let profile = self.site.profile();

        self.session.navigate(profile.search_url).await?;
        self.session.settle(self.pauses.after_navigate()).await;
        self.session.fill(profile.search_input, query).await?;
        self.session.click(profile.search_button).await?;
        self.session.settle(self.pauses.after_search()).await;

        let records = match profile.pagination {
            Pagination::IndexPredicted { next, numbered } => {
                self.walk_index_predicted(region_label, filter, next, numbered)
                    .await?
            }
            Pagination::SelfReported { active, next } => {
                self.walk_self_reported(region_label, filter, active, next)
                    .await?
            }
        };

        info!(count = records.len(), %query, "Collected region");
        Ok(records)
    }

    async fn parse_current(&mut self, region_label: &str, filter: &str) -> Result<Vec<StoreRecord>> {
        let html = self.session.content().await?;
        self.site
            .parse_page(&html, region_label, filter)
            .inspect_err(|e| {
                debug!(error = %e, page = %truncate_for_log(&html, 300), "Listing parse failed");
            })
    }

    /// Page counter kept locally; an empty page or a `next` link pointing
    /// at the page just read ends the walk. Every tenth page the `next`
    /// link opens the following group, otherwise the numbered link at
    /// `counter % 10` is clicked.
    async fn walk_index_predicted(
        &mut self,
        region_label: &str,
        filter: &str,
        next: &str,
        numbered: &str,
    ) -> Result<Vec<StoreRecord>> {
        let mut records = Vec::new();
        let mut counter: usize = 0;

        loop {
            let page = self.parse_current(region_label, filter).await?;
            if page.is_empty() {
                debug!(page = counter + 1, "Empty page; stopping");
                break;
            }
            debug!(page = counter + 1, count = page.len(), "Parsed page");
            records.extend(page);

            counter += 1;
            let href = self
                .session
                .attribute(next, "href")
                .await?
                .ok_or_else(|| ScrapeError::PaginationControl(format!("{next} has no href")))?;
            let target = href_page_target(&href);
            if counter.to_string() == target {
                debug!(page = counter, "Last page reached");
                break;
            }

            if counter % 10 == 0 {
                self.session.click(next).await?;
            } else {
                self.session.click_nth(numbered, counter % 10).await?;
            }
            self.session.settle(self.pauses.after_page()).await;
        }

        Ok(records)
    }

    /// The pager reports the active page; the walk ends when it equals the
    /// `next` link's target.
    async fn walk_self_reported(
        &mut self,
        region_label: &str,
        filter: &str,
        active: &str,
        next: &str,
    ) -> Result<Vec<StoreRecord>> {
        let mut records = Vec::new();

        loop {
            let page = self.parse_current(region_label, filter).await?;
            let current = self.session.text(active).await?.trim().to_string();
            debug!(page = %current, count = page.len(), "Parsed page");
            records.extend(page);

            let onclick = self
                .session
                .attribute(next, "onclick")
                .await?
                .ok_or_else(|| ScrapeError::PaginationControl(format!("{next} has no onclick")))?;
            let target = onclick_page_target(&onclick)?;
            if current == target {
                debug!(page = %current, "Last page reached");
                break;
            }

            self.session.click(next).await?;
            self.session.settle(self.pauses.after_page()).await;
        }

        Ok(records)
    }
}

/// Collect every region for `site`, in list order.
///
/// Nothing is returned until every region is done; any failure aborts the
/// whole site.
///
/// # Arguments
///
/// * `session` - Browser session shared by every search
/// * `site` - Store locator to drive
/// * `regions` - Region list, single names and alias groups
/// * `pauses` - Fixed waits between browser actions
///
/// # Returns
///
/// Every row of every region, regions in list order.
#[instrument(level = "info", skip(session, regions, pauses), fields(regions = regions.len()))]
pub async fn run_site<S: PageSession>(
    session: &mut S,
    site: Site,
    regions: &[RegionSpec],
    pauses: Pauses,
) -> Result<Vec<StoreRecord>> {
    let mut collector = Collector::new(session, site, pauses);
    let mut rows = Vec::new();

    for region in regions {
        info!(%site, %region, "Searching region");
        let found = collector.expand_region(region).await?;
        info!(%site, %region, count = found.len(), "Region done");
        rows.extend(found);
    }

    info!(%site, total = rows.len(), "Site done");
    Ok(rows)
}
