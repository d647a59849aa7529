//! McDonald's Korea store list adapter.
//!
//! Scrapes [the store list](https://www.mcdonalds.co.kr/kor/store/list.do).
//! Results render as a table, ten rows per page, with a numbered page strip
//! and a `next` link whose `href` is `javascript:page(N);`.
//!
//! # Row Layout
//!
//! ```text
//! tr
//! ├── td.tdName .name
//! │   ├── dt a[href="javascript:moveMap('lat','lon');"]   store name
//! │   ├── dd                                               lot-number address
//! │   └── dd                                               road-name address
//! ├── td                                                   phone(s)
//! ├── td                                                   opening hours
//! └── td.tdService span.srvc*                              service tags
//! ```

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{Pagination, SiteProfile};
use crate::error::{Result, ScrapeError};
use crate::models::StoreRecord;
use crate::utils::{
    PLACEHOLDER, coordinate_pair, extract_phones, join_service_tags, normalize_whitespace,
    stripped_text,
};

pub const PROFILE: SiteProfile = SiteProfile {
    name: "McDonald's",
    slug: "mcdonalds",
    search_url: "https://www.mcdonalds.co.kr/kor/store/list.do",
    search_input: ".srchBox #searchWord",
    search_button: ".srchBox button.btnMC.btnM",
    pagination: Pagination::IndexPredicted {
        next: ".mcStore .btnPaging a.next",
        numbered: ".mcStore .btnPaging span.num a",
    },
    header: &[
        "지역명",
        "매장명",
        "주소",
        "도로명",
        "전화번호",
        "영업시간",
        "서비스",
        "위도",
        "경도",
    ],
};

static ROWS: Lazy<Selector> = Lazy::new(|| sel(".mcStore table.tableType01 tbody tr"));
static NAME_BLOCK: Lazy<Selector> = Lazy::new(|| sel("td.tdName .name"));
static DT: Lazy<Selector> = Lazy::new(|| sel("dt"));
static DD: Lazy<Selector> = Lazy::new(|| sel("dd"));
static LINK: Lazy<Selector> = Lazy::new(|| sel("a"));
static CELLS: Lazy<Selector> = Lazy::new(|| sel("td"));
static SERVICE_CELL: Lazy<Selector> = Lazy::new(|| sel("td.tdService"));
static SERVICE_TAGS: Lazy<Selector> = Lazy::new(|| sel("span.srvc"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Parse one rendered results page.
///
/// Rows whose address does not contain `filter` are dropped. A row missing
/// its name link or address is a structural failure for the whole page.
pub fn parse_page(html: &str, region_label: &str, filter: &str) -> Result<Vec<StoreRecord>> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for (i, row) in document.select(&ROWS).enumerate() {
        if let Some(record) = parse_row(&row, i, region_label, filter)? {
            records.push(record);
        }
    }

    debug!(count = records.len(), %filter, "Parsed McDonald's page");
    Ok(records)
}

fn parse_row(
    row: &ElementRef<'_>,
    index: usize,
    region_label: &str,
    filter: &str,
) -> Result<Option<StoreRecord>> {
    let context = || format!("store row {index}");

    let info = row
        .select(&NAME_BLOCK)
        .next()
        .ok_or_else(|| ScrapeError::missing("name block", context()))?;
    let link = info
        .select(&DT)
        .next()
        .and_then(|dt| dt.select(&LINK).next())
        .ok_or_else(|| ScrapeError::missing("store name link", context()))?;
    let store_name = stripped_text(&link);

    let addresses: Vec<ElementRef<'_>> = info.select(&DD).collect();
    let raw_address = addresses
        .first()
        .map(stripped_text)
        .ok_or_else(|| ScrapeError::missing("address", context()))?;
    if !raw_address.contains(filter) {
        return Ok(None);
    }
    let road_address = addresses
        .get(1)
        .map(|dd| normalize_whitespace(&stripped_text(dd)))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let cells: Vec<ElementRef<'_>> = row.select(&CELLS).collect();
    let phone = cells
        .get(1)
        .map(|td| extract_phones(&stripped_text(td)))
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let hours = cells
        .get(2)
        .map(stripped_text)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let tags: Vec<String> = row
        .select(&SERVICE_CELL)
        .next()
        .ok_or_else(|| ScrapeError::missing("service cell", context()))?
        .select(&SERVICE_TAGS)
        .map(|span| stripped_text(&span))
        .collect();
    let services = join_service_tags(&tags)
        .ok_or_else(|| ScrapeError::missing("service tags", context()))?;

    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| ScrapeError::missing("map link href", context()))?;
    let arguments = href
        .trim()
        .replace("javascript:moveMap(", "")
        .replace(");", "");
    let (latitude, longitude) = coordinate_pair(&arguments, 0)
        .ok_or_else(|| ScrapeError::missing("coordinates", format!("{} in {href:?}", context())))?;

    Ok(Some(StoreRecord {
        region_label: region_label.to_string(),
        store_name,
        address: normalize_whitespace(&raw_address),
        road_address: Some(road_address),
        phone,
        hours,
        services,
        latitude,
        longitude,
    }))
}
