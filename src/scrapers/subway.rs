//! Subway Korea store search adapter.
//!
//! Scrapes [the store search](https://www.subway.co.kr/storeSearch). Results
//! render as a list; each item carries its map parameters in an `onclick`
//! handler and its contact details as label-prefixed spans.
//!
//! The pager reports the active page itself, so this adapter uses
//! [`Pagination::SelfReported`].

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{Pagination, SiteProfile};
use crate::error::{Result, ScrapeError};
use crate::models::StoreRecord;
use crate::utils::{PLACEHOLDER, coordinate_pair, join_service_tags, normalize_whitespace, stripped_text};

pub const PROFILE: SiteProfile = SiteProfile {
    name: "Subway",
    slug: "subway",
    search_url: "https://www.subway.co.kr/storeSearch",
    search_input: "#keyword",
    search_button: "#mapFrm a.btn_search",
    pagination: Pagination::SelfReported {
        active: "#ui_pager a.active",
        next: "#ui_pager a.next",
    },
    header: &[
        "지역명",
        "매장명",
        "주소",
        "전화번호",
        "영업시간",
        "서비스",
        "위도",
        "경도",
    ],
};

/// Comma field of the `onclick` argument list holding the latitude; the
/// longitude follows it.
const LATITUDE_FIELD: usize = 7;

const PHONE_LABEL: &str = "연락처";
const HOURS_LABEL: &str = "영업시간";

static ITEMS: Lazy<Selector> = Lazy::new(|| sel("ul#uiResultList li"));
static NAME: Lazy<Selector> = Lazy::new(|| sel("strong"));
static INFO: Lazy<Selector> = Lazy::new(|| sel("div.info"));
static SPAN: Lazy<Selector> = Lazy::new(|| sel("span"));
static SERVICE: Lazy<Selector> = Lazy::new(|| sel("div.service"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Parse one rendered results page.
pub fn parse_page(html: &str, region_label: &str, filter: &str) -> Result<Vec<StoreRecord>> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for (i, item) in document.select(&ITEMS).enumerate() {
        if let Some(record) = parse_item(&item, i, region_label, filter)? {
            records.push(record);
        }
    }

    debug!(count = records.len(), %filter, "Parsed Subway page");
    Ok(records)
}

fn parse_item(
    item: &ElementRef<'_>,
    index: usize,
    region_label: &str,
    filter: &str,
) -> Result<Option<StoreRecord>> {
    let context = || format!("store item {index}");

    let store_name = item
        .select(&NAME)
        .next()
        .map(|s| stripped_text(&s))
        .ok_or_else(|| ScrapeError::missing("store name", context()))?;

    let info: Vec<ElementRef<'_>> = item
        .select(&INFO)
        .next()
        .ok_or_else(|| ScrapeError::missing("info block", context()))?
        .select(&SPAN)
        .collect();
    let raw_address = info
        .first()
        .map(stripped_text)
        .ok_or_else(|| ScrapeError::missing("address", context()))?;
    if !raw_address.contains(filter) {
        return Ok(None);
    }

    let (phone, hours) = labelled_fields(info.iter().skip(1).map(stripped_text));

    let tags: Vec<String> = item
        .select(&SERVICE)
        .next()
        .ok_or_else(|| ScrapeError::missing("service block", context()))?
        .select(&SPAN)
        .map(|span| stripped_text(&span))
        .collect();
    let services = join_service_tags(&tags)
        .ok_or_else(|| ScrapeError::missing("service tags", context()))?;

    let onclick = item
        .value()
        .attr("onclick")
        .ok_or_else(|| ScrapeError::missing("onclick handler", context()))?;
    let (latitude, longitude) = coordinate_pair(onclick, LATITUDE_FIELD).ok_or_else(|| {
        ScrapeError::missing("coordinates", format!("{} in {onclick:?}", context()))
    })?;

    Ok(Some(StoreRecord {
        region_label: region_label.to_string(),
        store_name,
        address: normalize_whitespace(&raw_address),
        road_address: None,
        phone,
        hours,
        services,
        latitude,
        longitude,
    }))
}

/// Sort `연락처 : ...` and `영업시간 : ...` spans into phone and hours.
///
/// Spans carrying neither label are ignored; a missing label leaves the
/// placeholder in place. When a label repeats, the last one wins.
fn labelled_fields(spans: impl Iterator<Item = String>) -> (String, String) {
    let mut phone = PLACEHOLDER.to_string();
    let mut hours = PLACEHOLDER.to_string();
    for text in spans {
        if text.contains(PHONE_LABEL) {
            phone = strip_label(&text, PHONE_LABEL);
        } else if text.contains(HOURS_LABEL) {
            hours = strip_label(&text, HOURS_LABEL);
        }
    }
    (phone, hours)
}

fn strip_label(text: &str, label: &str) -> String {
    text.replace(&format!("{label} :"), "").trim().to_string()
}
