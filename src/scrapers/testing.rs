//! Fixture markup and a scripted [`PageSession`] for engine tests.
//!
//! [`ScriptedSession`] serves canned result pages per search term and
//! answers attribute/text lookups by running the selector against the
//! current page, so the engine sees the same markup it would in a browser.

use scraper::{Html, Selector};
use std::collections::HashMap;
use std::time::Duration;

use super::{Pagination, SiteProfile};
use crate::error::{Result, ScrapeError};
use crate::session::PageSession;

/// One McDonald's table row.
#[derive(Debug, Clone, Copy)]
pub struct McdRow {
    pub name: &'static str,
    pub address: &'static str,
    pub road: &'static str,
    pub phone: &'static str,
    pub hours: &'static str,
    pub services: &'static [&'static str],
    pub lat: &'static str,
    pub lon: &'static str,
}

impl McdRow {
    pub fn sample() -> Self {
        Self {
            name: "종로점",
            address: "서울특별시 종로구 종로 1",
            road: "서울특별시 종로구 종로 1길",
            phone: "02-765-4321",
            hours: "07:00 ~ 23:00",
            services: &["맥딜리버리", "맥모닝"],
            lat: "37.57",
            lon: "126.98",
        }
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Self::sample()
        }
    }
}

/// Render a McDonald's results page for `page` of `last_page`.
pub fn mcdonalds_page_n(rows: &[McdRow], page: usize, last_page: usize) -> String {
    let body: String = rows
        .iter()
        .map(|r| {
            let services: String = r
                .services
                .iter()
                .map(|s| format!(r#"<span class="srvc">{s}</span>"#))
                .collect();
            format!(
                r#"<tr>
  <td class="tdName"><dl class="name">
    <dt><strong><a href="javascript:moveMap('{lat}', '{lon}');">{name}</a></strong></dt>
    <dd>{address}</dd>
    <dd>{road}</dd>
  </dl></td>
  <td>{phone}</td>
  <td>{hours}</td>
  <td class="tdService">{services}</td>
</tr>"#,
                lat = r.lat,
                lon = r.lon,
                name = r.name,
                address = r.address,
                road = r.road,
                phone = r.phone,
                hours = r.hours,
            )
        })
        .collect();

    let group_start = (page.max(1) - 1) / 10 * 10 + 1;
    let group_end = (group_start + 9).min(last_page.max(1));
    let numbers: String = (group_start..=group_end)
        .map(|n| format!(r#"<a href="javascript:page({n});">{n}</a>"#))
        .collect();
    let next = (group_start + 10).min(last_page.max(1));

    format!(
        r#"<html><body><div class="mcStore">
<table class="tableType01"><tbody>{body}</tbody></table>
<div class="btnPaging"><span class="num">{numbers}</span><a class="next" href="javascript:page({next});">next</a></div>
</div></body></html>"#
    )
}

/// Render page 1 of a McDonald's listing with `last_page` pages in total.
pub fn mcdonalds_page(rows: &[McdRow], last_page: usize) -> String {
    mcdonalds_page_n(rows, 1, last_page)
}

/// One Subway list item.
#[derive(Debug, Clone, Copy)]
pub struct SubwayStore {
    pub name: &'static str,
    pub address: &'static str,
    /// Extra `div.info` spans after the address, verbatim.
    pub details: &'static [&'static str],
    pub services: &'static [&'static str],
    pub lat: &'static str,
    pub lon: &'static str,
}

impl SubwayStore {
    pub fn sample() -> Self {
        Self {
            name: "역삼역점",
            address: "서울특별시 강남구 테헤란로 156",
            details: &["연락처 : 02-555-1234", "영업시간 : 07:00~22:00"],
            services: &["아침메뉴", "배달"],
            lat: "37.5003",
            lon: "127.0364",
        }
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Self::sample()
        }
    }
}

/// Render a Subway results page showing `page` as active.
pub fn subway_page(stores: &[SubwayStore], page: usize, last_page: usize) -> String {
    let items: String = stores
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let details: String = s
                .details
                .iter()
                .map(|d| format!("<span>{d}</span>"))
                .collect();
            let services: String = s
                .services
                .iter()
                .map(|t| format!("<span>{t}</span>"))
                .collect();
            format!(
                r#"<li onclick="view.storeDetail('{i}', '{name}', 'ST', '1', 'Y', 'N', 'Y', '{lat}', '{lon}', '{i}')">
  <strong>{name}</strong>
  <div class="info"><span>{address}</span>{details}</div>
  <div class="service">{services}</div>
</li>"#,
                name = s.name,
                lat = s.lat,
                lon = s.lon,
                address = s.address,
            )
        })
        .collect();
    let next = (page + 1).min(last_page.max(1));

    format!(
        r##"<html><body>
<ul id="uiResultList">{items}</ul>
<div id="ui_pager"><a class="active" href="#">{page}</a><a class="next" href="#" onclick="view.goPage(this, {next})">next</a></div>
</body></html>"##
    )
}

/// A [`PageSession`] that serves canned pages keyed by search term.
#[derive(Debug)]
pub struct ScriptedSession {
    profile: SiteProfile,
    results: HashMap<String, Vec<String>>,
    typed: String,
    pages: Vec<String>,
    index: usize,
    /// Every call the engine made, in order.
    pub log: Vec<String>,
}

impl ScriptedSession {
    pub fn new(profile: SiteProfile) -> Self {
        Self {
            profile,
            results: HashMap::new(),
            typed: String::new(),
            pages: Vec::new(),
            index: 0,
            log: Vec::new(),
        }
    }

    /// Pages served after searching for `query`.
    pub fn with_results(mut self, query: &str, pages: Vec<String>) -> Self {
        self.results.insert(query.to_string(), pages);
        self
    }

    /// Number of page-advance clicks made so far.
    pub fn advances(&self) -> usize {
        self.log
            .iter()
            .filter(|l| l.starts_with("click next") || l.starts_with("click_nth"))
            .count()
    }

    fn current(&self) -> &str {
        self.pages
            .get(self.index)
            .map(String::as_str)
            .unwrap_or("<html><body></body></html>")
    }

    fn first_match<T>(
        &self,
        selector: &str,
        read: impl Fn(scraper::ElementRef<'_>) -> T,
    ) -> Result<T> {
        let document = Html::parse_document(self.current());
        let parsed = Selector::parse(selector)
            .map_err(|_| ScrapeError::Config(format!("bad selector {selector}")))?;
        document
            .select(&parsed)
            .next()
            .map(read)
            .ok_or_else(|| ScrapeError::missing("scripted element", selector.to_string()))
    }

    fn next_selector(&self) -> &'static str {
        match self.profile.pagination {
            Pagination::IndexPredicted { next, .. } => next,
            Pagination::SelfReported { next, .. } => next,
        }
    }
}

impl PageSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.log.push(format!("navigate {url}"));
        self.pages.clear();
        self.index = 0;
        self.typed.clear();
        Ok(())
    }

    async fn fill(&mut self, selector: &str, text: &str) -> Result<()> {
        assert_eq!(selector, self.profile.search_input);
        self.log.push(format!("fill {text}"));
        self.typed.push_str(text);
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        if selector == self.profile.search_button {
            self.log.push(format!("search {}", self.typed));
            self.pages = self.results.get(&self.typed).cloned().unwrap_or_default();
            self.index = 0;
        } else if selector == self.next_selector() {
            self.log.push(format!("click next from {}", self.index + 1));
            self.index += 1;
        } else {
            panic!("unexpected click on {selector}");
        }
        Ok(())
    }

    async fn click_nth(&mut self, selector: &str, index: usize) -> Result<()> {
        let document = Html::parse_document(self.current());
        let parsed = Selector::parse(selector).expect("valid selector");
        let available = document.select(&parsed).count();
        if index >= available {
            return Err(ScrapeError::missing("page-number control", selector.to_string()));
        }
        self.log.push(format!("click_nth {index} from {}", self.index + 1));
        self.index = self.index / 10 * 10 + index;
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        Ok(self.current().to_string())
    }

    async fn attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>> {
        self.first_match(selector, |e| e.value().attr(name).map(String::from))
    }

    async fn text(&mut self, selector: &str) -> Result<String> {
        self.first_match(selector, |e| e.text().collect::<String>())
    }

    async fn settle(&mut self, pause: Duration) {
        self.log.push(format!("settle {}ms", pause.as_millis()));
    }
}
