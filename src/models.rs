//! Data models for scraped store rows and region search specs.
//!
//! - [`StoreRecord`]: one output row, built by a site adapter's listing parser
//! - [`RegionSpec`]: one entry of the region list, either a single name or an
//!   alias group sharing a canonical label

use serde::Deserialize;

/// One store as it will be written to CSV.
///
/// `road_address` is only populated by adapters whose listing shows a
/// separate road-name address; for the others it is `None` and the column
/// is left out of the row entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRecord {
    /// Canonical display label of the top-level region searched.
    pub region_label: String,
    pub store_name: String,
    /// Lot-number address, non-breaking spaces normalized.
    pub address: String,
    pub road_address: Option<String>,
    /// Comma-joined phone numbers, or a placeholder.
    pub phone: String,
    /// Free-text opening hours, or a placeholder.
    pub hours: String,
    /// Comma-joined service tags.
    pub services: String,
    pub latitude: String,
    pub longitude: String,
}

impl StoreRecord {
    /// Fields in CSV column order.
    pub fn to_csv_record(&self) -> Vec<&str> {
        let mut row = vec![
            self.region_label.as_str(),
            self.store_name.as_str(),
            self.address.as_str(),
        ];
        if let Some(road) = &self.road_address {
            row.push(road.as_str());
        }
        row.extend([
            self.phone.as_str(),
            self.hours.as_str(),
            self.services.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]);
        row
    }
}

/// A region to search.
///
/// In YAML a bare string is a single region and a list is an alias group:
///
/// ```yaml
/// regions:
///   - 서울
///   - [충북, 충청북도]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RegionSpec {
    /// Searched, labelled and filtered by the same name.
    Single(String),
    /// Every alias is searched on its own; rows are labelled with the first.
    Aliases(Vec<String>),
}

impl RegionSpec {
    pub fn single(name: &str) -> Self {
        RegionSpec::Single(name.to_string())
    }

    pub fn aliases(names: &[&str]) -> Self {
        RegionSpec::Aliases(names.iter().map(|n| n.to_string()).collect())
    }

    /// Canonical label: the name itself, or the first alias.
    ///
    /// `None` only for an empty alias group, which config validation rejects.
    pub fn label(&self) -> Option<&str> {
        match self {
            RegionSpec::Single(name) => Some(name),
            RegionSpec::Aliases(names) => names.first().map(String::as_str),
        }
    }

    /// Names to submit to the locator search, in order.
    pub fn queries(&self) -> &[String] {
        match self {
            RegionSpec::Single(name) => std::slice::from_ref(name),
            RegionSpec::Aliases(names) => names,
        }
    }
}

impl std::fmt::Display for RegionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionSpec::Single(name) => f.write_str(name),
            RegionSpec::Aliases(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

/// The fixed region list: 17 entries, five of them alias groups.
pub fn default_regions() -> Vec<RegionSpec> {
    vec![
        RegionSpec::single("서울"),
        RegionSpec::single("부산"),
        RegionSpec::single("대구"),
        RegionSpec::single("인천"),
        RegionSpec::single("광주"),
        RegionSpec::single("대전"),
        RegionSpec::single("울산"),
        RegionSpec::single("세종"),
        RegionSpec::single("경기"),
        RegionSpec::aliases(&["충북", "충청북도"]),
        RegionSpec::aliases(&["충남", "충청남도"]),
        RegionSpec::aliases(&["전남", "전라남도"]),
        RegionSpec::aliases(&["경북", "경상북도"]),
        RegionSpec::aliases(&["경남", "경상남도"]),
        RegionSpec::single("강원"),
        RegionSpec::single("전북"),
        RegionSpec::single("제주"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(road: Option<&str>) -> StoreRecord {
        StoreRecord {
            region_label: "서울".into(),
            store_name: "강남점".into(),
            address: "서울특별시 강남구 역삼동 1".into(),
            road_address: road.map(String::from),
            phone: "02-123-4567".into(),
            hours: "24시간".into(),
            services: "맥딜리버리, 드라이브스루".into(),
            latitude: "37.5".into(),
            longitude: "127.0".into(),
        }
    }

    #[test]
    fn test_csv_record_includes_road_address_when_present() {
        let r = record(Some("서울특별시 강남구 테헤란로 1"));
        let row = r.to_csv_record();
        assert_eq!(row.len(), 9);
        assert_eq!(row[3], "서울특별시 강남구 테헤란로 1");
        assert_eq!(row[8], "127.0");
    }

    #[test]
    fn test_csv_record_omits_road_address_column_when_absent() {
        let r = record(None);
        let row = r.to_csv_record();
        assert_eq!(row.len(), 8);
        assert_eq!(row[3], "02-123-4567");
    }

    #[test]
    fn test_default_regions_shape() {
        let regions = default_regions();
        assert_eq!(regions.len(), 17);
        let groups = regions
            .iter()
            .filter(|r| matches!(r, RegionSpec::Aliases(_)))
            .count();
        assert_eq!(groups, 5);
    }

    #[test]
    fn test_region_label_and_queries() {
        let group = RegionSpec::aliases(&["충북", "충청북도"]);
        assert_eq!(group.label(), Some("충북"));
        assert_eq!(group.queries(), ["충북", "충청북도"]);

        let single = RegionSpec::single("서울");
        assert_eq!(single.label(), Some("서울"));
        assert_eq!(single.queries(), ["서울"]);
        assert_eq!(RegionSpec::Aliases(vec![]).label(), None);
    }

    #[test]
    fn test_region_spec_from_yaml() {
        let specs: Vec<RegionSpec> = serde_yaml::from_str("- 서울\n- [충북, 충청북도]\n").unwrap();
        assert_eq!(
            specs,
            vec![RegionSpec::single("서울"), RegionSpec::aliases(&["충북", "충청북도"])]
        );
    }
}
