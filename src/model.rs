use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::nameparse;

/// One entry of the static province catalog. Identity is `key`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Province {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Uploader {
    pub login: String,
    pub avatar_url: String,
}

/// A downloadable calendar file from the release feed, with location fields
/// derived from its filename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub name: String,
    #[serde(default)]
    pub download_count: u64,
    pub browser_download_url: String,
    #[serde(default)]
    pub uploader: Uploader,
    /// Filename-derived, hyphens replaced with spaces. Best-effort.
    #[serde(default)]
    pub province: String,
    /// Exactly one of `town`/`block` is set for a well-formed filename.
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub block: Option<u32>,
}

impl Asset {
    /// Derive the location fields from the raw feed entry's filename.
    pub fn from_raw(raw: RawAsset) -> Self {
        let parsed = nameparse::parse(&raw.name);
        Asset {
            name: raw.name,
            download_count: raw.download_count,
            browser_download_url: raw.browser_download_url,
            uploader: raw.uploader,
            province: parsed.province,
            town: parsed.town,
            block: parsed.block,
        }
    }

    /// Download URL rewritten to the live-sync calendar scheme. A pure string
    /// transform; URLs that are not https are returned unchanged.
    pub fn subscription_url(&self) -> String {
        match self.browser_download_url.strip_prefix("https://") {
            Some(rest) => format!("webcal://{rest}"),
            None => self.browser_download_url.clone(),
        }
    }

    /// The contract handed to the consuming calendar widget.
    pub fn calendar_link(&self) -> CalendarLink {
        CalendarLink {
            url: self.subscription_url(),
            format: "ics".to_string(),
        }
    }
}

/// Asset entry as published by the release feed, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAsset {
    pub name: String,
    #[serde(default)]
    pub download_count: u64,
    pub browser_download_url: String,
    #[serde(default)]
    pub uploader: Uploader,
}

/// Latest-release response. Fields other than `assets` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub assets: Vec<serde_json::Value>,
}

/// One row of the backend's machine-friendly feed.
///
/// The upstream misspells the end-of-window field as `finsh`; the rename
/// keeps the wire format intact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineRecord {
    pub area_name: String,
    pub stage: String,
    pub start: DateTime<FixedOffset>,
    #[serde(rename = "finsh")]
    pub finish: DateTime<FixedOffset>,
    pub source: String,
    pub province: String,
    pub block: String,
}

/// One page of the paging endpoint, with its cursor.
///
/// Invariant: `0 <= last_record <= total_records`; the fetch is complete
/// exactly when the two are equal.
#[derive(Debug, Clone, Deserialize)]
pub struct MachinePage {
    #[serde(default)]
    pub data: Vec<MachineRecord>,
    #[serde(rename = "lastRecord")]
    pub last_record: u64,
    #[serde(rename = "totalRecords")]
    pub total_records: u64,
}

/// Deduplicated projection of `MachineRecord` for area-selection controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AreaGroup {
    pub area_name: String,
    pub province: String,
    pub block: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuburbEntry {
    #[serde(rename = "subName")]
    pub sub_name: String,
    #[serde(rename = "blockId")]
    pub block_id: String,
}

/// URL + format pair consumed by the calendar widget.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CalendarLink {
    pub url: String,
    pub format: String,
}

/// Result of one full sync: both upstream views, joined.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSnapshot {
    pub assets: Vec<Asset>,
    pub records: Vec<MachineRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_raw_derives_location_fields() {
        let raw: RawAsset = serde_json::from_value(json!({
            "name": "western-cape-stellenbosch.ics",
            "download_count": 7,
            "browser_download_url": "https://example.com/western-cape-stellenbosch.ics",
            "uploader": { "login": "calendar-bot", "avatar_url": "https://example.com/a.png" }
        }))
        .unwrap();
        let asset = Asset::from_raw(raw);
        assert_eq!(asset.province, "western cape");
        assert_eq!(asset.town.as_deref(), Some("stellenbosch"));
        assert_eq!(asset.block, None);
        assert_eq!(asset.uploader.login, "calendar-bot");
    }

    #[test]
    fn subscription_url_rewrites_https_to_webcal() {
        let asset = Asset {
            name: "gauteng-4.ics".into(),
            download_count: 0,
            browser_download_url: "https://example.com/dl/gauteng-4.ics".into(),
            uploader: Uploader::default(),
            province: "gauteng".into(),
            town: None,
            block: Some(4),
        };
        assert_eq!(
            asset.subscription_url(),
            "webcal://example.com/dl/gauteng-4.ics"
        );
        let link = asset.calendar_link();
        assert_eq!(link.format, "ics");
        assert_eq!(link.url, "webcal://example.com/dl/gauteng-4.ics");
    }

    #[test]
    fn subscription_url_leaves_non_https_untouched() {
        let asset = Asset {
            name: "x.ics".into(),
            download_count: 0,
            browser_download_url: "http://example.com/x.ics".into(),
            uploader: Uploader::default(),
            province: String::new(),
            town: Some("x".into()),
            block: None,
        };
        assert_eq!(asset.subscription_url(), "http://example.com/x.ics");
    }

    #[test]
    fn machine_record_decodes_misspelled_finish_field() {
        let record: MachineRecord = serde_json::from_value(json!({
            "area_name": "western-cape-worcester",
            "stage": "2",
            "start": "2022-07-11T16:00:00+02:00",
            "finsh": "2022-07-11T18:30:00+02:00",
            "source": "https://twitter.com/Eskom_SA",
            "province": "western-cape",
            "block": "7"
        }))
        .unwrap();
        assert_eq!(record.area_name, "western-cape-worcester");
        assert!(record.finish > record.start);
    }

    #[test]
    fn machine_page_decodes_camel_case_cursor() {
        let page: MachinePage = serde_json::from_value(json!({
            "data": [],
            "lastRecord": 500,
            "totalRecords": 1200
        }))
        .unwrap();
        assert_eq!(page.last_record, 500);
        assert_eq!(page.total_records, 1200);
        assert!(page.data.is_empty());
    }

    #[test]
    fn suburb_entry_decodes_wire_names() {
        let entry: SuburbEntry = serde_json::from_value(json!({
            "subName": "Die Boord",
            "blockId": "12"
        }))
        .unwrap();
        assert_eq!(entry.sub_name, "Die Boord");
        assert_eq!(entry.block_id, "12");
    }

    #[test]
    fn release_tolerates_unknown_fields_and_missing_assets() {
        let release: Release =
            serde_json::from_value(json!({ "tag_name": "latest", "draft": false })).unwrap();
        assert!(release.assets.is_empty());
    }
}
