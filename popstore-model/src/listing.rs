//! Popup-store listing records as served by the listing API.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle of a popup store relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ListingStatus {
    #[default]
    Ongoing,
    Upcoming,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Tag {
    pub id: u64,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub usage_count: u64,
}

/// Card-level listing record used by feeds and carousels.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ListingSummary {
    pub id: crate::ListingId,
    pub title: String,
    pub member_nickname: String,
    pub post_img_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub category: Option<String>,
    pub status: ListingStatus,
    pub tags: Vec<Tag>,
    pub like_count: u64,
    pub view_count: u64,
}

/// Opening hours for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DayHours {
    pub open: Option<String>,
    pub close: Option<String>,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct BusinessInfo {
    /// Keyed by weekday as sent by the server (`MONDAY`, `Monday`, ...).
    pub operating_hours: BTreeMap<String, DayHours>,
    pub entry_fee: Option<String>,
    pub nearby_subway: Option<String>,
    pub nearby_subway_exit: Option<String>,
}

/// Full listing record for the detail page. Carries the baseline like count
/// the engagement state is seeded from.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ListingDetail {
    pub id: crate::ListingId,
    pub member_email: String,
    pub member_nickname: String,
    pub title: String,
    pub content: String,
    pub like_count: u64,
    pub view_count: u64,
    pub created_time_at: Option<String>,
    pub post_img_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub city: Option<String>,
    pub dong: Option<String>,
    pub street: Option<String>,
    pub zipcode: Option<String>,
    pub detail_address: Option<String>,
    pub category: Option<String>,
    pub status: ListingStatus,
    pub tags: Vec<Tag>,
    pub business_info: Option<BusinessInfo>,
}

impl ListingDetail {
    /// Street address assembled from the non-empty location parts.
    pub fn address(&self) -> String {
        [&self.city, &self.dong, &self.street, &self.detail_address]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `2025.3.1 ~ 2025.3.31`, or whichever side is known. Unparseable dates
    /// are treated as absent.
    pub fn period(&self) -> Option<String> {
        let start = self.start_date.as_deref().and_then(format_date);
        let end = self.end_date.as_deref().and_then(format_date);
        match (start, end) {
            (Some(s), Some(e)) => Some(format!("{s} ~ {e}")),
            (Some(one), None) | (None, Some(one)) => Some(one),
            (None, None) => None,
        }
    }
}

/// Render a server date as `YYYY.M.D` (no zero padding).
pub fn format_date(raw: &str) -> Option<String> {
    let date = parse_date(raw)?;
    Some(date.format("%Y.%-m.%-d").to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}
