//! Typed rows of the GTFS files the analyzer reads.

use chrono::NaiveDate;
use serde::{self, Deserialize, Deserializer, Serialize};

/// A row of routes.txt. Everything except the id is carried through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_type: Option<String>,
}

/// A row of trips.txt.
#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub shape_id: Option<String>,
}

impl Trip {
    /// The shape reference, treating an empty cell as no reference.
    pub fn shape_ref(&self) -> Option<&str> {
        self.shape_id.as_deref().filter(|s| !s.is_empty())
    }
}

/// A row of stop_times.txt. The arrival time stays textual until the
/// service filter parses it.
#[derive(Debug, Clone, Deserialize)]
pub struct StopTime {
    pub trip_id: String,
    pub arrival_time: Option<String>,
    pub stop_sequence: Option<u32>,
}

/// A row of calendar.txt.
#[derive(Debug, Clone, Deserialize)]
pub struct Calendar {
    pub service_id: String,

    /// service availability by day (0 or 1)
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
}

impl Calendar {
    pub fn runs_every_weekday(&self) -> bool {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
        ]
        .iter()
        .all(|&flag| flag == 1)
    }
}

/// A row of shapes.txt.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapePoint {
    pub shape_id: String,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: u32,
}

/// The first row of feed_info.txt, if the archive carries one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedInfo {
    #[serde(default)]
    pub feed_publisher_name: String,
    #[serde(default)]
    pub feed_publisher_url: String,
    #[serde(default)]
    pub feed_version: String,
    #[serde(
        default,
        deserialize_with = "gtfs_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub feed_start_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "gtfs_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub feed_end_date: Option<NaiveDate>,
}

/// deserialize optional GTFS dates in YYYYMMDD format
fn gtfs_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// The five required relations plus optional metadata, as read from one archive.
#[derive(Debug, Default)]
pub struct Feed {
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub calendar: Vec<Calendar>,
    pub shapes: Vec<ShapePoint>,
    pub feed_info: Option<FeedInfo>,
}
