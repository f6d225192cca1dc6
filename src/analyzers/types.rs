//! Data types produced by the analysis pipeline.

use serde::Serialize;

use crate::analyzers::frequency::{FrequencyBucket, FrequencyCounts};
use crate::analyzers::shape::Coordinate;
use crate::feed::records::FeedInfo;

/// Frequency class and representative polyline of one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub route_id: String,
    pub frequency_bucket: FrequencyBucket,
    pub shape: Vec<Coordinate>,
}

/// Complete analysis result for a single feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_info: Option<FeedInfo>,
    pub frequencies: FrequencyCounts,
    pub routes: Vec<RouteRecord>,
}

impl FeedAnalysis {
    /// Tags the result with a display name, e.g. the uploaded file's stem.
    pub fn with_feed_name(mut self, feed_name: &str) -> Self {
        self.feed_name = Some(feed_name.to_string());
        self
    }
}

/// One CSV row summarizing a feed's bucket counts.
#[derive(Debug, Default, Serialize)]
pub struct FrequencySummary {
    pub feed_name: Option<String>,
    pub feed_version: Option<String>,
    pub routes: usize,
    pub every_10: usize,
    pub every_15: usize,
    pub every_20: usize,
    pub every_30: usize,
    pub every_60: usize,
    pub worse: usize,
    pub unknown: usize,
}

impl From<&FeedAnalysis> for FrequencySummary {
    fn from(analysis: &FeedAnalysis) -> Self {
        let counts = &analysis.frequencies;
        FrequencySummary {
            feed_name: analysis.feed_name.clone(),
            feed_version: analysis
                .feed_info
                .as_ref()
                .map(|info| info.feed_version.clone())
                .filter(|v| !v.is_empty()),
            routes: counts.total(),
            every_10: counts.get(FrequencyBucket::Every10),
            every_15: counts.get(FrequencyBucket::Every15),
            every_20: counts.get(FrequencyBucket::Every20),
            every_30: counts.get(FrequencyBucket::Every30),
            every_60: counts.get(FrequencyBucket::Every60),
            worse: counts.get(FrequencyBucket::Worse),
            unknown: counts.get(FrequencyBucket::Unknown),
        }
    }
}
