use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Service frequency class of a route, named by its headway ceiling in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FrequencyBucket {
    #[serde(rename = "10")]
    Every10,
    #[serde(rename = "15")]
    Every15,
    #[serde(rename = "20")]
    Every20,
    #[serde(rename = "30")]
    Every30,
    #[serde(rename = "60")]
    Every60,
    #[serde(rename = "worse")]
    Worse,
    #[serde(rename = "unknown")]
    Unknown,
}

impl FrequencyBucket {
    pub const ALL: [FrequencyBucket; 7] = [
        FrequencyBucket::Every10,
        FrequencyBucket::Every15,
        FrequencyBucket::Every20,
        FrequencyBucket::Every30,
        FrequencyBucket::Every60,
        FrequencyBucket::Worse,
        FrequencyBucket::Unknown,
    ];

    /// Converts a headway in minutes into a bucket. Upper bounds are inclusive.
    ///
    /// | Headway      | Bucket  |
    /// |--------------|---------|
    /// | <= 10        | 10      |
    /// | <= 15        | 15      |
    /// | <= 20        | 20      |
    /// | <= 30        | 30      |
    /// | <= 60        | 60      |
    /// | > 60         | worse   |
    /// | none         | unknown |
    pub fn classify(headway: Option<f64>) -> Self {
        match headway {
            None => FrequencyBucket::Unknown,
            Some(h) if h <= 10.0 => FrequencyBucket::Every10,
            Some(h) if h <= 15.0 => FrequencyBucket::Every15,
            Some(h) if h <= 20.0 => FrequencyBucket::Every20,
            Some(h) if h <= 30.0 => FrequencyBucket::Every30,
            Some(h) if h <= 60.0 => FrequencyBucket::Every60,
            Some(_) => FrequencyBucket::Worse,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrequencyBucket::Every10 => "10",
            FrequencyBucket::Every15 => "15",
            FrequencyBucket::Every20 => "20",
            FrequencyBucket::Every30 => "30",
            FrequencyBucket::Every60 => "60",
            FrequencyBucket::Worse => "worse",
            FrequencyBucket::Unknown => "unknown",
        }
    }
}

/// Number of routes per bucket. Every bucket is present, unused ones at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyCounts(BTreeMap<FrequencyBucket, usize>);

impl Default for FrequencyCounts {
    fn default() -> Self {
        Self(FrequencyBucket::ALL.iter().map(|&b| (b, 0)).collect())
    }
}

impl FrequencyCounts {
    pub fn record(&mut self, bucket: FrequencyBucket) {
        *self.0.entry(bucket).or_default() += 1;
    }

    pub fn get(&self, bucket: FrequencyBucket) -> usize {
        self.0.get(&bucket).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrequencyBucket, usize)> + '_ {
        self.0.iter().map(|(&b, &n)| (b, n))
    }
}

impl FromIterator<FrequencyBucket> for FrequencyCounts {
    fn from_iter<I: IntoIterator<Item = FrequencyBucket>>(iter: I) -> Self {
        let mut counts = FrequencyCounts::default();
        for bucket in iter {
            counts.record(bucket);
        }
        counts
    }
}
