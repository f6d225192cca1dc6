use crate::analyzers::frequency::FrequencyCounts;
use crate::analyzers::types::{FeedAnalysis, RouteRecord};
use crate::feed::records::FeedInfo;

/// Combines bucket counts, route records and feed metadata into the final
/// result. Purely structural.
pub fn assemble(
    frequencies: FrequencyCounts,
    routes: Vec<RouteRecord>,
    feed_info: Option<FeedInfo>,
) -> FeedAnalysis {
    FeedAnalysis {
        feed_name: None,
        feed_info,
        frequencies,
        routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::frequency::FrequencyBucket;
    use crate::analyzers::types::FrequencySummary;

    fn sample() -> FeedAnalysis {
        let routes = vec![
            RouteRecord {
                route_id: "R1".to_string(),
                frequency_bucket: FrequencyBucket::Every15,
                shape: vec![[47.5, -122.3], [47.6, -122.4]],
            },
            RouteRecord {
                route_id: "R2".to_string(),
                frequency_bucket: FrequencyBucket::Unknown,
                shape: vec![],
            },
        ];
        let counts = routes.iter().map(|r| r.frequency_bucket).collect();
        assemble(counts, routes, None)
    }

    #[test]
    fn test_assembled_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();

        assert!(json.get("feed_info").is_none());
        assert!(json.get("feed_name").is_none());
        assert_eq!(json["frequencies"]["15"], 1);
        assert_eq!(json["frequencies"]["unknown"], 1);
        assert_eq!(json["routes"][0]["route_id"], "R1");
        assert_eq!(json["routes"][0]["frequency_bucket"], "15");
        assert_eq!(json["routes"][0]["shape"][1][0], 47.6);
        assert_eq!(json["routes"][1]["shape"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_feed_info_and_name_merged() {
        let info = FeedInfo {
            feed_publisher_name: "Metro".to_string(),
            feed_version: "2024-09".to_string(),
            ..Default::default()
        };
        let analysis = assemble(FrequencyCounts::default(), vec![], Some(info))
            .with_feed_name("seattle");
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["feed_name"], "seattle");
        assert_eq!(json["feed_info"]["feed_publisher_name"], "Metro");

        let summary = FrequencySummary::from(&analysis);
        assert_eq!(summary.feed_version.as_deref(), Some("2024-09"));
        assert_eq!(summary.routes, 0);
    }

    #[test]
    fn test_summary_counts() {
        let summary = FrequencySummary::from(&sample());
        assert_eq!(summary.routes, 2);
        assert_eq!(summary.every_15, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.feed_version, None);
    }
}
