use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::assemble::assemble;
use crate::analyzers::frequency::{FrequencyBucket, FrequencyCounts};
use crate::analyzers::headway::route_headways;
use crate::analyzers::service::{daytime_stop_events, filter_trips, weekday_service_ids};
use crate::analyzers::shape::{ShapeIndex, first_shape_by_route, resolve_route_shape};
use crate::analyzers::types::{FeedAnalysis, RouteRecord};
use crate::error::AnalysisError;
use crate::feed::archive::load_feed;
use crate::feed::records::Feed;
use crate::options::AnalyzeOptions;

/// Analyzes a zipped GTFS feed held in memory.
#[tracing::instrument(skip(bytes, options), fields(bytes = bytes.len()))]
pub fn analyze_bytes(bytes: &[u8], options: &AnalyzeOptions) -> Result<FeedAnalysis, AnalysisError> {
    let feed = load_feed(Cursor::new(bytes), bytes.len() as u64, options)?;
    analyze_feed(feed, options)
}

/// Analyzes a zipped GTFS feed on disk.
#[tracing::instrument(skip(path, options), fields(path = %path.display()))]
pub fn analyze_path(path: &Path, options: &AnalyzeOptions) -> Result<FeedAnalysis, AnalysisError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let feed = load_feed(BufReader::new(file), size, options)?;
    analyze_feed(feed, options)
}

/// Runs the frequency pipeline over already loaded relations.
pub fn analyze_feed(feed: Feed, options: &AnalyzeOptions) -> Result<FeedAnalysis, AnalysisError> {
    let services = weekday_service_ids(&feed.calendar);
    let weekday_trips = filter_trips(&feed.trips, &services);
    let events = daytime_stop_events(&feed.stop_times, &weekday_trips, options.window)?;
    debug!(
        weekday_services = services.len(),
        weekday_trips = weekday_trips.len(),
        daytime_events = events.len(),
        "Schedule filtered"
    );

    let headways = route_headways(&events);

    let shape_index = ShapeIndex::build(&feed.shapes);
    let first_shapes = first_shape_by_route(&feed.trips);

    let mut frequencies = FrequencyCounts::default();
    let mut routes = Vec::with_capacity(feed.routes.len());
    for route in &feed.routes {
        let bucket = FrequencyBucket::classify(headways.get(route.route_id.as_str()).copied());
        frequencies.record(bucket);
        routes.push(RouteRecord {
            route_id: route.route_id.clone(),
            frequency_bucket: bucket,
            shape: resolve_route_shape(&route.route_id, &first_shapes, &shape_index),
        });
    }

    info!(
        routes = routes.len(),
        with_headway = headways.len(),
        shapes = shape_index.len(),
        "Feed analyzed"
    );

    Ok(assemble(frequencies, routes, feed.feed_info))
}
