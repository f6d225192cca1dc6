use itertools::Itertools;
use std::collections::HashMap;

use crate::analyzers::service::StopEvent;
use crate::feed::time::TimeOfDay;

/// Largest gap in minutes between chronologically adjacent events, per route.
/// Routes with fewer than two events have no entry.
pub fn route_headways<'a>(events: &[StopEvent<'a>]) -> HashMap<&'a str, f64> {
    let by_route: HashMap<&'a str, Vec<TimeOfDay>> = events
        .iter()
        .map(|event| (event.route_id, event.arrival))
        .into_group_map();

    by_route
        .into_iter()
        .filter_map(|(route_id, times)| max_gap_minutes(times).map(|gap| (route_id, gap)))
        .collect()
}

fn max_gap_minutes(mut times: Vec<TimeOfDay>) -> Option<f64> {
    times.sort_unstable();
    times
        .iter()
        .tuple_windows()
        .map(|(a, b)| (b.seconds() - a.seconds()) as f64 / 60.0)
        .max_by(f64::total_cmp)
}
