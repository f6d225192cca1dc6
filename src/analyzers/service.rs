//! Restricts the schedule to weekday service inside the daytime window.

use std::collections::{HashMap, HashSet};

use crate::error::AnalysisError;
use crate::feed::archive::STOP_TIMES_FILE;
use crate::feed::records::{Calendar, StopTime, Trip};
use crate::feed::time::{TimeOfDay, TimeWindow};

/// A stop time that survived filtering, tagged with its trip's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopEvent<'a> {
    pub route_id: &'a str,
    pub arrival: TimeOfDay,
}

/// Ids of services that run on all of Monday through Friday.
pub fn weekday_service_ids(calendar: &[Calendar]) -> HashSet<&str> {
    calendar
        .iter()
        .filter(|service| service.runs_every_weekday())
        .map(|service| service.service_id.as_str())
        .collect()
}

/// Trips operated under one of `services`, in their original order.
pub fn filter_trips<'a>(trips: &'a [Trip], services: &HashSet<&str>) -> Vec<&'a Trip> {
    trips
        .iter()
        .filter(|trip| services.contains(trip.service_id.as_str()))
        .collect()
}

/// Stop times of `trips` whose arrival falls inside `window`. A missing
/// arrival counts as midnight.
pub fn daytime_stop_events<'a>(
    stop_times: &[StopTime],
    trips: &[&'a Trip],
    window: TimeWindow,
) -> Result<Vec<StopEvent<'a>>, AnalysisError> {
    let route_by_trip: HashMap<&str, &'a str> = trips
        .iter()
        .map(|trip| (trip.trip_id.as_str(), trip.route_id.as_str()))
        .collect();

    let mut events = Vec::new();
    for stop_time in stop_times {
        let Some(&route_id) = route_by_trip.get(stop_time.trip_id.as_str()) else {
            continue;
        };

        let arrival = match stop_time.arrival_time.as_deref() {
            Some(raw) => raw
                .parse::<TimeOfDay>()
                .map_err(|e| AnalysisError::malformed(STOP_TIMES_FILE, e))?,
            None => TimeOfDay::MIDNIGHT,
        };

        if window.contains(arrival) {
            events.push(StopEvent { route_id, arrival });
        }
    }

    Ok(events)
}
