//! Weekday frequency analysis of a GTFS schedule.
//!
//! The pipeline filters the schedule to weekday daytime service, measures the
//! worst gap between departures on every route, buckets each route by that
//! gap and attaches one representative shape per route.

pub mod analyzer;
pub mod assemble;
pub mod frequency;
pub mod headway;
pub mod service;
pub mod shape;
pub mod types;
