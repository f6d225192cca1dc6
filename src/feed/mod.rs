//! Loading of zipped GTFS feeds into typed relations.

pub mod archive;
pub mod records;
pub mod scratch;
pub mod time;
