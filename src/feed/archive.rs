//! Validation and extraction of a zipped GTFS feed.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::AnalysisError;
use crate::feed::records::{Calendar, Feed, FeedInfo, Route, ShapePoint, StopTime, Trip};
use crate::feed::scratch::ScratchDir;
use crate::options::AnalyzeOptions;

pub const ROUTES_FILE: &str = "routes.txt";
pub const TRIPS_FILE: &str = "trips.txt";
pub const STOP_TIMES_FILE: &str = "stop_times.txt";
pub const CALENDAR_FILE: &str = "calendar.txt";
pub const SHAPES_FILE: &str = "shapes.txt";
pub const FEED_INFO_FILE: &str = "feed_info.txt";

/// Files that must sit at the root of every archive.
pub const REQUIRED_FILES: [&str; 5] = [
    ROUTES_FILE,
    TRIPS_FILE,
    STOP_TIMES_FILE,
    CALENDAR_FILE,
    SHAPES_FILE,
];

/// Name used in errors about the archive container itself.
pub const ARCHIVE_NAME: &str = "<archive>";

/// Returns the required files absent from `names`, sorted.
pub fn missing_required_files<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let present: HashSet<&str> = names.into_iter().collect();
    let mut missing: Vec<String> = REQUIRED_FILES
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| name.to_string())
        .collect();
    missing.sort();
    missing
}

/// Validates and extracts an archive of `size` bytes, then parses its
/// relations. The extraction directory never outlives this call.
pub fn load_feed<R: Read + Seek>(
    reader: R,
    size: u64,
    options: &AnalyzeOptions,
) -> Result<Feed, AnalysisError> {
    if size > options.max_size_bytes {
        return Err(AnalysisError::TooLarge {
            size,
            limit: options.max_size_bytes,
        });
    }

    let mut archive =
        ZipArchive::new(reader).map_err(|e| AnalysisError::malformed(ARCHIVE_NAME, e))?;

    let missing = missing_required_files(archive.file_names());
    if !missing.is_empty() {
        warn!(missing = ?missing, "Archive is missing required files");
        return Err(AnalysisError::MissingRequiredFiles(missing));
    }

    let scratch = ScratchDir::create_in(&options.scratch_root)?;
    archive.extract(scratch.path())?;
    debug!(entries = archive.len(), "Archive extracted");

    let feed_info = read_feed_info(&scratch);
    if let Some(end_date) = feed_info.as_ref().and_then(|info| info.feed_end_date) {
        if end_date < options.today {
            return Err(AnalysisError::FeedExpired { end_date });
        }
    }

    let feed = Feed {
        routes: read_relation::<Route>(&scratch, ROUTES_FILE, &["route_id"])?,
        trips: read_relation::<Trip>(
            &scratch,
            TRIPS_FILE,
            &["route_id", "service_id", "trip_id"],
        )?,
        stop_times: read_relation::<StopTime>(
            &scratch,
            STOP_TIMES_FILE,
            &["trip_id", "arrival_time"],
        )?,
        calendar: read_relation::<Calendar>(
            &scratch,
            CALENDAR_FILE,
            &[
                "service_id",
                "monday",
                "tuesday",
                "wednesday",
                "thursday",
                "friday",
                "saturday",
                "sunday",
            ],
        )?,
        shapes: read_relation::<ShapePoint>(
            &scratch,
            SHAPES_FILE,
            &["shape_id", "shape_pt_lat", "shape_pt_lon", "shape_pt_sequence"],
        )?,
        feed_info,
    };

    info!(
        routes = feed.routes.len(),
        trips = feed.trips.len(),
        stop_times = feed.stop_times.len(),
        services = feed.calendar.len(),
        shape_points = feed.shapes.len(),
        "Feed loaded"
    );

    Ok(feed)
}

fn csv_reader(file: File) -> csv::Reader<BufReader<File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file))
}

/// Parses one extracted file, checking its header carries `columns` before
/// reading any row.
fn read_relation<T: DeserializeOwned>(
    scratch: &ScratchDir,
    name: &str,
    columns: &[&str],
) -> Result<Vec<T>, AnalysisError> {
    let file = File::open(scratch.join(name))?;
    let mut rdr = csv_reader(file);

    let headers = rdr
        .headers()
        .map_err(|e| AnalysisError::malformed(name, e))?
        .clone();
    let missing: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::malformed(
            name,
            format!("missing columns: {}", missing.join(", ")),
        ));
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T = result.map_err(|e| AnalysisError::malformed(name, e))?;
        rows.push(row);
    }

    debug!(file = name, rows = rows.len(), "Parsed relation");
    Ok(rows)
}

/// Reads the first row of feed_info.txt. The file is optional and a broken
/// one is ignored.
fn read_feed_info(scratch: &ScratchDir) -> Option<FeedInfo> {
    let path = scratch.join(FEED_INFO_FILE);
    if !path.exists() {
        return None;
    }

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            warn!(error = %e, "Failed to open feed_info.txt, ignoring it");
            return None;
        }
    };

    match csv_reader(file).deserialize::<FeedInfo>().next() {
        Some(Ok(info)) => Some(info),
        Some(Err(e)) => {
            warn!(error = %e, "Failed to parse feed_info.txt, ignoring it");
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::{Cursor, Write};
    use std::path::PathBuf;
    use zip::write::SimpleFileOptions;

    const ROUTES: &str = "route_id,route_short_name\nR1,1\n";
    const TRIPS: &str = "route_id,service_id,trip_id,shape_id\nR1,WK,T1,S1\n";
    const STOP_TIMES: &str = "trip_id,arrival_time,stop_sequence\nT1,08:00:00,1\n";
    const CALENDAR: &str = "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday\nWK,1,1,1,1,1,0,0\n";
    const SHAPES: &str = "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\nS1,1.0,2.0,1\n";

    fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn complete_feed() -> Vec<(&'static str, &'static str)> {
        vec![
            (ROUTES_FILE, ROUTES),
            (TRIPS_FILE, TRIPS),
            (STOP_TIMES_FILE, STOP_TIMES),
            (CALENDAR_FILE, CALENDAR),
            (SHAPES_FILE, SHAPES),
        ]
    }

    fn options(name: &str) -> (AnalyzeOptions, PathBuf) {
        let root = std::env::temp_dir().join(format!(
            "gtfs_frequency_archive_{}_{}",
            name,
            uuid::Uuid::new_v4()
        ));
        let options = AnalyzeOptions::default()
            .with_scratch_root(&root)
            .with_today(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        (options, root)
    }

    fn load(files: &[(&str, &str)], options: &AnalyzeOptions) -> Result<Feed, AnalysisError> {
        let bytes = zip_bytes(files);
        load_feed(Cursor::new(&bytes), bytes.len() as u64, options)
    }

    fn assert_scratch_empty(root: &PathBuf) {
        if root.exists() {
            assert_eq!(std::fs::read_dir(root).unwrap().count(), 0);
            std::fs::remove_dir_all(root).unwrap();
        }
    }

    #[test]
    fn test_missing_required_files_sorted() {
        let missing = missing_required_files(["trips.txt", "routes.txt", "stop_times.txt"]);
        assert_eq!(missing, vec!["calendar.txt", "shapes.txt"]);
    }

    #[test]
    fn test_load_complete_feed() {
        let (options, root) = options("complete");
        let feed = load(&complete_feed(), &options).unwrap();

        assert_eq!(feed.routes.len(), 1);
        assert_eq!(feed.trips[0].shape_ref(), Some("S1"));
        assert_eq!(feed.stop_times[0].arrival_time.as_deref(), Some("08:00:00"));
        assert!(feed.calendar[0].runs_every_weekday());
        assert_eq!(feed.shapes[0].shape_pt_lon, 2.0);
        assert!(feed.feed_info.is_none());
        assert_scratch_empty(&root);
    }

    #[test]
    fn test_too_large_is_rejected_before_opening() {
        let (options, root) = options("too_large");
        let options = options.with_max_size(10);
        let err = load_feed(Cursor::new(vec![0u8; 11]), 11, &options).unwrap_err();
        assert!(matches!(err, AnalysisError::TooLarge { size: 11, limit: 10 }));
        assert!(!root.exists());
    }

    #[test]
    fn test_not_a_zip_is_malformed() {
        let (options, root) = options("not_zip");
        let data = b"route_id\nR1\n".to_vec();
        let err = load_feed(Cursor::new(&data), data.len() as u64, &options).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedFeed { .. }));
        assert!(!root.exists());
    }

    #[test]
    fn test_missing_files_reported_together() {
        let (options, root) = options("missing");
        let files = vec![
            (ROUTES_FILE, ROUTES),
            (TRIPS_FILE, TRIPS),
            (STOP_TIMES_FILE, STOP_TIMES),
        ];
        match load(&files, &options).unwrap_err() {
            AnalysisError::MissingRequiredFiles(names) => {
                assert_eq!(names, vec!["calendar.txt", "shapes.txt"])
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_scratch_empty(&root);
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let (options, root) = options("missing_column");
        let mut files = complete_feed();
        files[3] = (CALENDAR_FILE, "service_id,monday\nWK,1\n");
        match load(&files, &options).unwrap_err() {
            AnalysisError::MalformedFeed { file, reason } => {
                assert_eq!(file, CALENDAR_FILE);
                assert!(reason.contains("tuesday"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_scratch_empty(&root);
    }

    #[test]
    fn test_stop_times_without_arrival_column_is_malformed() {
        let (options, root) = options("no_arrival_column");
        let mut files = complete_feed();
        files[2] = (
            STOP_TIMES_FILE,
            "trip_id,departure_time,stop_sequence\nT1,08:00:00,1\nT1,08:10:00,2\n",
        );
        match load(&files, &options).unwrap_err() {
            AnalysisError::MalformedFeed { file, reason } => {
                assert_eq!(file, STOP_TIMES_FILE);
                assert!(reason.contains("arrival_time"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_scratch_empty(&root);
    }

    #[test]
    fn test_empty_arrival_cells_are_accepted() {
        let (options, root) = options("empty_arrival");
        let mut files = complete_feed();
        files[2] = (
            STOP_TIMES_FILE,
            "trip_id,arrival_time,stop_sequence\nT1,,1\n",
        );
        let feed = load(&files, &options).unwrap();
        assert_eq!(feed.stop_times[0].arrival_time, None);
        assert_scratch_empty(&root);
    }

    #[test]
    fn test_bad_value_is_malformed() {
        let (options, root) = options("bad_value");
        let mut files = complete_feed();
        files[4] = (
            SHAPES_FILE,
            "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\nS1,north,2.0,1\n",
        );
        let err = load(&files, &options).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedFeed { ref file, .. } if file == SHAPES_FILE));
        assert_scratch_empty(&root);
    }

    #[test]
    fn test_expired_feed_is_rejected() {
        let (options, root) = options("expired");
        let mut files = complete_feed();
        files.push((
            FEED_INFO_FILE,
            "feed_publisher_name,feed_publisher_url,feed_lang,feed_end_date\nMetro,https://metro.example,en,20250531\n",
        ));
        let err = load(&files, &options).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::FeedExpired { end_date } if end_date == NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()
        ));
        assert_scratch_empty(&root);
    }

    #[test]
    fn test_feed_ending_today_is_accepted() {
        let (options, root) = options("ends_today");
        let mut files = complete_feed();
        files.push((
            FEED_INFO_FILE,
            "feed_publisher_name,feed_publisher_url,feed_lang,feed_version,feed_end_date\nMetro,https://metro.example,en,v7,20250601\n",
        ));
        let feed = load(&files, &options).unwrap();
        let info = feed.feed_info.unwrap();
        assert_eq!(info.feed_version, "v7");
        assert_eq!(info.feed_end_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_scratch_empty(&root);
    }

    #[test]
    fn test_unreadable_feed_info_is_ignored() {
        let (options, root) = options("bad_feed_info");
        let mut files = complete_feed();
        files.push((
            FEED_INFO_FILE,
            "feed_publisher_name,feed_end_date\nMetro,not-a-date\n",
        ));
        let feed = load(&files, &options).unwrap();
        assert!(feed.feed_info.is_none());
        assert_scratch_empty(&root);
    }
}
