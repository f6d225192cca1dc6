//! Picks one polyline per route.

use itertools::Itertools;
use std::collections::HashMap;

use crate::feed::records::{ShapePoint, Trip};

/// A `[latitude, longitude]` pair.
pub type Coordinate = [f64; 2];

/// Shape points grouped by shape id, each group ordered by `shape_pt_sequence`.
#[derive(Debug, Default)]
pub struct ShapeIndex<'a> {
    shapes: HashMap<&'a str, Vec<&'a ShapePoint>>,
}

impl<'a> ShapeIndex<'a> {
    pub fn build(points: &'a [ShapePoint]) -> Self {
        let mut shapes: HashMap<&'a str, Vec<&'a ShapePoint>> = points
            .iter()
            .map(|point| (point.shape_id.as_str(), point))
            .into_group_map();

        for group in shapes.values_mut() {
            group.sort_by_key(|point| point.shape_pt_sequence);
        }

        Self { shapes }
    }

    /// Ordered coordinates of `shape_id`; empty if the feed has no such shape.
    pub fn coordinates(&self, shape_id: &str) -> Vec<Coordinate> {
        self.shapes
            .get(shape_id)
            .map(|group| {
                group
                    .iter()
                    .map(|point| [point.shape_pt_lat, point.shape_pt_lon])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// Shape id of the first trip, in feed order, that references one, per route.
pub fn first_shape_by_route(trips: &[Trip]) -> HashMap<&str, &str> {
    let mut first: HashMap<&str, &str> = HashMap::new();
    for trip in trips {
        if let Some(shape_id) = trip.shape_ref() {
            first.entry(trip.route_id.as_str()).or_insert(shape_id);
        }
    }
    first
}

/// Representative polyline for `route_id`, looked up over every trip of the
/// feed regardless of service day.
pub fn resolve_route_shape(
    route_id: &str,
    first_shapes: &HashMap<&str, &str>,
    index: &ShapeIndex<'_>,
) -> Vec<Coordinate> {
    first_shapes
        .get(route_id)
        .map(|shape_id| index.coordinates(shape_id))
        .unwrap_or_default()
}
