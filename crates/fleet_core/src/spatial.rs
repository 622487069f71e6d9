//! Great-circle distance between graph nodes.
//!
//! Used as the A* heuristic and as the dispatch distance estimate. Output is
//! in kilometres, the same unit edge weights are expected to use.

use crate::graph::Node;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two lat/lon pairs given in degrees.
pub fn haversine_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let (lat1, lon1) = (lat_a.to_radians(), lon_a.to_radians());
    let (lat2, lon2) = (lat_b.to_radians(), lon_b.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Haversine distance between two nodes' coordinates.
pub fn distance_km_between_nodes(a: &Node, b: &Node) -> f64 {
    haversine_km(a.lat, a.lon, b.lat, b.lon)
}
