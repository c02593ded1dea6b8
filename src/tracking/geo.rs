//! Spherical distance and polyline text parsing. Coordinates are WGS84 degrees.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance in meters.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Parses a polyline given as whitespace-separated `lon,lat` points.
///
/// A bare `lon lat lon lat ...` token stream is accepted too. Missing or
/// malformed text yields an empty polyline, which means "no geometry".
pub fn parse_polyline(text: Option<&str>) -> Vec<GeoPoint> {
    let Some(text) = text else {
        return Vec::new();
    };
    if text.trim().is_empty() {
        return Vec::new();
    }

    let parsed = if text.contains(',') {
        parse_comma_pairs(text)
    } else {
        parse_bare_tokens(text)
    };
    parsed.unwrap_or_default()
}

fn parse_comma_pairs(text: &str) -> Option<Vec<GeoPoint>> {
    text.split_whitespace()
        .map(|pair| {
            let (lon, lat) = pair.split_once(',')?;
            parse_point(lon, lat)
        })
        .collect()
}

fn parse_bare_tokens(text: &str) -> Option<Vec<GeoPoint>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return None;
    }
    tokens
        .chunks_exact(2)
        .map(|pair| parse_point(pair[0], pair[1]))
        .collect()
}

/// Parses a coordinate given as separate text fields, as stations carry them.
pub fn parse_point(lon: &str, lat: &str) -> Option<GeoPoint> {
    let lon: f64 = lon.trim().parse().ok()?;
    let lat: f64 = lat.trim().parse().ok()?;
    if !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    Some(GeoPoint::new(lat, lon))
}

/// Sum of segment lengths in meters; zero for fewer than two points.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}
