use super::geo::{distance, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    /// Closest point on the polyline.
    pub point: GeoPoint,
    /// Index of the segment the point lies on.
    pub segment_index: usize,
    /// Distance from the query to `point`, in meters.
    pub offset_m: f64,
    /// Along-path distance from the polyline start to `point`, in meters.
    pub meters_from_start: f64,
}

/// Projects `query` onto the closest segment of `polyline`.
///
/// A single-point polyline snaps to that point at distance zero from start.
/// Equally close segments resolve to the earliest one. Returns `None` only
/// for an empty polyline.
pub fn snap_to_polyline(query: GeoPoint, polyline: &[GeoPoint]) -> Option<Snap> {
    match polyline {
        [] => None,
        [only] => Some(Snap {
            point: *only,
            segment_index: 0,
            offset_m: distance(query, *only),
            meters_from_start: 0.0,
        }),
        _ => {
            let mut best: Option<Snap> = None;
            let mut preceding = 0.0;

            for (i, segment) in polyline.windows(2).enumerate() {
                let (a, b) = (segment[0], segment[1]);
                let projected = project_on_segment(query, a, b);
                let offset_m = distance(query, projected);

                if best.map_or(true, |prev| offset_m < prev.offset_m) {
                    best = Some(Snap {
                        point: projected,
                        segment_index: i,
                        offset_m,
                        meters_from_start: preceding + distance(a, projected),
                    });
                }

                preceding += distance(a, b);
            }

            best
        }
    }
}

/// Planar projection scaled by the cosine of the segment's mean latitude,
/// with the segment parameter clamped to `[0, 1]`.
fn project_on_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> GeoPoint {
    let cos_lat = ((a.lat + b.lat) / 2.0).to_radians().cos();

    let dx = (b.lon - a.lon) * cos_lat;
    let dy = b.lat - a.lat;
    let px = (p.lon - a.lon) * cos_lat;
    let py = p.lat - a.lat;

    let seg_len_sq = dx * dx + dy * dy;
    if seg_len_sq < 1e-20 {
        return a;
    }

    let t = ((px * dx + py * dy) / seg_len_sq).clamp(0.0, 1.0);

    GeoPoint::new(a.lat + t * (b.lat - a.lat), a.lon + t * (b.lon - a.lon))
}
