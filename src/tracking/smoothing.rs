use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;

/// Recent raw coordinate components, oldest first. Both buffers always hold
/// the same number of samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleWindow {
    #[serde(default)]
    lat_buffer: VecDeque<f64>,
    #[serde(default)]
    lon_buffer: VecDeque<f64>,
}

impl SampleWindow {
    /// Appends a sample, evicting the oldest ones beyond `capacity`.
    pub fn push(&mut self, lat: f64, lon: f64, capacity: usize) {
        let capacity = capacity.max(1);
        // Persisted state may predate a window resize or be uneven.
        let common = self.lat_buffer.len().min(self.lon_buffer.len());
        self.lat_buffer.truncate(common);
        self.lon_buffer.truncate(common);

        self.lat_buffer.push_back(lat);
        self.lon_buffer.push_back(lon);
        while self.lat_buffer.len() > capacity {
            self.lat_buffer.pop_front();
            self.lon_buffer.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lat_buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat_buffer.is_empty()
    }

    /// Component-wise median of the window, `None` while it is empty.
    pub fn median_point(&self) -> Option<GeoPoint> {
        let lat = median(self.lat_buffer.iter().copied())?;
        let lon = median(self.lon_buffer.iter().copied())?;
        Some(GeoPoint::new(lat, lon))
    }
}

pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}
