use std::time::Duration;

/// Arrival parameters for one family of leg modes.
#[derive(Debug, Clone, Copy)]
pub struct ModeParams {
    pub arrive_radius_m: f64,
    pub look_ahead_m: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TrackingConfig {
    /// Number of raw samples kept per coordinate component for median smoothing.
    pub median_window: usize,
    /// Consecutive positive arrival signals required before an advance is applied.
    pub arrival_hysteresis_n: u32,
    pub walk: ModeParams,
    pub transit: ModeParams,
    pub store_timeout: Duration,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            median_window: 5,
            arrival_hysteresis_n: 2,
            walk: ModeParams {
                arrive_radius_m: 12.0,
                look_ahead_m: Some(30.0),
            },
            transit: ModeParams {
                arrive_radius_m: 20.0,
                look_ahead_m: None,
            },
            store_timeout: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_body_bytes: usize,
    pub trip_ttl: Duration,
    pub eviction_interval: Duration,
    pub tracking: TrackingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            max_body_bytes: 2 * 1024 * 1024,
            trip_ttl: Duration::from_secs(3 * 60 * 60),
            eviction_interval: Duration::from_secs(300),
            tracking: TrackingConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let tracking_defaults = defaults.tracking.clone();

        let port = env_parse("PORT").unwrap_or(defaults.port);
        let max_body_bytes = env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes);

        let trip_ttl = env_parse("TRIP_TTL_SECONDS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.trip_ttl);

        let eviction_interval = env_parse::<u64>("EVICTION_INTERVAL_SECONDS")
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.eviction_interval);

        let median_window = env_parse::<usize>("MEDIAN_WINDOW")
            .filter(|w| *w > 0)
            .unwrap_or(tracking_defaults.median_window);

        let arrival_hysteresis_n = env_parse::<u32>("ARRIVAL_HYSTERESIS_N")
            .filter(|n| *n > 0)
            .unwrap_or(tracking_defaults.arrival_hysteresis_n);

        let walk = ModeParams {
            arrive_radius_m: env_parse("ARRIVE_RADIUS_WALK_M")
                .unwrap_or(tracking_defaults.walk.arrive_radius_m),
            look_ahead_m: env_parse("LOOK_AHEAD_WALK_M").or(tracking_defaults.walk.look_ahead_m),
        };

        let transit = ModeParams {
            arrive_radius_m: env_parse("ARRIVE_RADIUS_TRANSIT_M")
                .unwrap_or(tracking_defaults.transit.arrive_radius_m),
            look_ahead_m: env_parse("LOOK_AHEAD_TRANSIT_M")
                .or(tracking_defaults.transit.look_ahead_m),
        };

        let store_timeout = env_parse("STORE_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(tracking_defaults.store_timeout);

        Self {
            port,
            max_body_bytes,
            trip_ttl,
            eviction_interval,
            tracking: TrackingConfig {
                median_window,
                arrival_hysteresis_n,
                walk,
                transit,
                store_timeout,
            },
        }
    }
}
