//! Server-side tuning knobs (spec.md §4.7/§4.8).
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub tick_rate_hz: u32,
    pub load_radius: f64,
    /// Added to `load_radius` before an `unload_distant` sweep, so
    /// streaming churn at the boundary doesn't thrash (spec.md §4.1).
    pub keep_radius_hysteresis: f64,
    pub streaming_interval_ticks: u64,
    pub autosave_interval_ticks: u64,
    pub world_dir: String,
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 40,
            load_radius: 10.0,
            keep_radius_hysteresis: 2.0,
            streaming_interval_ticks: 40,
            autosave_interval_ticks: 12_000,
            world_dir: "world".to_owned(),
            listen_addr: "127.0.0.1:25565".to_owned(),
        }
    }
}

impl ServerConfig {
    pub fn keep_radius(&self) -> f64 {
        self.load_radius + self.keep_radius_hysteresis
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.tick_rate_hz as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tick_interval_is_25_milliseconds() {
        let config = ServerConfig::default();
        assert_eq!(config.tick_interval(), std::time::Duration::from_millis(25));
    }

    #[test]
    fn keep_radius_adds_hysteresis_to_load_radius() {
        let config = ServerConfig::default();
        assert_eq!(config.keep_radius(), 12.0);
    }
}
