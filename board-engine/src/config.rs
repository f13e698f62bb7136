//! Engine configuration

use chrono_tz::Tz;
use serde::Deserialize;

/// Tunables for the assignment engine
///
/// Defaults match the shop's house rules; all durations are business-rule
/// constants, not performance knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Business timezone used to render wall-clock times
    pub timezone: Tz,
    /// Cadence of the scheduled-booking activation sweep, in seconds
    pub activation_interval_secs: u64,
    /// Activations later than this past their scheduled time are logged as late
    pub activation_grace_secs: i64,
    /// Minimum gap required before another booking of the same therapist
    pub lead_time_minutes: i64,
    /// Combined duration above which a chained service opens a new round
    pub chain_round_threshold_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Bangkok,
            activation_interval_secs: 60,
            activation_grace_secs: 60,
            lead_time_minutes: 60,
            chain_round_threshold_minutes: 120,
        }
    }
}
