use crate::color::Rgba;
use crate::settings::{
    SettingKey, SettingsStore, COUNT_RANGE, DURATION_RANGE, INTERVAL_RANGE,
};
use crate::types::FlashMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ReminderConfig
// ---------------------------------------------------------------------------

/// Read-through snapshot of the settings the state machine needs, taken at the
/// moment of use. Every field is already inside its valid range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReminderConfig {
    pub enabled: bool,
    pub interval_secs: u32,
    pub flash_mode: FlashMode,
    pub flash_duration_ms: u32,
    pub flash_count: u32,
    pub flash_color: Rgba,
    pub show_indicator: bool,
}

impl ReminderConfig {
    pub fn from_store<S: SettingsStore + ?Sized>(store: &S) -> Self {
        let color_text = store.get(SettingKey::FlashColor);
        let flash_color = match color_text.as_text().map(Rgba::parse) {
            Some(Ok(color)) => color,
            _ => {
                warn!(value = %color_text, "unparsable flash-color, using default");
                Rgba::default()
            }
        };
        Self {
            enabled: store.get_bool(SettingKey::TimerEnabled),
            interval_secs: clamp_u32(store.get_int(SettingKey::FlashInterval), INTERVAL_RANGE),
            flash_mode: FlashMode::from_index(store.get_int(SettingKey::FlashMode)),
            flash_duration_ms: clamp_u32(store.get_int(SettingKey::FlashDuration), DURATION_RANGE),
            flash_count: clamp_u32(store.get_int(SettingKey::FlashCount), COUNT_RANGE),
            flash_color,
            show_indicator: store.get_bool(SettingKey::ShowIndicator),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }

    /// Approximate wall time of one flash run: `count` cycles of two half-periods.
    pub fn flash_span(&self) -> Duration {
        let half = crate::animator::half_period_ms(self.flash_duration_ms);
        Duration::from_millis(u64::from(half) * 2 * u64::from(self.flash_count))
    }
}

fn clamp_u32(value: i64, range: std::ops::RangeInclusive<i64>) -> u32 {
    value.clamp(*range.start(), *range.end()) as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
