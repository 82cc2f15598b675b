use crate::color::Rgba;
use crate::config::{ConfigWarning, WarnLevel};
use crate::error::{FlashbarError, Result};
use crate::types::FlashMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

pub const INTERVAL_RANGE: RangeInclusive<i64> = 10..=3600;
pub const MODE_RANGE: RangeInclusive<i64> = 0..=1;
pub const DURATION_RANGE: RangeInclusive<i64> = 100..=2000;
pub const COUNT_RANGE: RangeInclusive<i64> = 1..=10;

fn clamp_to(range: &RangeInclusive<i64>, value: i64) -> i64 {
    value.clamp(*range.start(), *range.end())
}

// ---------------------------------------------------------------------------
// SettingKey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingKey {
    TimerEnabled,
    FlashInterval,
    FlashMode,
    FlashDuration,
    FlashCount,
    FlashColor,
    ShowIndicator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Text,
}

impl SettingKey {
    pub fn all() -> &'static [SettingKey] {
        &[
            SettingKey::TimerEnabled,
            SettingKey::FlashInterval,
            SettingKey::FlashMode,
            SettingKey::FlashDuration,
            SettingKey::FlashCount,
            SettingKey::FlashColor,
            SettingKey::ShowIndicator,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::TimerEnabled => "timer-enabled",
            SettingKey::FlashInterval => "flash-interval",
            SettingKey::FlashMode => "flash-mode",
            SettingKey::FlashDuration => "flash-duration",
            SettingKey::FlashCount => "flash-count",
            SettingKey::FlashColor => "flash-color",
            SettingKey::ShowIndicator => "show-indicator",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            SettingKey::TimerEnabled | SettingKey::ShowIndicator => ValueKind::Bool,
            SettingKey::FlashColor => ValueKind::Text,
            SettingKey::FlashInterval
            | SettingKey::FlashMode
            | SettingKey::FlashDuration
            | SettingKey::FlashCount => ValueKind::Int,
        }
    }

    /// Valid range for integer keys.
    pub fn range(self) -> Option<RangeInclusive<i64>> {
        match self {
            SettingKey::FlashInterval => Some(INTERVAL_RANGE),
            SettingKey::FlashMode => Some(MODE_RANGE),
            SettingKey::FlashDuration => Some(DURATION_RANGE),
            SettingKey::FlashCount => Some(COUNT_RANGE),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SettingKey::TimerEnabled => "Whether the reminder timer is running",
            SettingKey::FlashInterval => "Time between flashes in seconds",
            SettingKey::FlashMode => "What flashes: 0 = entire top bar, 1 = indicator only",
            SettingKey::FlashDuration => "Duration of each flash cycle in milliseconds",
            SettingKey::FlashCount => "Number of flash cycles per trigger",
            SettingKey::FlashColor => "Color of the flash effect",
            SettingKey::ShowIndicator => "Display an icon in the top panel",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingKey {
    type Err = FlashbarError;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| FlashbarError::UnknownSetting(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SettingValue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse command-line text into the value type `key` expects.
    /// `flash-mode` also accepts the mode names.
    pub fn parse_for(key: SettingKey, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = |reason: &str| FlashbarError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        };
        match key.kind() {
            ValueKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(SettingValue::Bool(true)),
                "false" | "off" | "no" | "0" => Ok(SettingValue::Bool(false)),
                _ => Err(invalid("expected true or false")),
            },
            ValueKind::Int if key == SettingKey::FlashMode => {
                let mode: FlashMode = raw.parse()?;
                Ok(SettingValue::Int(mode.index()))
            }
            ValueKind::Int => raw
                .parse::<i64>()
                .map(SettingValue::Int)
                .map_err(|_| invalid("expected an integer")),
            ValueKind::Text => Ok(SettingValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings (persisted document)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default)]
    pub timer_enabled: bool,
    #[serde(default = "default_interval")]
    pub flash_interval: i64,
    #[serde(default)]
    pub flash_mode: i64,
    #[serde(default = "default_duration")]
    pub flash_duration: i64,
    #[serde(default = "default_count")]
    pub flash_count: i64,
    #[serde(default = "default_color")]
    pub flash_color: String,
    #[serde(default = "default_show_indicator")]
    pub show_indicator: bool,
}

fn default_interval() -> i64 {
    300
}

fn default_duration() -> i64 {
    500
}

fn default_count() -> i64 {
    3
}

fn default_color() -> String {
    Rgba::default().to_css()
}

fn default_show_indicator() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_enabled: false,
            flash_interval: default_interval(),
            flash_mode: 0,
            flash_duration: default_duration(),
            flash_count: default_count(),
            flash_color: default_color(),
            show_indicator: default_show_indicator(),
        }
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::TimerEnabled => SettingValue::Bool(self.timer_enabled),
            SettingKey::FlashInterval => SettingValue::Int(self.flash_interval),
            SettingKey::FlashMode => SettingValue::Int(self.flash_mode),
            SettingKey::FlashDuration => SettingValue::Int(self.flash_duration),
            SettingKey::FlashCount => SettingValue::Int(self.flash_count),
            SettingKey::FlashColor => SettingValue::Text(self.flash_color.clone()),
            SettingKey::ShowIndicator => SettingValue::Bool(self.show_indicator),
        }
    }

    /// Write one key. Integers are clamped into range, colors are validated and
    /// normalized to `rgba(...)`. Returns whether the stored value changed.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<bool> {
        let mismatch = |value: &SettingValue, expected: &str| FlashbarError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("expected {expected}"),
        };
        let changed = match (key, value) {
            (SettingKey::TimerEnabled, SettingValue::Bool(b)) => replace(&mut self.timer_enabled, b),
            (SettingKey::ShowIndicator, SettingValue::Bool(b)) => replace(&mut self.show_indicator, b),
            (SettingKey::FlashColor, SettingValue::Text(s)) => {
                let css = Rgba::parse(&s)?.to_css();
                replace(&mut self.flash_color, css)
            }
            (key, SettingValue::Int(i)) if key.kind() == ValueKind::Int => {
                let range = key.range().unwrap_or(i64::MIN..=i64::MAX);
                let clamped = clamp_to(&range, i);
                if clamped != i {
                    debug!(key = %key, requested = i, applied = clamped, "clamped setting");
                }
                let slot = match key {
                    SettingKey::FlashInterval => &mut self.flash_interval,
                    SettingKey::FlashMode => &mut self.flash_mode,
                    SettingKey::FlashDuration => &mut self.flash_duration,
                    _ => &mut self.flash_count,
                };
                replace(slot, clamped)
            }
            (key, value) => {
                let expected = match key.kind() {
                    ValueKind::Bool => "a boolean",
                    ValueKind::Int => "an integer",
                    ValueKind::Text => "a color string",
                };
                return Err(mismatch(&value, expected));
            }
        };
        Ok(changed)
    }

    /// Restore one key to its default. Returns whether the value changed.
    pub fn reset(&mut self, key: SettingKey) -> bool {
        let default = Settings::default().get(key);
        self.set(key, default).unwrap_or(false)
    }

    /// Keys whose values differ between `self` and `other`, in key order.
    pub fn changed_keys(&self, other: &Settings) -> Vec<SettingKey> {
        SettingKey::all()
            .iter()
            .copied()
            .filter(|k| self.get(*k) != other.get(*k))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_yaml::from_str(&data)?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Report values a hand-edited file may carry that the store would never write.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for key in SettingKey::all() {
            let (Some(range), Some(value)) = (key.range(), self.get(*key).as_int()) else {
                continue;
            };
            if !range.contains(&value) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "{} = {} is outside {}..={}; {} will be used",
                        key,
                        value,
                        range.start(),
                        range.end(),
                        clamp_to(&range, value)
                    ),
                });
            }
        }

        if let Err(e) = Rgba::parse(&self.flash_color) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("{e}; the default color will be used"),
            });
        }

        warnings
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

// ---------------------------------------------------------------------------
// SettingsStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// The settings backend seen by the coordinator: typed get/set plus per-key
/// change subscriptions. Change notifications are queued and handed out by
/// `take_changes` rather than delivered through callbacks.
pub trait SettingsStore {
    fn get(&self, key: SettingKey) -> SettingValue;

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<()>;

    fn subscribe(&mut self, key: SettingKey) -> SubscriptionId;

    /// Returns false if `id` was not subscribed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Drain pending notifications for keys that still have a subscriber.
    fn take_changes(&mut self) -> Vec<SettingKey>;

    fn get_bool(&self, key: SettingKey) -> bool {
        self.get(key).as_bool().unwrap_or(false)
    }

    fn get_int(&self, key: SettingKey) -> i64 {
        self.get(key).as_int().unwrap_or(0)
    }
}

/// Settings store backed by a YAML file, or held purely in memory.
#[derive(Debug)]
pub struct SettingsFile {
    path: Option<PathBuf>,
    values: Settings,
    last_modified: Option<SystemTime>,
    subscribers: BTreeMap<SubscriptionId, SettingKey>,
    next_subscription: u64,
    pending: Vec<SettingKey>,
}

impl SettingsFile {
    pub fn in_memory(values: Settings) -> Self {
        Self {
            path: None,
            values,
            last_modified: None,
            subscribers: BTreeMap::new(),
            next_subscription: 1,
            pending: Vec::new(),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let values = Settings::load(path)?;
        let mut store = SettingsFile::in_memory(values);
        store.path = Some(path.to_path_buf());
        store.last_modified = crate::io::modified_time(path);
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn values(&self) -> &Settings {
        &self.values
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn reset(&mut self, key: SettingKey) -> Result<()> {
        let mut next = self.values.clone();
        if next.reset(key) {
            self.commit(next)?;
            self.queue(key);
        }
        Ok(())
    }

    pub fn reset_all(&mut self) -> Result<()> {
        let next = Settings::default();
        let changed = self.values.changed_keys(&next);
        if !changed.is_empty() || self.path.as_deref().is_some_and(|p| !p.exists()) {
            self.commit(next)?;
        }
        for key in changed {
            self.queue(key);
        }
        Ok(())
    }

    /// Re-read the backing file and queue a notification for every key whose
    /// value differs from what the store held. Returns the changed keys.
    pub fn reload(&mut self) -> Result<Vec<SettingKey>> {
        let Some(path) = self.path.clone() else {
            return Ok(Vec::new());
        };
        let fresh = Settings::load(&path)?;
        self.last_modified = crate::io::modified_time(&path);
        let changed = self.values.changed_keys(&fresh);
        self.values = fresh;
        for key in &changed {
            debug!(key = %key, "setting changed on disk");
            self.queue(*key);
        }
        Ok(changed)
    }

    /// Reload only when the file's modification time moved. Returns whether
    /// any key changed.
    pub fn reload_if_modified(&mut self) -> Result<bool> {
        let Some(path) = self.path.as_deref() else {
            return Ok(false);
        };
        let mtime = crate::io::modified_time(path);
        if mtime == self.last_modified {
            return Ok(false);
        }
        Ok(!self.reload()?.is_empty())
    }

    /// Write `next` to the backing file, then adopt it. On a failed write the
    /// store keeps its previous values.
    fn commit(&mut self, next: Settings) -> Result<()> {
        if let Some(path) = self.path.as_deref() {
            next.save(path)?;
            self.last_modified = crate::io::modified_time(path);
        }
        self.values = next;
        Ok(())
    }

    fn queue(&mut self, key: SettingKey) {
        let watched = self.subscribers.values().any(|k| *k == key);
        if watched && !self.pending.contains(&key) {
            self.pending.push(key);
        }
    }
}

impl SettingsStore for SettingsFile {
    fn get(&self, key: SettingKey) -> SettingValue {
        self.values.get(key)
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<()> {
        let mut next = self.values.clone();
        if next.set(key, value)? {
            if let Err(e) = self.commit(next) {
                warn!(key = %key, error = %e, "failed to persist setting");
                return Err(e);
            }
            self.queue(key);
        }
        Ok(())
    }

    fn subscribe(&mut self, key: SettingKey) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.insert(id, key);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    fn take_changes(&mut self) -> Vec<SettingKey> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .filter(|key| self.subscribers.values().any(|k| k == key))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn keys_roundtrip_through_names() {
        for key in SettingKey::all() {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), *key);
        }
        assert!(matches!(
            "flash-speed".parse::<SettingKey>(),
            Err(FlashbarError::UnknownSetting(_))
        ));
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert!(!s.timer_enabled);
        assert!(s.show_indicator);
        assert_eq!(s.flash_mode, 0);
        assert!(INTERVAL_RANGE.contains(&s.flash_interval));
        assert!(DURATION_RANGE.contains(&s.flash_duration));
        assert!(COUNT_RANGE.contains(&s.flash_count));
        assert!(Rgba::parse(&s.flash_color).is_ok());
    }

    #[test]
    fn set_clamps_integers_into_range() {
        let mut s = Settings::default();
        s.set(SettingKey::FlashInterval, SettingValue::Int(3)).unwrap();
        assert_eq!(s.flash_interval, 10);
        s.set(SettingKey::FlashInterval, SettingValue::Int(99_999)).unwrap();
        assert_eq!(s.flash_interval, 3600);
        s.set(SettingKey::FlashCount, SettingValue::Int(0)).unwrap();
        assert_eq!(s.flash_count, 1);
        s.set(SettingKey::FlashDuration, SettingValue::Int(-5)).unwrap();
        assert_eq!(s.flash_duration, 100);
        s.set(SettingKey::FlashMode, SettingValue::Int(4)).unwrap();
        assert_eq!(s.flash_mode, 1);
    }

    #[test]
    fn set_rejects_wrong_type_and_bad_color() {
        let mut s = Settings::default();
        assert!(matches!(
            s.set(SettingKey::TimerEnabled, SettingValue::Int(1)),
            Err(FlashbarError::InvalidValue { .. })
        ));
        assert!(matches!(
            s.set(SettingKey::FlashColor, SettingValue::Text("blurple".into())),
            Err(FlashbarError::InvalidColor(_))
        ));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn set_normalizes_color() {
        let mut s = Settings::default();
        let changed = s
            .set(SettingKey::FlashColor, SettingValue::Text("#00ff00".into()))
            .unwrap();
        assert!(changed);
        assert_eq!(s.flash_color, "rgba(0, 255, 0, 1)");
    }

    #[test]
    fn set_same_value_reports_unchanged() {
        let mut s = Settings::default();
        assert!(!s.set(SettingKey::TimerEnabled, SettingValue::Bool(false)).unwrap());
        assert!(s.set(SettingKey::TimerEnabled, SettingValue::Bool(true)).unwrap());
    }

    #[test]
    fn parse_for_uses_key_type() {
        assert_eq!(
            SettingValue::parse_for(SettingKey::TimerEnabled, "on").unwrap(),
            SettingValue::Bool(true)
        );
        assert_eq!(
            SettingValue::parse_for(SettingKey::FlashMode, "indicator").unwrap(),
            SettingValue::Int(1)
        );
        assert_eq!(
            SettingValue::parse_for(SettingKey::FlashCount, " 4 ").unwrap(),
            SettingValue::Int(4)
        );
        assert!(SettingValue::parse_for(SettingKey::FlashCount, "many").is_err());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let yaml = "timer-enabled: true\nflash-count: 5\n";
        let s: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(s.timer_enabled);
        assert_eq!(s.flash_count, 5);
        assert_eq!(s.flash_interval, 300);
        assert!(s.show_indicator);
    }

    #[test]
    fn validate_reports_out_of_range_and_bad_color() {
        let s = Settings {
            flash_interval: 2,
            flash_color: "nope".to_string(),
            ..Settings::default()
        };
        let warnings = s.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("flash-interval = 2") && w.level == WarnLevel::Warning));
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
        assert!(Settings::default().validate().is_empty());
    }

    #[test]
    fn notifications_only_for_subscribed_keys() {
        let mut store = SettingsFile::in_memory(Settings::default());
        let id = store.subscribe(SettingKey::TimerEnabled);
        store.set(SettingKey::TimerEnabled, SettingValue::Bool(true)).unwrap();
        store.set(SettingKey::FlashCount, SettingValue::Int(4)).unwrap();
        assert_eq!(store.take_changes(), vec![SettingKey::TimerEnabled]);
        assert!(store.take_changes().is_empty());

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set(SettingKey::TimerEnabled, SettingValue::Bool(false)).unwrap();
        assert!(store.take_changes().is_empty());
    }

    #[test]
    fn repeated_changes_are_coalesced() {
        let mut store = SettingsFile::in_memory(Settings::default());
        store.subscribe(SettingKey::FlashInterval);
        store.set(SettingKey::FlashInterval, SettingValue::Int(30)).unwrap();
        store.set(SettingKey::FlashInterval, SettingValue::Int(60)).unwrap();
        assert_eq!(store.take_changes(), vec![SettingKey::FlashInterval]);
        assert_eq!(store.get_int(SettingKey::FlashInterval), 60);
    }

    #[test]
    fn unchanged_write_does_not_notify() {
        let mut store = SettingsFile::in_memory(Settings::default());
        store.subscribe(SettingKey::ShowIndicator);
        store.set(SettingKey::ShowIndicator, SettingValue::Bool(true)).unwrap();
        assert!(store.take_changes().is_empty());
    }

    #[test]
    fn file_store_persists_and_reopens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flashbar/settings.yaml");
        let mut store = SettingsFile::open(&path).unwrap();
        assert_eq!(store.values(), &Settings::default());

        store.set(SettingKey::FlashCount, SettingValue::Int(7)).unwrap();
        assert!(path.exists());

        let reopened = SettingsFile::open(&path).unwrap();
        assert_eq!(reopened.get_int(SettingKey::FlashCount), 7);
    }

    #[test]
    fn reload_queues_external_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        Settings::default().save(&path).unwrap();

        let mut store = SettingsFile::open(&path).unwrap();
        store.subscribe(SettingKey::TimerEnabled);
        store.subscribe(SettingKey::FlashInterval);

        let edited = Settings {
            timer_enabled: true,
            flash_interval: 60,
            ..Settings::default()
        };
        edited.save(&path).unwrap();

        let changed = store.reload().unwrap();
        assert_eq!(
            changed,
            vec![SettingKey::TimerEnabled, SettingKey::FlashInterval]
        );
        assert_eq!(
            store.take_changes(),
            vec![SettingKey::TimerEnabled, SettingKey::FlashInterval]
        );
        assert!(store.get_bool(SettingKey::TimerEnabled));
    }

    #[test]
    fn failed_write_keeps_previous_values() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("settings.yaml");

        let mut store = SettingsFile::open(&path).unwrap();
        store.subscribe(SettingKey::TimerEnabled);
        store.subscribe(SettingKey::FlashCount);

        assert!(store
            .set(SettingKey::TimerEnabled, SettingValue::Bool(true))
            .is_err());
        assert!(!store.get_bool(SettingKey::TimerEnabled));

        let mut changed = store.values().clone();
        changed.flash_count = 8;
        store.values = changed;
        assert!(store.reset(SettingKey::FlashCount).is_err());
        assert_eq!(store.get_int(SettingKey::FlashCount), 8);
        assert!(store.reset_all().is_err());
        assert_eq!(store.get_int(SettingKey::FlashCount), 8);

        assert!(store.take_changes().is_empty());
    }

    #[test]
    fn reset_all_restores_defaults() {
        let mut store = SettingsFile::in_memory(Settings::default());
        store.subscribe(SettingKey::FlashCount);
        store.set(SettingKey::FlashCount, SettingValue::Int(9)).unwrap();
        store.take_changes();
        store.reset_all().unwrap();
        assert_eq!(store.values(), &Settings::default());
        assert_eq!(store.take_changes(), vec![SettingKey::FlashCount]);
    }
}
