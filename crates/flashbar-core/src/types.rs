use crate::error::FlashbarError;
use crate::timer::TimerSlot;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FlashMode
// ---------------------------------------------------------------------------

/// What flashes when the reminder triggers. Stored as an integer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlashMode {
    #[default]
    TopBar,
    Indicator,
}

impl FlashMode {
    pub fn all() -> &'static [FlashMode] {
        &[FlashMode::TopBar, FlashMode::Indicator]
    }

    pub fn index(self) -> i64 {
        match self {
            FlashMode::TopBar => 0,
            FlashMode::Indicator => 1,
        }
    }

    /// Out-of-range indices fall to the nearest mode.
    pub fn from_index(index: i64) -> Self {
        if index <= 0 {
            FlashMode::TopBar
        } else {
            FlashMode::Indicator
        }
    }

    pub fn target(self) -> FlashTarget {
        match self {
            FlashMode::TopBar => FlashTarget::TopBar,
            FlashMode::Indicator => FlashTarget::Indicator,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlashMode::TopBar => "top-bar",
            FlashMode::Indicator => "indicator",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlashMode::TopBar => "Entire Top Bar",
            FlashMode::Indicator => "Indicator Only",
        }
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FlashMode {
    type Err = FlashbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top-bar" | "topbar" | "top_bar" | "0" => Ok(FlashMode::TopBar),
            "indicator" | "1" => Ok(FlashMode::Indicator),
            other => Err(FlashbarError::InvalidMode(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FlashTarget
// ---------------------------------------------------------------------------

/// A visual element that can carry the "flash active" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlashTarget {
    TopBar,
    Indicator,
}

impl FlashTarget {
    pub fn all() -> &'static [FlashTarget] {
        &[FlashTarget::TopBar, FlashTarget::Indicator]
    }

    /// The timer line that drives this target's animation.
    pub fn timer_slot(self) -> TimerSlot {
        match self {
            FlashTarget::TopBar => TimerSlot::TopBarFlash,
            FlashTarget::Indicator => TimerSlot::IndicatorFlash,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlashTarget::TopBar => "top-bar",
            FlashTarget::Indicator => "indicator",
        }
    }
}

impl fmt::Display for FlashTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
