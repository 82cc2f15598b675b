use crate::color::Rgba;
use crate::types::FlashTarget;

/// A two-state visual marker, e.g. a style class on a widget.
pub trait VisualFlag {
    fn set(&mut self, on: bool);
    fn is_on(&self) -> bool;
}

/// Plain in-memory flag that counts how often it actually flipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag {
    on: bool,
    flips: u32,
}

impl Flag {
    pub fn flips(&self) -> u32 {
        self.flips
    }
}

impl VisualFlag for Flag {
    fn set(&mut self, on: bool) {
        if self.on != on {
            self.on = on;
            self.flips += 1;
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

/// The host UI as seen by the state machine. Only the coordinator and the
/// animators write the flash flags.
pub trait Surface {
    /// The "flash active" flag of `target`.
    fn flag(&mut self, target: FlashTarget) -> &mut dyn VisualFlag;

    fn is_flashing(&self, target: FlashTarget) -> bool;

    fn set_indicator_visible(&mut self, visible: bool);

    /// Active/inactive styling of the indicator, mirroring `timer-enabled`.
    fn set_reminder_active(&mut self, active: bool);

    fn set_flash_color(&mut self, color: Rgba);
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceChange {
    Flash { target: FlashTarget, on: bool },
    IndicatorVisible(bool),
    ReminderActive(bool),
    FlashColor(Rgba),
}

/// A surface that records every change it receives. Drives the `simulate`
/// command and the state-machine tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    top_bar: RecordingFlag,
    indicator: RecordingFlag,
    indicator_visible: bool,
    reminder_active: bool,
    color: Option<Rgba>,
    log: Vec<SurfaceChange>,
}

#[derive(Debug, Default)]
struct RecordingFlag {
    target: Option<FlashTarget>,
    flag: Flag,
    changes: Vec<bool>,
}

impl VisualFlag for RecordingFlag {
    fn set(&mut self, on: bool) {
        if self.flag.is_on() != on {
            self.changes.push(on);
        }
        self.flag.set(on);
    }

    fn is_on(&self) -> bool {
        self.flag.is_on()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            top_bar: RecordingFlag {
                target: Some(FlashTarget::TopBar),
                ..RecordingFlag::default()
            },
            indicator: RecordingFlag {
                target: Some(FlashTarget::Indicator),
                ..RecordingFlag::default()
            },
            ..Self::default()
        }
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    pub fn reminder_active(&self) -> bool {
        self.reminder_active
    }

    pub fn color(&self) -> Option<Rgba> {
        self.color
    }

    /// Number of times the target's flag actually flipped.
    pub fn flips(&self, target: FlashTarget) -> u32 {
        self.flag_ref(target).flag.flips()
    }

    /// Drain changes recorded since the last call, flag flips included, in
    /// the order they happened.
    pub fn take_log(&mut self) -> Vec<SurfaceChange> {
        self.collect_flag_changes();
        std::mem::take(&mut self.log)
    }

    fn flag_ref(&self, target: FlashTarget) -> &RecordingFlag {
        match target {
            FlashTarget::TopBar => &self.top_bar,
            FlashTarget::Indicator => &self.indicator,
        }
    }

    fn collect_flag_changes(&mut self) {
        for flag in [&mut self.top_bar, &mut self.indicator] {
            let Some(target) = flag.target else { continue };
            for on in flag.changes.drain(..) {
                self.log.push(SurfaceChange::Flash { target, on });
            }
        }
    }
}

impl Surface for RecordingSurface {
    fn flag(&mut self, target: FlashTarget) -> &mut dyn VisualFlag {
        // Keep flips from the other flag in order before handing this one out.
        self.collect_flag_changes();
        match target {
            FlashTarget::TopBar => &mut self.top_bar,
            FlashTarget::Indicator => &mut self.indicator,
        }
    }

    fn is_flashing(&self, target: FlashTarget) -> bool {
        self.flag_ref(target).is_on()
    }

    fn set_indicator_visible(&mut self, visible: bool) {
        self.collect_flag_changes();
        self.indicator_visible = visible;
        self.log.push(SurfaceChange::IndicatorVisible(visible));
    }

    fn set_reminder_active(&mut self, active: bool) {
        self.collect_flag_changes();
        self.reminder_active = active;
        self.log.push(SurfaceChange::ReminderActive(active));
    }

    fn set_flash_color(&mut self, color: Rgba) {
        self.collect_flag_changes();
        self.color = Some(color);
        self.log.push(SurfaceChange::FlashColor(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_counts_real_flips_only() {
        let mut flag = Flag::default();
        flag.set(false);
        flag.set(true);
        flag.set(true);
        flag.set(false);
        assert_eq!(flag.flips(), 2);
        assert!(!flag.is_on());
    }

    #[test]
    fn recording_surface_logs_in_order() {
        let mut surface = RecordingSurface::new();
        surface.flag(FlashTarget::TopBar).set(true);
        surface.set_indicator_visible(false);
        surface.flag(FlashTarget::TopBar).set(false);
        surface.flag(FlashTarget::Indicator).set(true);

        assert_eq!(
            surface.take_log(),
            vec![
                SurfaceChange::Flash { target: FlashTarget::TopBar, on: true },
                SurfaceChange::IndicatorVisible(false),
                SurfaceChange::Flash { target: FlashTarget::TopBar, on: false },
                SurfaceChange::Flash { target: FlashTarget::Indicator, on: true },
            ]
        );
        assert!(surface.take_log().is_empty());
        assert!(surface.is_flashing(FlashTarget::Indicator));
        assert_eq!(surface.flips(FlashTarget::TopBar), 2);
    }
}
