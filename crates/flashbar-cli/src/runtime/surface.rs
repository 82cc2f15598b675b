use crate::output::describe;
use chrono::Local;
use flashbar_core::color::Rgba;
use flashbar_core::types::FlashTarget;
use flashbar_core::visual::{RecordingSurface, Surface, VisualFlag};
use std::io::{self, Write};

/// Unlit top-bar background.
const BAR_BACKGROUND: (u8, u8, u8) = (36, 36, 36);
const BAR_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Redraw a single top-bar line in place.
    Bar,
    /// One timestamped line per visual change.
    Plain,
    /// Track state without printing anything.
    Quiet,
}

/// Terminal rendition of the desktop: the top bar is a full-width line whose
/// background takes the flash color while flashing, with the indicator at its
/// right end. Changes accumulate until [`TerminalSurface::flush`].
pub struct TerminalSurface {
    style: Style,
    state: RecordingSurface,
    drawn: bool,
}

impl TerminalSurface {
    pub fn new(style: Style) -> Self {
        Self {
            style,
            state: RecordingSurface::new(),
            drawn: false,
        }
    }

    /// Write out everything that changed since the last flush.
    pub fn flush(&mut self) -> io::Result<()> {
        let changes = self.state.take_log();
        if changes.is_empty() {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        match self.style {
            Style::Quiet => return Ok(()),
            Style::Plain => {
                for change in &changes {
                    let stamp = Local::now().format("%H:%M:%S%.3f");
                    writeln!(out, "{stamp} {}", describe(change))?;
                }
            }
            Style::Bar => {
                write!(out, "\r{}\x1b[K", self.render_bar())?;
                self.drawn = true;
            }
        }
        out.flush()
    }

    /// Flush, then leave the cursor on a fresh line.
    pub fn finish(&mut self) -> io::Result<()> {
        self.flush()?;
        if self.drawn {
            let mut out = io::stdout().lock();
            writeln!(out)?;
            out.flush()?;
            self.drawn = false;
        }
        Ok(())
    }

    fn render_bar(&self) -> String {
        let color = self.state.color().unwrap_or_default();
        let (r, g, b) = if self.state.is_flashing(FlashTarget::TopBar) {
            color.blend_over(BAR_BACKGROUND)
        } else {
            BAR_BACKGROUND
        };
        let clock = Local::now().format("%a %H:%M").to_string();
        let padding = BAR_WIDTH.saturating_sub(clock.chars().count() + 4);
        format!(
            "\x1b[48;2;{r};{g};{b}m\x1b[97m {clock}{:padding$}{} \x1b[0m",
            "",
            self.render_indicator(color),
        )
    }

    fn render_indicator(&self, color: Rgba) -> String {
        if !self.state.indicator_visible() {
            return "  ".to_string();
        }
        if self.state.is_flashing(FlashTarget::Indicator) {
            let (r, g, b) = color.blend_over(BAR_BACKGROUND);
            return format!("\x1b[38;2;{r};{g};{b}m\u{25cf}\x1b[97m ");
        }
        if self.state.reminder_active() {
            "\u{25c9} ".to_string()
        } else {
            "\x1b[2m\u{25cb}\x1b[22m ".to_string()
        }
    }
}

impl Surface for TerminalSurface {
    fn flag(&mut self, target: FlashTarget) -> &mut dyn VisualFlag {
        self.state.flag(target)
    }

    fn is_flashing(&self, target: FlashTarget) -> bool {
        self.state.is_flashing(target)
    }

    fn set_indicator_visible(&mut self, visible: bool) {
        self.state.set_indicator_visible(visible);
    }

    fn set_reminder_active(&mut self, active: bool) {
        self.state.set_reminder_active(active);
    }

    fn set_flash_color(&mut self, color: Rgba) {
        self.state.set_flash_color(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_takes_flash_color_while_flashing() {
        let mut surface = TerminalSurface::new(Style::Quiet);
        surface.set_flash_color(Rgba::new(255, 0, 0, 1.0));
        assert!(surface.render_bar().contains("48;2;36;36;36m"));

        surface.flag(FlashTarget::TopBar).set(true);
        assert!(surface.render_bar().contains("48;2;255;0;0m"));
    }

    #[test]
    fn hidden_indicator_draws_nothing() {
        let mut surface = TerminalSurface::new(Style::Quiet);
        surface.set_indicator_visible(false);
        surface.set_reminder_active(true);
        assert_eq!(surface.render_indicator(Rgba::default()), "  ");
    }

    #[test]
    fn quiet_flush_drains_changes() {
        let mut surface = TerminalSurface::new(Style::Quiet);
        surface.flag(FlashTarget::Indicator).set(true);
        surface.flush().unwrap();
        assert!(surface.state.take_log().is_empty());
        assert!(surface.is_flashing(FlashTarget::Indicator));
    }
}
