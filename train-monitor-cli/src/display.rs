//! Conductor display
//!
//! Renders the three advisories as colored panels on a terminal using
//! `crossterm`. Each panel shows its message in white on the severity color.

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use train_advisory::{Advisory, AdvisoryState, Severity, Timestamp};

/// One display refresh, produced per tick
#[derive(Debug, Clone, Copy)]
pub struct TickUpdate<'a> {
    /// Zero-based tick index
    pub tick: usize,
    pub total: usize,
    pub timestamp: Timestamp,
    pub state: &'a AdvisoryState,
}

/// Anything that can show advisories to the conductor
pub trait DisplaySurface {
    fn render(&mut self, update: &TickUpdate<'_>) -> io::Result<()>;
}

/// Background color for a severity
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Ok => Color::DarkGreen,
        Severity::Caution => Color::Rgb { r: 255, g: 165, b: 0 },
        Severity::Alert => Color::DarkRed,
    }
}

/// Terminal display writing to any `Write` sink
pub struct TerminalDisplay<W: Write> {
    out: W,
    color: bool,
    clear_screen: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, color: bool, clear_screen: bool) -> Self {
        Self {
            out,
            color,
            clear_screen,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn panel(&mut self, title: &str, advisory: &Advisory) -> io::Result<()> {
        queue!(self.out, Print(format!(" {}\n   ", title)))?;

        if self.color {
            queue!(
                self.out,
                SetForegroundColor(Color::White),
                SetBackgroundColor(severity_color(advisory.severity)),
                Print(format!(" {} ", advisory.message)),
                ResetColor,
                Print("\n")
            )
        } else {
            queue!(
                self.out,
                Print(format!("[{}] {}\n", advisory.severity, advisory.message))
            )
        }
    }
}

impl<W: Write> DisplaySurface for TerminalDisplay<W> {
    fn render(&mut self, update: &TickUpdate<'_>) -> io::Result<()> {
        if self.clear_screen {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }

        queue!(
            self.out,
            Print(format!(
                "═══════════════ IoT Display ═══════════════\n  tick {}/{}  {}\n",
                update.tick + 1,
                update.total,
                update.timestamp.format("%Y-%m-%d %H:%M:%S")
            ))
        )?;

        self.panel("Slippage", &update.state.slippage)?;
        self.panel("Distance", &update.state.distance)?;
        self.panel("Gates", &update.state.gate)?;

        queue!(self.out, Print("\n"))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn state() -> AdvisoryState {
        AdvisoryState {
            slippage: Advisory::new("No slippage. Continue speed.", Severity::Ok),
            distance: Advisory::new("Object is 800 meters away. Brake to slow down.", Severity::Alert),
            gate: Advisory::new("Gate is 800 meters away.", Severity::Caution),
            slip_causes: Vec::new(),
        }
    }

    fn render(color: bool, clear: bool) -> String {
        let state = state();
        let update = TickUpdate {
            tick: 1,
            total: 4,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            state: &state,
        };
        let mut display = TerminalDisplay::new(Vec::new(), color, clear);
        display.render(&update).unwrap();
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn test_monochrome_panels() {
        let text = render(false, false);
        assert!(text.contains("IoT Display"));
        assert!(text.contains("tick 2/4  2024-05-01 09:30:00"));
        assert!(text.contains(" Slippage\n   [OK] No slippage. Continue speed.\n"));
        assert!(text.contains("[ALERT] Object is 800 meters away. Brake to slow down."));
        assert!(text.contains(" Gates\n   [CAUTION] Gate is 800 meters away.\n"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_color_panels_use_escape_codes() {
        let text = render(true, true);
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("Gate is 800 meters away."));
        assert!(!text.contains("[CAUTION]"));
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(severity_color(Severity::Ok), Color::DarkGreen);
        assert_eq!(severity_color(Severity::Alert), Color::DarkRed);
        assert_eq!(
            severity_color(Severity::Caution),
            Color::Rgb { r: 255, g: 165, b: 0 }
        );
    }
}
