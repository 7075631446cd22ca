//! Terminal rendering module for rich markdown output
//!
//! This module provides terminal rendering capabilities using termimad
//! for rich markdown display with optional fallback to plain text.

use cadence_core::{Notification, NotificationLevel, Theme};
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
    accent: Color,
}

impl TerminalRenderer {
    /// Create a new terminal renderer
    pub fn new(rich_enabled: bool) -> Self {
        Self::with_theme(rich_enabled, Theme::default())
    }

    /// Create a renderer whose headers use the theme's accent color
    pub fn with_theme(rich_enabled: bool, theme: Theme) -> Self {
        let accent = theme_color(theme);
        let mut skin = MadSkin::default();

        skin.set_headers_fg(accent);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.code_block.set_bg(Color::AnsiValue(238));
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self {
            rich_enabled,
            skin,
            accent,
        }
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: &str) {
        if self.rich_enabled {
            // Headers keep their hash marks, in the accent color
            for line in markdown.lines() {
                if line.starts_with('#') {
                    println!("{}", self.paint(line, self.accent));
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
        }
    }

    /// Print a notification line
    pub fn notify(&self, notification: &Notification) {
        if self.rich_enabled {
            let color = match notification.level {
                NotificationLevel::Info => Color::Cyan,
                NotificationLevel::Success => Color::Green,
                NotificationLevel::Warning => Color::Yellow,
                NotificationLevel::Error => Color::Red,
            };
            println!(
                "{} {}",
                self.paint(notification.level.label(), color),
                notification.message
            );
        } else {
            print!("{notification}");
        }
    }

    /// Print unformatted text
    pub fn plain(&self, text: &str) {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        match color {
            Color::Rgb { r, g, b } => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
            Color::Cyan => format!("\x1b[36m{text}\x1b[0m"),
            Color::Green => format!("\x1b[32m{text}\x1b[0m"),
            Color::Yellow => format!("\x1b[33m{text}\x1b[0m"),
            Color::Red => format!("\x1b[31m{text}\x1b[0m"),
            _ => format!("\x1b[34m{text}\x1b[0m"),
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Accent color of a theme, from its `#rrggbb` primary.
fn theme_color(theme: Theme) -> Color {
    let hex = theme.primary().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
        _ => Color::Blue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_theme_color_from_primary() {
        assert_eq!(
            theme_color(Theme::ProfessionalBlue),
            Color::Rgb {
                r: 0x25,
                g: 0x63,
                b: 0xeb
            }
        );
    }
}
