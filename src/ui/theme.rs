//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::render::{Font, Rgb};

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    pub error: Color,
    pub notice: Color,
    /// Colour used for dark label ink (QR modules, bars, text) on the canvas
    pub ink: Color,
    /// Colour of the label outline on the canvas
    pub outline: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            highlight_bg: Color::Rgb(60, 60, 80),
            highlight_fg: Color::White,
            border: Color::Rgb(100, 100, 120),
            title: Color::Cyan,
            error: Color::Red,
            notice: Color::Green,
            // Named colors render consistently across terminals
            ink: Color::White,
            outline: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Base surface style used to paint widget backgrounds
    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Convenience helper returning (border_style, title_style) for focus state
    pub fn panel_styles(&self, focused: bool) -> (Style, Style) {
        if focused {
            (self.focused_border_style(), self.focused_border_style())
        } else {
            (self.border_style(), self.dimmed_title_style())
        }
    }

    /// Get style for normal text
    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for focused panel borders (distinct from normal borders)
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for titles
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for unfocused/dimmed titles
    pub fn dimmed_title_style(&self) -> Style {
        Style::default()
            .fg(self.border)
            .add_modifier(Modifier::DIM)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn notice_style(&self) -> Style {
        Style::default().fg(self.notice)
    }

    /// Style of label text on the preview canvas.
    ///
    /// White-on-black label text is shown inverted so highlighted values stand out.
    pub fn label_text_style(&self, font: Font, color: Rgb) -> Style {
        let mut style = if color == Rgb::WHITE {
            Style::default().fg(Color::Black).bg(self.ink)
        } else {
            Style::default().fg(self.ink)
        };
        style = match font {
            Font::Bold => style.add_modifier(Modifier::BOLD),
            Font::Oblique => style.add_modifier(Modifier::ITALIC),
            Font::Regular => style,
        };
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focused_panel_is_distinct() {
        let theme = Theme::default();
        let (focused_border, _) = theme.panel_styles(true);
        let (plain_border, _) = theme.panel_styles(false);
        assert_ne!(focused_border, plain_border);
    }

    #[test]
    fn test_highlighted_label_text_is_inverted() {
        let theme = Theme::default();
        let highlighted = theme.label_text_style(Font::Bold, Rgb::WHITE);
        assert_eq!(highlighted.bg, Some(theme.ink));
        assert!(highlighted.add_modifier.contains(Modifier::BOLD));

        let plain = theme.label_text_style(Font::Oblique, Rgb::BLACK);
        assert_eq!(plain.fg, Some(theme.ink));
        assert_eq!(plain.bg, None);
        assert!(plain.add_modifier.contains(Modifier::ITALIC));
    }
}
