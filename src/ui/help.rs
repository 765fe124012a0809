//! Help overlay listing the key bindings.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;

const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j / k", "Move within the focused list"),
            ("n / p, ] / [", "Next / previous record"),
            ("Tab / Shift+Tab", "Cycle panel focus"),
        ],
    ),
    (
        "Design",
        &[
            ("h / l, ← / →", "Step the selected setting"),
            ("Space / Enter", "Toggle setting or column"),
            ("c", "Encode column in the QR code"),
            ("H", "Highlight column"),
        ],
    ),
    (
        "General",
        &[
            ("e", "Export labels to PDF"),
            ("w", "Save design file"),
            ("r", "Reload CSV"),
            ("? / F1", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        HelpOverlay { theme }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Choose label columns, size and QR settings, then export a printable PDF sheet.",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
        ];
        for (section, keys) in SHORTCUTS {
            lines.push(Line::from(Span::styled(
                *section,
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )));
            lines.extend(keys.iter().map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!("  {key:<18}"), Style::default().fg(self.theme.title)),
                    Span::raw(*action),
                ])
            }));
            lines.push(Line::from(""));
        }
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(65, 80, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" plantid-labels Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style());

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .style(self.theme.surface_style());
        frame.render_widget(paragraph, popup);
    }
}

/// Rect of the given percentage size centred in `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }

    #[test]
    fn test_every_section_is_listed() {
        let theme = Theme::default();
        let text: String = HelpOverlay::new(&theme)
            .lines()
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        for (section, keys) in SHORTCUTS {
            assert!(text.contains(*section));
            assert!(keys.iter().all(|(_, action)| text.contains(*action)));
        }
    }
}
