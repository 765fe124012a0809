//! UI widgets for the label designer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::data::Record;
use crate::design::LabelDesign;

/// Record list panel widget
pub struct RecordList<'a> {
    records: &'a [Record],
    key_column: Option<&'a str>,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> RecordList<'a> {
    pub fn new(
        records: &'a [Record],
        key_column: Option<&'a str>,
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        RecordList {
            records,
            key_column,
            selected,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, r)| ListItem::new(format!("{:>3} {}", idx + 1, r.display_name(self.key_column))))
            .collect();

        let (border_style, title_style) = self.theme.panel_styles(focused);
        let block = Block::default()
            .title(format!(" Records ({}) ", self.records.len()))
            .borders(Borders::ALL)
            .border_style(border_style)
            .title_style(title_style);

        let list = List::new(items)
            .block(block)
            .style(self.theme.normal_style())
            .highlight_style(if focused {
                self.theme.highlight_style()
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            })
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Column list with visibility, QR and highlight markers
pub struct ColumnPicker<'a> {
    columns: &'a [String],
    design: &'a LabelDesign,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> ColumnPicker<'a> {
    pub fn new(
        columns: &'a [String],
        design: &'a LabelDesign,
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        ColumnPicker {
            columns,
            design,
            selected,
            theme,
        }
    }

    fn row(&self, column: &str) -> Line<'static> {
        let visible = self.design.shown_columns().iter().any(|c| c == column);
        let is_qr = self.design.qr.enabled && self.design.qr.column.as_deref() == Some(column);
        let is_highlight = self.design.highlight.column.as_deref() == Some(column);

        let marker = |on: bool, tag: &'static str| {
            if on {
                Span::styled(tag, self.theme.notice_style())
            } else {
                Span::raw(" ".repeat(tag.len()))
            }
        };

        Line::from(vec![
            Span::raw(if visible { "[x] " } else { "[ ] " }),
            Span::styled(column.to_string(), self.theme.normal_style()),
            Span::raw(" "),
            marker(is_qr, "QR"),
            Span::raw(" "),
            marker(is_highlight, "HL"),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .columns
            .iter()
            .map(|c| ListItem::new(self.row(c)))
            .collect();

        let (border_style, title_style) = self.theme.panel_styles(focused);
        let block = Block::default()
            .title(" Columns ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .title_style(title_style);

        let list = List::new(items)
            .block(block)
            .highlight_style(if focused {
                self.theme.highlight_style()
            } else {
                Style::default()
            })
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    file: &'a str,
    labels: usize,
    notice: Option<&'a str>,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        file: &'a str,
        labels: usize,
        notice: Option<&'a str>,
        error: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        StatusBar {
            file,
            labels,
            notice,
            error,
            theme,
        }
    }

    fn line(&self) -> Line<'a> {
        if let Some(e) = self.error {
            return Line::from(Span::styled(format!("Error: {e}"), self.theme.error_style()));
        }
        let mut spans = vec![
            Span::styled(self.file, self.theme.title_style()),
            Span::raw(format!(" | {} labels | [e] Export [w] Save design [?] Help [q] Quit", self.labels)),
        ];
        if let Some(n) = self.notice {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(n, self.theme.notice_style()));
        }
        Line::from(spans)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.line()).block(Block::default().borders(Borders::TOP));

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["id".to_string(), "species".to_string(), "plot".to_string()]
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_column_markers() {
        let theme = Theme::default();
        let mut design = LabelDesign::for_columns(&columns());
        design.visible_columns = Some(vec!["id".to_string()]);
        design.highlight.column = Some("plot".to_string());
        let cols = columns();
        let picker = ColumnPicker::new(&cols, &design, 0, &theme);

        let id = text(&picker.row("id"));
        assert!(id.starts_with("[x] id"));
        assert!(id.contains("QR"));
        assert!(!id.contains("HL"));

        let plot = text(&picker.row("plot"));
        assert!(plot.starts_with("[ ] plot"));
        assert!(plot.contains("HL"));
        assert!(!plot.contains("QR"));
    }

    #[test]
    fn test_disabled_qr_has_no_marker() {
        let theme = Theme::default();
        let mut design = LabelDesign::for_columns(&columns());
        design.qr.enabled = false;
        let cols = columns();
        let picker = ColumnPicker::new(&cols, &design, 0, &theme);
        assert!(!text(&picker.row("id")).contains("QR"));
    }

    #[test]
    fn test_status_bar_prefers_error() {
        let theme = Theme::default();
        let bar = StatusBar::new("plants.csv", 3, Some("Saved"), Some("boom"), &theme);
        assert_eq!(text(&bar.line()), "Error: boom");

        let bar = StatusBar::new("plants.csv", 3, Some("Saved"), None, &theme);
        let line = text(&bar.line());
        assert!(line.starts_with("plants.csv | 3 labels"));
        assert!(line.ends_with("| Saved"));
    }
}
