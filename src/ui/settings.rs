//! Label design settings: editing state and list widget.
//!
//! Each [`Setting`] knows how to show its current value and how to step it
//! left/right within the range the design allows. Toggles flip on any step.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::theme::Theme;
use crate::design::{
    preset_keys, LabelDesign, CUSTOM_SIZE_RANGE_MM, HIGHLIGHT_PADDING_RANGE_PT, MIN_QR_SIZE_MM,
    ROW_HEIGHT_FACTOR_RANGE, SIDEBAR_FACTOR_RANGE,
};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Preset,
    Width,
    Height,
    ShowBorder,
    ShowColumnNames,
    RowHeightFactor,
    QrEnabled,
    QrColumn,
    QrSize,
    QrOffset,
    Highlight,
    HighlightPadding,
    SideStrip,
    SidebarFactor,
}

impl Setting {
    pub const ALL: [Setting; 14] = [
        Setting::Preset,
        Setting::Width,
        Setting::Height,
        Setting::ShowBorder,
        Setting::ShowColumnNames,
        Setting::RowHeightFactor,
        Setting::QrEnabled,
        Setting::QrColumn,
        Setting::QrSize,
        Setting::QrOffset,
        Setting::Highlight,
        Setting::HighlightPadding,
        Setting::SideStrip,
        Setting::SidebarFactor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Setting::Preset => "Size preset",
            Setting::Width => "Width (mm)",
            Setting::Height => "Height (mm)",
            Setting::ShowBorder => "Label border",
            Setting::ShowColumnNames => "Column names",
            Setting::RowHeightFactor => "Row height",
            Setting::QrEnabled => "QR code",
            Setting::QrColumn => "QR column",
            Setting::QrSize => "QR size (mm)",
            Setting::QrOffset => "QR offset (mm)",
            Setting::Highlight => "Highlight",
            Setting::HighlightPadding => "Highlight pad",
            Setting::SideStrip => "Side strip",
            Setting::SidebarFactor => "Strip width",
        }
    }

    /// Whether the setting currently affects the label
    pub fn is_active(self, design: &LabelDesign) -> bool {
        match self {
            Setting::QrColumn | Setting::QrSize | Setting::QrOffset => design.qr.enabled,
            Setting::HighlightPadding | Setting::SideStrip => design.highlight.column.is_some(),
            Setting::SidebarFactor => design.highlight.side_strip_active(),
            _ => true,
        }
    }

    pub fn value_text(self, design: &LabelDesign) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" }.to_string();
        match self {
            Setting::Preset => design.preset.clone(),
            Setting::Width => format!("{}", design.width_mm),
            Setting::Height => format!("{}", design.height_mm),
            Setting::ShowBorder => on_off(design.show_border),
            Setting::ShowColumnNames => on_off(design.show_column_names),
            Setting::RowHeightFactor => format!("{:.2}", design.row_height_factor),
            Setting::QrEnabled => on_off(design.qr.enabled),
            Setting::QrColumn => design.qr.column.clone().unwrap_or_else(|| "-".to_string()),
            Setting::QrSize => format!("{}", design.qr.size_mm),
            Setting::QrOffset => format!("{}", design.qr.left_offset_mm),
            Setting::Highlight => design
                .highlight
                .column
                .clone()
                .unwrap_or_else(|| "none".to_string()),
            Setting::HighlightPadding => format!("{}", design.highlight.padding_pt),
            Setting::SideStrip => on_off(design.highlight.side_strip),
            Setting::SidebarFactor => format!("{:.2}", design.highlight.sidebar_factor),
        }
    }

    /// Step the setting by `delta` (negative = left)
    pub fn adjust(self, design: &mut LabelDesign, columns: &[String], delta: i32) -> Result<()> {
        match self {
            Setting::Preset => {
                let keys = preset_keys();
                let current = keys
                    .iter()
                    .position(|k| k.eq_ignore_ascii_case(&design.preset))
                    .unwrap_or(0);
                design.apply_preset(keys[cycle(current, keys.len(), delta)])?;
            }
            Setting::Width => {
                let width = step(design.width_mm, 1.0, delta, CUSTOM_SIZE_RANGE_MM);
                let height = design.height_mm.clamp(CUSTOM_SIZE_RANGE_MM.0, CUSTOM_SIZE_RANGE_MM.1);
                design.set_custom_size(width, height)?;
            }
            Setting::Height => {
                let width = design.width_mm.clamp(CUSTOM_SIZE_RANGE_MM.0, CUSTOM_SIZE_RANGE_MM.1);
                let height = step(design.height_mm, 1.0, delta, CUSTOM_SIZE_RANGE_MM);
                design.set_custom_size(width, height)?;
            }
            Setting::ShowBorder => design.show_border = !design.show_border,
            Setting::ShowColumnNames => design.show_column_names = !design.show_column_names,
            Setting::RowHeightFactor => {
                design.row_height_factor =
                    step(design.row_height_factor, 0.05, delta, ROW_HEIGHT_FACTOR_RANGE);
            }
            Setting::QrEnabled => design.qr.enabled = !design.qr.enabled,
            Setting::QrColumn => {
                if !columns.is_empty() {
                    let current = design
                        .qr
                        .column
                        .as_ref()
                        .and_then(|c| columns.iter().position(|x| x == c))
                        .unwrap_or(0);
                    design.qr.column = Some(columns[cycle(current, columns.len(), delta)].clone());
                }
            }
            Setting::QrSize => {
                let range = (MIN_QR_SIZE_MM, design.max_qr_size_mm());
                design.qr.size_mm = step(design.qr.size_mm, 1.0, delta, range);
            }
            Setting::QrOffset => {
                let range = (0.0, design.max_qr_offset_mm());
                design.qr.left_offset_mm = step(design.qr.left_offset_mm, 1.0, delta, range);
            }
            Setting::Highlight => {
                // Position 0 is "no highlight"
                let current = design
                    .highlight
                    .column
                    .as_ref()
                    .and_then(|c| columns.iter().position(|x| x == c))
                    .map_or(0, |idx| idx + 1);
                let next = cycle(current, columns.len() + 1, delta);
                design.highlight.column = next.checked_sub(1).map(|idx| columns[idx].clone());
            }
            Setting::HighlightPadding => {
                design.highlight.padding_pt =
                    step(design.highlight.padding_pt, 1.0, delta, HIGHLIGHT_PADDING_RANGE_PT);
            }
            Setting::SideStrip => design.highlight.side_strip = !design.highlight.side_strip,
            Setting::SidebarFactor => {
                design.highlight.sidebar_factor =
                    step(design.highlight.sidebar_factor, 0.01, delta, SIDEBAR_FACTOR_RANGE);
            }
        }
        Ok(())
    }
}

fn cycle(current: usize, len: usize, delta: i32) -> usize {
    (current as i64 + i64::from(delta)).rem_euclid(len as i64) as usize
}

/// Move `value` by `delta` steps, clamp to `range` and drop float noise
fn step(value: f64, increment: f64, delta: i32, (min, max): (f64, f64)) -> f64 {
    let next = value + increment * f64::from(delta);
    (next.clamp(min, max) * 100.0).round() / 100.0
}

/// Selected row in the settings list
#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub selected: usize,
}

impl SettingsState {
    pub fn current(&self) -> Setting {
        Setting::ALL[self.selected % Setting::ALL.len()]
    }

    pub fn next(&mut self) {
        self.selected = cycle(self.selected, Setting::ALL.len(), 1);
    }

    pub fn prev(&mut self) {
        self.selected = cycle(self.selected, Setting::ALL.len(), -1);
    }
}

/// Settings list panel widget
pub struct SettingsPanel<'a> {
    design: &'a LabelDesign,
    state: &'a SettingsState,
    theme: &'a Theme,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(design: &'a LabelDesign, state: &'a SettingsState, theme: &'a Theme) -> Self {
        SettingsPanel {
            design,
            state,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = Setting::ALL
            .iter()
            .map(|setting| {
                let style = if setting.is_active(self.design) {
                    self.theme.normal_style()
                } else {
                    self.theme.normal_style().add_modifier(Modifier::DIM)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<15}", setting.label()), style),
                    Span::styled(
                        setting.value_text(self.design),
                        style.fg(self.theme.title),
                    ),
                ]))
            })
            .collect();

        let (border_style, title_style) = self.theme.panel_styles(focused);
        let block = Block::default()
            .title(" Design ")
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
        state.select(Some(self.state.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        ["id", "species", "plot"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_preset_cycles_through_custom() {
        let mut design = LabelDesign::for_columns(&columns());
        design.apply_preset("square").unwrap();

        // "square" is the last preset; stepping right wraps to "custom"
        Setting::Preset.adjust(&mut design, &columns(), 1).unwrap();
        assert_eq!(design.preset, "custom");
        assert_eq!((design.width_mm, design.height_mm), (51.0, 51.0));

        Setting::Preset.adjust(&mut design, &columns(), 1).unwrap();
        assert_eq!(design.preset, "cryovial");

        Setting::Preset.adjust(&mut design, &columns(), -1).unwrap();
        assert_eq!(design.preset, "custom");
    }

    #[test]
    fn test_width_step_switches_to_custom() {
        let mut design = LabelDesign::for_columns(&columns());
        Setting::Width.adjust(&mut design, &columns(), 1).unwrap();
        assert!(design.is_custom_size());
        assert_eq!(design.width_mm, 71.0);
        assert_eq!(design.height_mm, 35.0);
    }

    #[test]
    fn test_oversized_preset_is_clamped_when_edited() {
        let mut design = LabelDesign::for_columns(&columns());
        design.apply_preset("wristband").unwrap();
        Setting::Height.adjust(&mut design, &columns(), -1).unwrap();
        assert_eq!((design.width_mm, design.height_mm), (140.0, 24.0));
        assert!(design.validate(&columns()).is_ok());
    }

    #[test]
    fn test_height_shrink_refits_qr() {
        let mut design = LabelDesign::for_columns(&columns());
        design.set_custom_size(70.0, 20.0).unwrap();
        assert_eq!(design.qr.size_mm, 18.0);
        Setting::Height.adjust(&mut design, &columns(), -1).unwrap();
        assert_eq!(design.qr.size_mm, 17.0);
    }

    #[test]
    fn test_numeric_steps_are_clamped() {
        let mut design = LabelDesign::for_columns(&columns());
        for _ in 0..40 {
            Setting::RowHeightFactor.adjust(&mut design, &columns(), 1).unwrap();
        }
        assert_eq!(design.row_height_factor, 1.5);

        for _ in 0..5 {
            Setting::RowHeightFactor.adjust(&mut design, &columns(), -1).unwrap();
        }
        assert_eq!(design.row_height_factor, 1.25);

        Setting::QrSize.adjust(&mut design, &columns(), 100).unwrap();
        assert_eq!(design.qr.size_mm, design.max_qr_size_mm());
    }

    #[test]
    fn test_highlight_cycles_through_none() {
        let mut design = LabelDesign::for_columns(&columns());
        assert_eq!(design.highlight.column, None);

        Setting::Highlight.adjust(&mut design, &columns(), 1).unwrap();
        assert_eq!(design.highlight.column.as_deref(), Some("id"));

        Setting::Highlight.adjust(&mut design, &columns(), -1).unwrap();
        assert_eq!(design.highlight.column, None);

        Setting::Highlight.adjust(&mut design, &columns(), -1).unwrap();
        assert_eq!(design.highlight.column.as_deref(), Some("plot"));
    }

    #[test]
    fn test_toggles_flip_either_direction() {
        let mut design = LabelDesign::for_columns(&columns());
        Setting::QrEnabled.adjust(&mut design, &columns(), -1).unwrap();
        assert!(!design.qr.enabled);
        assert!(!Setting::QrSize.is_active(&design));
        Setting::QrEnabled.adjust(&mut design, &columns(), 1).unwrap();
        assert!(design.qr.enabled);
    }

    #[test]
    fn test_qr_column_cycles() {
        let mut design = LabelDesign::for_columns(&columns());
        Setting::QrColumn.adjust(&mut design, &columns(), -1).unwrap();
        assert_eq!(design.qr.column.as_deref(), Some("plot"));
        assert_eq!(Setting::QrColumn.value_text(&design), "plot");
    }

    #[test]
    fn test_state_wraps() {
        let mut state = SettingsState::default();
        state.prev();
        assert_eq!(state.current(), Setting::SidebarFactor);
        state.next();
        assert_eq!(state.current(), Setting::Preset);
    }
}
