//! Main application logic and TUI event loop.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::{info, warn};

use crate::cli::AppConfig;
use crate::data::{load_csv, Dataset};
use crate::design::LabelDesign;
use crate::render::{layout_label, render_sheet, LabelLayout, Point};
use crate::ui::{
    preview::LabelPreview,
    settings::{SettingsPanel, SettingsState},
    widgets::{ColumnPicker, RecordList, StatusBar},
    HelpOverlay, Theme,
};

/// Which panel is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Records,
    Settings,
    Columns,
}

impl FocusedPanel {
    fn next(self) -> Self {
        match self {
            FocusedPanel::Records => FocusedPanel::Settings,
            FocusedPanel::Settings => FocusedPanel::Columns,
            FocusedPanel::Columns => FocusedPanel::Records,
        }
    }

    fn prev(self) -> Self {
        match self {
            FocusedPanel::Records => FocusedPanel::Columns,
            FocusedPanel::Settings => FocusedPanel::Records,
            FocusedPanel::Columns => FocusedPanel::Settings,
        }
    }
}

/// Application state
pub struct App {
    // Configuration
    config: AppConfig,
    theme: Theme,

    // Data
    dataset: Dataset,
    design: LabelDesign,
    csv_modified: Option<SystemTime>,

    // UI State
    focused: FocusedPanel,
    settings: SettingsState,
    selected_record: usize,
    selected_column: usize,
    show_help: bool,

    // Layout of the selected record, or why it cannot be drawn
    preview: Result<LabelLayout, String>,

    // Timing
    last_refresh: Instant,

    // Exit flag
    should_quit: bool,

    // Messages shown in the status bar
    notice: Option<String>,
    error_message: Option<String>,
}

impl App {
    /// Load the CSV and resolve the design described by `config`
    pub fn load(config: AppConfig) -> Result<Self> {
        let dataset = load_csv(&config.csv_path, config.csv_options)
            .with_context(|| format!("Failed to load CSV: {:?}", config.csv_path))?;
        let design = config.design_args.resolve(&dataset.columns)?;
        Ok(App::new(config, dataset, design))
    }

    pub fn new(config: AppConfig, dataset: Dataset, design: LabelDesign) -> Self {
        let csv_modified = modified_time(&config.csv_path);
        let mut app = App {
            config,
            theme: Theme::default(),
            dataset,
            design,
            csv_modified,
            focused: FocusedPanel::Records,
            settings: SettingsState::default(),
            selected_record: 0,
            selected_column: 0,
            show_help: false,
            preview: Err(String::new()),
            last_refresh: Instant::now(),
            should_quit: false,
            notice: None,
            error_message: None,
        };
        app.update_preview();
        app
    }

    /// Re-run the layout for the selected record
    fn update_preview(&mut self) {
        self.preview = self
            .design
            .validate(&self.dataset.columns)
            .and_then(|_| self.dataset.record(self.selected_record + 1))
            .and_then(|record| layout_label(record, &self.design, Point::ORIGIN))
            .map_err(|e| e.to_string());
    }

    /// Reload the CSV from disk, keeping the current data if it fails to parse
    fn reload(&mut self) -> Result<()> {
        let dataset = load_csv(&self.config.csv_path, self.config.csv_options)
            .with_context(|| format!("Failed to reload CSV: {:?}", self.config.csv_path))?;
        self.csv_modified = modified_time(&self.config.csv_path);
        self.dataset = dataset;
        self.reconcile_design();
        self.selected_record = self.selected_record.min(self.dataset.len().saturating_sub(1));
        self.selected_column = self
            .selected_column
            .min(self.dataset.columns.len().saturating_sub(1));
        self.update_preview();
        Ok(())
    }

    /// Drop design references to columns the CSV no longer has
    fn reconcile_design(&mut self) {
        let dataset = &self.dataset;
        if let Some(shown) = self.design.visible_columns.as_mut() {
            shown.retain(|c| dataset.has_column(c));
        }
        if self
            .design
            .qr
            .column
            .as_deref()
            .is_some_and(|c| !dataset.has_column(c))
        {
            self.design.qr.column = None;
        }
        if self
            .design
            .highlight
            .column
            .as_deref()
            .is_some_and(|c| !dataset.has_column(c))
        {
            warn!("Highlight column no longer in CSV, clearing it");
            self.design.highlight.column = None;
        }
        self.design.complete(&dataset.columns);
    }

    /// Reload when the CSV file changed on disk
    fn refresh(&mut self) -> Result<()> {
        self.last_refresh = Instant::now();
        let modified = modified_time(&self.config.csv_path);
        if modified.is_some() && modified != self.csv_modified {
            info!(path = %self.config.csv_path.display(), "CSV changed on disk, reloading");
            self.reload()?;
            self.error_message = None;
            self.notice = Some("Reloaded CSV".to_string());
        }
        Ok(())
    }

    /// Set an error message to display (non-fatal)
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    /// Write the full label sheet for the current design
    fn export(&mut self) -> Result<()> {
        let bytes = render_sheet(&self.dataset, &self.design, self.config.sheet)?;
        let path = &self.config.output;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {parent:?}"))?;
        }
        std::fs::write(path, &bytes).with_context(|| format!("Failed to write PDF: {path:?}"))?;
        info!(path = %path.display(), labels = self.dataset.len(), "Exported label sheet");
        self.notice = Some(format!(
            "Exported {} labels to {}",
            self.dataset.len(),
            path.display()
        ));
        Ok(())
    }

    fn save_design(&mut self) -> Result<()> {
        let path = self
            .config
            .design_path
            .clone()
            .context("No location for the design file; pass --save-design")?;
        self.design.validate(&self.dataset.columns)?;
        self.design
            .save(&path)
            .with_context(|| format!("Failed to save design file {path:?}"))?;
        self.notice = Some(format!("Saved design to {}", path.display()));
        Ok(())
    }

    fn select_record(&mut self, delta: isize) {
        let len = self.dataset.len();
        if len == 0 {
            return;
        }
        self.selected_record = (self.selected_record as isize + delta).rem_euclid(len as isize) as usize;
        self.update_preview();
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> Result<()> {
        self.notice = None;
        self.error_message = None;

        // Global shortcuts
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return Ok(());
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return Ok(());
            }
            _ => {}
        }

        // If help is shown, don't process other keys
        if self.show_help {
            return Ok(());
        }

        match key {
            KeyCode::Tab => self.focused = self.focused.next(),
            KeyCode::BackTab => self.focused = self.focused.prev(),
            KeyCode::Char('r') => {
                self.reload()?;
                self.notice = Some("Reloaded CSV".to_string());
            }
            KeyCode::Char('e') => self.export()?,
            KeyCode::Char('w') => self.save_design()?,
            KeyCode::Char('n') | KeyCode::Char(']') => self.select_record(1),
            KeyCode::Char('p') | KeyCode::Char('[') => self.select_record(-1),
            _ => match self.focused {
                FocusedPanel::Records => self.handle_record_navigation(key),
                FocusedPanel::Settings => self.handle_settings_input(key)?,
                FocusedPanel::Columns => self.handle_column_input(key),
            },
        }

        Ok(())
    }

    fn handle_record_navigation(&mut self, key: KeyCode) {
        match key {
            KeyCode::Down | KeyCode::Char('j') => self.select_record(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_record(-1),
            KeyCode::Enter | KeyCode::Char('l') => self.focused = FocusedPanel::Settings,
            _ => {}
        }
    }

    fn handle_settings_input(&mut self, key: KeyCode) -> Result<()> {
        let delta = match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.settings.next();
                return Ok(());
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.settings.prev();
                return Ok(());
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') | KeyCode::Enter => 1,
            KeyCode::Left | KeyCode::Char('h') => -1,
            _ => return Ok(()),
        };

        let result = self
            .settings
            .current()
            .adjust(&mut self.design, &self.dataset.columns, delta);
        self.update_preview();
        result?;
        Ok(())
    }

    fn handle_column_input(&mut self, key: KeyCode) {
        let columns = &self.dataset.columns;
        if columns.is_empty() {
            return;
        }
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_column = (self.selected_column + 1) % columns.len();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_column = self
                    .selected_column
                    .checked_sub(1)
                    .unwrap_or(columns.len() - 1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let column = columns[self.selected_column].clone();
                self.design.toggle_visible(&column);
                self.update_preview();
            }
            KeyCode::Char('c') => {
                self.design.qr.column = Some(columns[self.selected_column].clone());
                self.design.qr.enabled = true;
                self.update_preview();
            }
            KeyCode::Char('H') => {
                let column = &columns[self.selected_column];
                self.design.highlight.column = if self.design.highlight.column.as_ref() == Some(column) {
                    None
                } else {
                    Some(column.clone())
                };
                self.update_preview();
            }
            _ => {}
        }
    }

    /// Column used to name records in the list
    fn key_column(&self) -> Option<&str> {
        self.design
            .qr
            .column
            .as_deref()
            .or_else(|| self.dataset.columns.first().map(String::as_str))
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        // Main layout: body, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Body
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        // Body layout: sidebar, preview, settings
        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(28), // Sidebar
                Constraint::Min(30),    // Preview
                Constraint::Length(34), // Settings
            ])
            .split(main_chunks[0]);

        // Sidebar layout: records, columns
        let sidebar_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body_chunks[0]);

        let record_list = RecordList::new(
            &self.dataset.records,
            self.key_column(),
            self.selected_record,
            &self.theme,
        );
        record_list.render(frame, sidebar_chunks[0], self.focused == FocusedPanel::Records);

        let column_picker = ColumnPicker::new(
            &self.dataset.columns,
            &self.design,
            self.selected_column,
            &self.theme,
        );
        column_picker.render(frame, sidebar_chunks[1], self.focused == FocusedPanel::Columns);

        let title = format!(
            "Row {} of {} | {} ({} x {} mm)",
            self.selected_record + 1,
            self.dataset.len(),
            self.design.preset,
            self.design.width_mm,
            self.design.height_mm
        );
        LabelPreview::new(&self.preview, title, &self.theme).render(frame, body_chunks[1]);

        let settings = SettingsPanel::new(&self.design, &self.settings, &self.theme);
        settings.render(frame, body_chunks[2], self.focused == FocusedPanel::Settings);

        let file = self.config.csv_path.to_string_lossy();
        let status_bar = StatusBar::new(
            &file,
            self.dataset.len(),
            self.notice.as_deref(),
            self.error_message.as_deref(),
            &self.theme,
        );
        status_bar.render(frame, main_chunks[1]);

        // Render help overlay if active
        if self.show_help {
            let help = HelpOverlay::new(&self.theme);
            help.render(frame, size);
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    // Load before taking over the terminal so errors print normally
    let mut app = App::load(config).context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    let tick_rate = Duration::from_secs(app.config.refresh_interval_secs);

    let result = run_main_loop(&mut terminal, &mut app, tick_rate);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        // Check if the CSV changed (ignore reload errors, just continue)
        if app.last_refresh.elapsed() >= tick_rate {
            if let Err(e) = app.refresh() {
                warn!(error = %e, "Reload failed");
                app.set_error(format!("Reload error: {e:#}"));
            }
        }

        // Handle input with timeout
        let timeout = tick_rate.saturating_sub(app.last_refresh.elapsed());
        if event::poll(timeout.min(Duration::from_millis(100)))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = app.handle_input(key.code, key.modifiers) {
                    app.set_error(format!("{e:#}"));
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
