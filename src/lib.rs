use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, info, warn};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, List, ListItem, Paragraph, StatefulWidget, Tabs, Wrap};

pub mod cache;
pub mod chart_data;
pub mod chart_export;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error_display;
pub mod logging;
pub mod record;
pub mod registry;
pub mod source;
pub mod widgets;

pub use cache::CacheManager;
pub use config::{
    rgb_to_256_color, rgb_to_basic_ansi, AppConfig, ColorParser, ConfigManager, Theme,
};
pub use csvdash_cli::{Args, CompressionFormat, ExportFormat};
pub use dashboard::{Dashboard, Section};
pub use record::Record;
pub use registry::Visualization;

use chart_export::{export_file_name, write_chart};
use dashboard::ALL_HEADING;
use error_display::user_message_from_report;
use registry::ALL_KEY;
use source::{load_dataset, LoadOptions};
use widgets::chart::ChartView;
use widgets::controls::Controls;
use widgets::datatable::{DataTable, DataTableState};
use widgets::debug::DebugState;

/// Application name used for cache directory and other app-specific paths
pub const APP_NAME: &str = "csvdash";

const SIDEBAR_WIDTH: u16 = 30;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16), // resized (width, height)
    /// Start loading one dataset by key
    Load(String),
    LoadAll,
    /// Sent by a loader thread. The error is already a user-facing message.
    DatasetLoaded {
        key: String,
        result: std::result::Result<Vec<Record>, String>,
    },
    ExportFocused,
    Exit,
}

/// Status line message; `error` picks the error color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub error: bool,
}

impl Status {
    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
        }
    }
}

/// Per-visualization UI state is keyed by section key and slot index.
type SlotKey = (String, usize);

pub struct App {
    events: Sender<AppEvent>,
    dashboard: Dashboard,
    theme: Theme,
    load_options: LoadOptions,
    export_dir: PathBuf,
    export_format: ExportFormat,
    /// Index into the sidebar: datasets in registry order, then "All Data"
    selected: usize,
    /// Visualization shown in the selected section
    focused: usize,
    loading: HashSet<String>,
    failed: HashMap<String, String>,
    sections: HashMap<String, Section>,
    table_states: HashMap<SlotKey, DataTableState>,
    cursors: HashMap<SlotKey, usize>,
    status: Option<Status>,
    throbber_frame: u8,
    debug: DebugState,
}

impl App {
    pub fn new(events: Sender<AppEvent>, config: &AppConfig) -> Result<App> {
        let theme = Theme::from_config(&config.theme)?;
        let mut app = App {
            events,
            dashboard: Dashboard::from_config(config),
            theme,
            load_options: LoadOptions {
                timeout: std::time::Duration::from_secs(config.loading.timeout_secs),
            },
            export_dir: config.export.dir.clone(),
            export_format: config.export_format()?,
            selected: 0,
            focused: 0,
            loading: HashSet::new(),
            failed: HashMap::new(),
            sections: HashMap::new(),
            table_states: HashMap::new(),
            cursors: HashMap::new(),
            status: None,
            throbber_frame: 0,
            debug: DebugState {
                enabled: config.debug.enabled,
                ..DebugState::default()
            },
        };
        app.refresh_sections();
        Ok(app)
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn selected_key(&self) -> String {
        self.dashboard
            .datasets()
            .keys()
            .nth(self.selected)
            .unwrap_or(ALL_KEY)
            .to_string()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.loading.contains(key)
    }

    /// True while any load is running; the main loop keeps redrawing for the throbber.
    pub fn is_busy(&self) -> bool {
        !self.loading.is_empty()
    }

    pub fn table_state(&self, key: &str, index: usize) -> Option<&DataTableState> {
        self.table_states.get(&(key.to_string(), index))
    }

    pub fn cursor(&self, key: &str, index: usize) -> Option<usize> {
        self.cursors.get(&(key.to_string(), index)).copied()
    }

    fn entry_count(&self) -> usize {
        self.dashboard.datasets().len() + 1
    }

    fn focused_slot(&self) -> SlotKey {
        (self.selected_key(), self.focused)
    }

    fn focused_visualization(&self) -> Option<&Visualization> {
        self.sections
            .get(&self.selected_key())
            .and_then(|s| s.visualizations.get(self.focused))
    }

    fn select(&mut self, index: usize) {
        let index = index.min(self.entry_count() - 1);
        if index != self.selected {
            self.selected = index;
            self.focused = 0;
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let count = self
            .sections
            .get(&self.selected_key())
            .map(|s| s.visualizations.len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        self.focused = if forward {
            (self.focused + 1) % count
        } else {
            (self.focused + count - 1) % count
        };
    }

    /// Page the focused table, or move the point cursor of a focused line/scatter chart.
    fn step(&mut self, forward: bool) {
        let slot = self.focused_slot();
        let points = match self.focused_visualization() {
            Some(Visualization::Table(_)) => None,
            Some(Visualization::Chart(
                charts::ChartDescriptor::Line(c) | charts::ChartDescriptor::Scatter(c),
            )) => Some(c.points.len()),
            _ => return,
        };

        match points {
            None => {
                if let Some(state) = self.table_states.get_mut(&slot) {
                    if forward {
                        state.next_page();
                    } else {
                        state.previous_page();
                    }
                }
            }
            Some(0) => {}
            Some(points) => {
                let cursor = match self.cursors.get(&slot) {
                    None => 0,
                    Some(&i) if forward => (i + 1).min(points - 1),
                    Some(&i) => i.saturating_sub(1),
                };
                self.cursors.insert(slot, cursor);
            }
        }
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);
        if event.kind != KeyEventKind::Press {
            return None;
        }
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppEvent::Exit),
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1),
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Enter => {
                let key = self.selected_key();
                if key != ALL_KEY {
                    return Some(AppEvent::Load(key));
                }
            }
            KeyCode::Char('a') => return Some(AppEvent::LoadAll),
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::Right | KeyCode::Char('l') => self.step(true),
            KeyCode::Left | KeyCode::Char('h') => self.step(false),
            KeyCode::Char('e') => return Some(AppEvent::ExportFocused),
            _ => {}
        }
        None
    }

    pub fn event(&mut self, event: AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(&key),
            AppEvent::Resize(_, _) => None,
            AppEvent::Load(key) => {
                self.start_load(&key);
                None
            }
            AppEvent::LoadAll => {
                let keys: Vec<String> = self
                    .dashboard
                    .datasets()
                    .keys()
                    .map(str::to_string)
                    .collect();
                let started = keys.iter().filter(|key| self.start_load(key)).count();
                self.debug.last_action = format!("load all ({} started)", started);
                None
            }
            AppEvent::DatasetLoaded { key, result } => {
                self.finish_load(&key, result);
                None
            }
            AppEvent::ExportFocused => {
                self.export_focused();
                None
            }
            // Handled by the main loop
            AppEvent::Exit => None,
        }
    }

    /// Spawn a loader thread for `key`. Returns false when the key is unknown,
    /// already loaded or already loading.
    fn start_load(&mut self, key: &str) -> bool {
        let Some(dataset) = self.dashboard.datasets().get(key) else {
            return false;
        };
        if dataset.is_loaded() || self.loading.contains(key) {
            return false;
        }

        let source = dataset.source.clone();
        let name = dataset.name.clone();
        info!(dataset = key, source = %source, "loading dataset");
        self.loading.insert(key.to_string());
        self.failed.remove(key);
        self.debug.last_action = format!("load {}", key);
        self.debug.loads_in_flight = self.loading.len();
        self.status = Some(Status::info(format!("Loading {}...", name)));

        let tx = self.events.clone();
        let options = self.load_options.clone();
        let key = key.to_string();
        thread::spawn(move || {
            let result = load_dataset(&source, &options).map_err(|e| {
                warn!(dataset = %key, error = ?e, "dataset failed to load");
                user_message_from_report(&e, Some(&source))
            });
            // The receiver is gone once the app has exited.
            let _ = tx.send(AppEvent::DatasetLoaded { key, result });
        });
        true
    }

    fn finish_load(&mut self, key: &str, result: std::result::Result<Vec<Record>, String>) {
        self.loading.remove(key);
        self.debug.loads_in_flight = self.loading.len();
        let name = self
            .dashboard
            .datasets()
            .get(key)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| key.to_string());

        match result {
            Ok(rows) => {
                let count = rows.len();
                if self.dashboard.commit(key, rows) {
                    self.refresh_sections();
                    self.status = Some(Status::info(format!("Loaded {} ({} rows)", name, count)));
                }
            }
            Err(message) => {
                self.status = Some(Status::error(message.clone()));
                self.failed.insert(key.to_string(), message);
            }
        }
    }

    /// Re-render every section from the current snapshot. Table pagination
    /// survives unless the table's row count or page size changed.
    fn refresh_sections(&mut self) {
        self.sections = self.dashboard.sections().into_iter().collect();
        for (key, section) in &self.sections {
            for (index, viz) in section.visualizations.iter().enumerate() {
                let Visualization::Table(view) = viz else {
                    continue;
                };
                let slot = (key.clone(), index);
                let stale = self.table_states.get(&slot).map_or(true, |state| {
                    state.total_rows() != view.state.total_rows()
                        || state.page_size() != view.state.page_size()
                });
                if stale {
                    self.table_states.insert(slot, view.state.clone());
                }
            }
        }
        debug!(sections = self.sections.len(), "sections refreshed");
    }

    fn export_focused(&mut self) {
        let key = self.selected_key();
        let Some(Visualization::Chart(chart)) = self.focused_visualization() else {
            self.status = Some(Status::error("Only charts can be exported"));
            return;
        };

        let path = self
            .export_dir
            .join(export_file_name(&key, self.focused, chart, self.export_format));
        let result = std::fs::create_dir_all(&self.export_dir)
            .map_err(color_eyre::Report::from)
            .and_then(|_| write_chart(&path, chart, self.export_format));
        self.status = Some(match result {
            Ok(()) => {
                info!(path = %path.display(), "exported chart");
                Status::info(format!("Exported {}", path.display()))
            }
            Err(e) => {
                warn!(path = %path.display(), error = ?e, "chart export failed");
                Status::error(format!("Export failed: {}", e))
            }
        });
    }

    fn render_sidebar(&self, area: Rect, buf: &mut Buffer) {
        let selected_style = Style::default()
            .fg(self.theme.get("sidebar_selected"))
            .add_modifier(Modifier::BOLD);
        let normal_style = Style::default().fg(self.theme.get("text_primary"));
        let dimmed_style = Style::default().fg(self.theme.get("dimmed"));

        let mut items: Vec<ListItem> = self
            .dashboard
            .datasets()
            .iter()
            .map(|(key, dataset)| {
                let (marker, label, style) = if dataset.is_loaded() {
                    ("✓", dataset.name.clone(), Style::default().fg(self.theme.get("success")))
                } else if self.loading.contains(key) {
                    ("…", format!("Loading {}", dataset.name), normal_style)
                } else if self.failed.contains_key(key) {
                    ("✗", dataset.name.clone(), Style::default().fg(self.theme.get("error")))
                } else {
                    ("○", format!("Load {}", dataset.name), dimmed_style)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", marker), style),
                    Span::styled(label, normal_style),
                ]))
            })
            .collect();
        items.push(ListItem::new(Line::from(vec![
            Span::styled("◆ ", normal_style),
            Span::styled(ALL_HEADING, normal_style),
        ])));

        let items: Vec<ListItem> = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                if i == self.selected {
                    item.style(selected_style)
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(items).block(
            Block::bordered()
                .title("Datasets")
                .border_style(Style::default().fg(self.theme.get("sidebar_border"))),
        );
        Widget::render(list, area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if let Some(status) = &self.status {
            let color = if status.error {
                self.theme.get("error")
            } else {
                self.theme.get("text_secondary")
            };
            Paragraph::new(status.message.as_str())
                .style(Style::default().fg(color))
                .render(area, buf);
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;
        if self.is_busy() {
            self.throbber_frame = self.throbber_frame.wrapping_add(1);
        }

        let mut constraints = vec![Constraint::Fill(1), Constraint::Length(1)];
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
            .split(layout[0]);
        self.render_sidebar(columns[0], buf);

        let content = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1)])
            .split(columns[1]);
        let view_area = content[0];

        let key = self.selected_key();
        let primary = Style::default().fg(self.theme.get("text_primary"));
        let dimmed = Style::default().fg(self.theme.get("dimmed"));
        let error = Style::default().fg(self.theme.get("error"));

        match self.sections.get(&key) {
            Some(section) => {
                let block = Block::bordered()
                    .title(Span::styled(
                        section.heading.as_str(),
                        primary.add_modifier(Modifier::BOLD),
                    ))
                    .border_style(Style::default().fg(self.theme.get("sidebar_border")));
                let inner = block.inner(view_area);
                block.render(view_area, buf);

                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(1), Constraint::Fill(1)])
                    .split(inner);

                let titles: Vec<String> = section
                    .visualizations
                    .iter()
                    .enumerate()
                    .map(|(i, v)| format!("{} {}", i + 1, v.title()))
                    .collect();
                Tabs::new(titles)
                    .select(self.focused)
                    .style(dimmed)
                    .highlight_style(
                        Style::default()
                            .fg(self.theme.get("keybind_hints"))
                            .add_modifier(Modifier::BOLD),
                    )
                    .render(parts[0], buf);

                let slot = (key.clone(), self.focused);
                match section.visualizations.get(self.focused) {
                    Some(Visualization::Chart(chart)) => {
                        ChartView::new(chart, &self.theme)
                            .with_cursor(self.cursors.get(&slot).copied())
                            .render(parts[1], buf);
                    }
                    Some(Visualization::Table(view)) => {
                        if let Some(state) = self.table_states.get_mut(&slot) {
                            DataTable::new(&view.fields, &view.rows, &self.theme)
                                .render(parts[1], buf, state);
                        }
                    }
                    Some(Visualization::Note(text)) => {
                        Paragraph::new(text.as_str())
                            .style(primary)
                            .wrap(Wrap { trim: true })
                            .render(parts[1], buf);
                    }
                    Some(Visualization::Empty) => {
                        Paragraph::new("No data to chart")
                            .style(dimmed)
                            .render(parts[1], buf);
                    }
                    Some(Visualization::Failed(message)) => {
                        Paragraph::new(message.as_str())
                            .style(error)
                            .wrap(Wrap { trim: true })
                            .render(parts[1], buf);
                    }
                    None => {
                        Paragraph::new("No visualizations configured")
                            .style(dimmed)
                            .render(parts[1], buf);
                    }
                }
            }
            None => {
                let dataset = self.dashboard.datasets().get(&key);
                let name = dataset.map(|d| d.name.as_str()).unwrap_or(key.as_str());
                let block = Block::bordered()
                    .title(name)
                    .border_style(Style::default().fg(self.theme.get("sidebar_border")));
                let inner = block.inner(view_area);
                block.render(view_area, buf);

                let (text, style) = if self.loading.contains(&key) {
                    (format!("Loading {}...", name), primary)
                } else if let Some(message) = self.failed.get(&key) {
                    (format!("{}\n\nPress Enter to retry", message), error)
                } else {
                    (format!("Press Enter to load {}", name), dimmed)
                };
                Paragraph::new(text)
                    .style(style)
                    .wrap(Wrap { trim: true })
                    .render(inner, buf);
            }
        }

        self.render_status(content[1], buf);

        let datasets = self.dashboard.datasets();
        let controls = Controls::from_theme(&self.theme)
            .with_loaded(datasets.loaded_count(), datasets.len())
            .with_busy(self.is_busy(), self.throbber_frame);
        (&controls).render(layout[1], buf);

        if self.debug.enabled {
            (&self.debug).render(layout[2], buf);
        }
    }
}
