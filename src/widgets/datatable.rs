//! Paginated table over a slice of records.
//!
//! `DataTableState` holds the current page and is kept by the caller across
//! redraws; `DataTable` draws the header, the visible page and, when there is more
//! than one page, a Previous/Next control line.

use std::num::NonZeroUsize;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, StatefulWidget, Table, Widget},
};

use crate::charts::RenderError;
use crate::config::Theme;
use crate::record::Record;

/// Rows per page when neither the visualization nor the config says otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTableState {
    current_page: usize,
    page_size: NonZeroUsize,
    total_rows: usize,
}

impl DataTableState {
    /// State for a freshly mounted table, positioned on page 1.
    pub fn new(total_rows: usize, page_size: usize) -> Result<Self, RenderError> {
        let page_size = NonZeroUsize::new(page_size).ok_or(RenderError::InvalidPageSize)?;
        Ok(Self {
            current_page: 1,
            page_size,
            total_rows,
        })
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn total_pages(&self) -> usize {
        self.total_rows.div_ceil(self.page_size.get())
    }

    /// Moves to `page` when `1 <= page <= total_pages`; otherwise does nothing.
    /// Returns whether the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() && page != self.current_page {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// The slice of `rows` visible on the current page.
    pub fn page<'a>(&self, rows: &'a [Record]) -> TablePage<'a> {
        let total_rows = rows.len();
        let page_size = self.page_size.get();
        let start = ((self.current_page - 1) * page_size).min(total_rows);
        let end = (start + page_size).min(total_rows);
        TablePage {
            rows: &rows[start..end],
            page_index: self.current_page,
            page_size,
            total_pages: total_rows.div_ceil(page_size),
            start,
            end,
            total_rows,
        }
    }
}

/// One page of a table. `start..end` indexes the full row slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePage<'a> {
    pub rows: &'a [Record],
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
    pub total_rows: usize,
}

impl TablePage<'_> {
    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages
    }

    /// Pagination controls are only drawn when there is more than one page.
    pub fn show_controls(&self) -> bool {
        self.total_pages > 1
    }

    /// "Showing A-B of N", 1-based and inclusive.
    pub fn summary(&self) -> String {
        format!(
            "Showing {}-{} of {}",
            self.start + 1,
            self.end,
            self.total_rows
        )
    }
}

/// Table widget projecting `rows` onto `fields`, in the given order.
pub struct DataTable<'a> {
    fields: &'a [String],
    rows: &'a [Record],
    header_style: Style,
    even_row_style: Style,
    odd_row_style: Style,
    control_style: Style,
    disabled_style: Style,
}

impl<'a> DataTable<'a> {
    pub fn new(fields: &'a [String], rows: &'a [Record], theme: &Theme) -> Self {
        Self {
            fields,
            rows,
            header_style: Style::default()
                .fg(theme.get("table_header"))
                .bg(theme.get("table_header_bg"))
                .add_modifier(Modifier::BOLD),
            even_row_style: Style::default().fg(theme.get("text_primary")),
            odd_row_style: Style::default()
                .fg(theme.get("text_primary"))
                .bg(theme.get("alternate_row_color")),
            control_style: Style::default().fg(theme.get("keybind_hints")),
            disabled_style: Style::default().fg(theme.get("dimmed")),
        }
    }

    fn controls_line(&self, page: &TablePage) -> Line<'static> {
        let style_for = |enabled: bool| {
            if enabled {
                self.control_style
            } else {
                self.disabled_style
            }
        };
        Line::from(vec![
            Span::styled("« Previous", style_for(page.has_previous())),
            Span::raw(format!(
                "   Page {} of {} ({})   ",
                page.page_index,
                page.total_pages,
                page.summary()
            )),
            Span::styled("Next »", style_for(page.has_next())),
        ])
    }
}

impl StatefulWidget for DataTable<'_> {
    type State = DataTableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let page = state.page(self.rows);

        let (table_area, controls_area) = if page.show_controls() {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Fill(1), Constraint::Length(1)])
                .split(area);
            (layout[0], Some(layout[1]))
        } else {
            (area, None)
        };

        let header = Row::new(self.fields.iter().map(|f| Cell::from(f.as_str())))
            .style(self.header_style);
        let body = page.rows.iter().enumerate().map(|(i, record)| {
            let cells = self
                .fields
                .iter()
                .map(|f| Cell::from(record.get(f).unwrap_or_default()));
            let style = if i % 2 == 0 {
                self.even_row_style
            } else {
                self.odd_row_style
            };
            Row::new(cells).style(style)
        });
        let widths = vec![Constraint::Fill(1); self.fields.len().max(1)];
        Widget::render(
            Table::new(body, widths).header(header).column_spacing(2),
            table_area,
            buf,
        );

        if let Some(controls_area) = controls_area {
            Paragraph::new(self.controls_line(&page))
                .alignment(Alignment::Center)
                .render(controls_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn numbered_rows(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| Record::from_pairs([("n", i.to_string())]))
            .collect()
    }

    fn values(page: &TablePage) -> Vec<String> {
        page.rows
            .iter()
            .map(|r| r.get("n").unwrap().to_string())
            .collect()
    }

    #[test]
    fn pages_over_twenty_five_rows() {
        let rows = numbered_rows(25);
        let mut state = DataTableState::new(rows.len(), 10).unwrap();
        assert_eq!(state.total_pages(), 3);

        let page = state.page(&rows);
        assert_eq!(values(&page).first().map(String::as_str), Some("1"));
        assert_eq!(values(&page).last().map(String::as_str), Some("10"));
        assert!(!page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.summary(), "Showing 1-10 of 25");

        assert!(state.go_to_page(3));
        let page = state.page(&rows);
        assert_eq!(values(&page), ["21", "22", "23", "24", "25"]);
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.summary(), "Showing 21-25 of 25");
    }

    #[test]
    fn out_of_range_pages_are_ignored() {
        let mut state = DataTableState::new(25, 10).unwrap();
        state.go_to_page(2);
        assert!(!state.go_to_page(0));
        assert!(!state.go_to_page(4));
        assert_eq!(state.current_page(), 2);

        assert!(state.previous_page());
        assert!(!state.previous_page());
        assert_eq!(state.current_page(), 1);
        assert!(state.next_page());
        assert!(state.next_page());
        assert!(!state.next_page());
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(
            DataTableState::new(10, 0),
            Err(RenderError::InvalidPageSize)
        );
    }

    #[test]
    fn single_page_and_empty_tables_hide_controls() {
        let rows = numbered_rows(5);
        let state = DataTableState::new(rows.len(), 10).unwrap();
        let page = state.page(&rows);
        assert_eq!(page.total_pages, 1);
        assert!(!page.show_controls());

        let state = DataTableState::new(0, 10).unwrap();
        let page = state.page(&[]);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page_index, 1);
        assert!(page.rows.is_empty());
        assert!(!page.show_controls());
    }

    #[test]
    fn renders_projection_and_controls() {
        let rows: Vec<Record> = (1..=12)
            .map(|i| Record::from_pairs([("Name", format!("p{}", i)), ("Age", i.to_string())]))
            .collect();
        let fields = vec!["Age".to_string(), "Missing".to_string()];
        let theme = Theme::default();
        let mut state = DataTableState::new(rows.len(), 5).unwrap();

        let backend = TestBackend::new(60, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let table = DataTable::new(&fields, &rows, &theme);
                frame.render_stateful_widget(table, frame.area(), &mut state);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Age"));
        assert!(text.contains("Missing"));
        assert!(!text.contains("Name"));
        assert!(text.contains("Page 1 of 3"));
        assert!(text.contains("Showing 1-5 of 12"));
    }
}
