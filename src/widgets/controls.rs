use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph, Widget},
};

use crate::config::Theme;

/// Key hints shown when nothing else is asked for.
pub const DEFAULT_CONTROLS: [(&str, &str); 6] = [
    ("Enter", "Load"),
    ("a", "Load all"),
    ("Tab", "Next view"),
    ("←→", "Page"),
    ("e", "Export"),
    ("q", "Quit"),
];

/// Bottom bar: key hints on the left, dataset counter and a throbber on the right.
pub struct Controls {
    pub loaded: Option<(usize, usize)>,
    pub bg_color: Color,
    pub key_color: Color,
    pub label_color: Color,
    pub throbber_color: Color,
    /// Show the throbber at far right
    pub busy: bool,
    pub throbber_frame: u8,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            loaded: None,
            bg_color: Color::Indexed(235),
            key_color: Color::Cyan,
            label_color: Color::White,
            throbber_color: Color::Cyan,
            busy: false,
            throbber_frame: 0,
        }
    }
}

impl Controls {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            bg_color: theme.get("controls_bg"),
            key_color: theme.get("keybind_hints"),
            label_color: theme.get("keybind_labels"),
            throbber_color: theme.get("throbber"),
            ..Self::default()
        }
    }

    /// `loaded` of `total` datasets, shown as "Loaded: 1/2".
    pub fn with_loaded(mut self, loaded: usize, total: usize) -> Self {
        self.loaded = Some((loaded, total));
        self
    }

    pub fn with_busy(mut self, busy: bool, throbber_frame: u8) -> Self {
        self.busy = busy;
        self.throbber_frame = throbber_frame;
        self
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let no_bg = self.bg_color == Color::Reset;
        if !no_bg {
            Block::default()
                .style(Style::default().bg(self.bg_color))
                .render(area, buf);
        }

        let controls = DEFAULT_CONTROLS;

        // Key and label each get one trailing space.
        let pair_width = |(key, action): &(&str, &str)| -> u16 {
            (key.chars().count() as u16 + 1) + (action.chars().count() as u16 + 1)
        };

        const THROBBER_WIDTH: u16 = 3;
        const COUNTER_WIDTH: u16 = 16;
        let right_reserved = if self.loaded.is_some() { COUNTER_WIDTH } else { 1 } + THROBBER_WIDTH;
        let mut available = area.width.saturating_sub(right_reserved);

        let mut n_show = 0;
        for pair in controls.iter() {
            let need = pair_width(pair);
            if available < need {
                break;
            }
            available -= need;
            n_show += 1;
        }

        let mut constraints: Vec<Constraint> = controls
            .iter()
            .take(n_show)
            .flat_map(|(key, action)| {
                [
                    Constraint::Length(key.chars().count() as u16 + 1),
                    Constraint::Length(action.chars().count() as u16 + 1),
                ]
            })
            .collect();
        constraints.push(Constraint::Fill(1));
        if self.loaded.is_some() {
            constraints.push(Constraint::Length(COUNTER_WIDTH));
        }
        constraints.push(Constraint::Length(THROBBER_WIDTH));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);

        let (key_style, label_style) = if no_bg {
            (
                Style::default().fg(self.key_color),
                Style::default().fg(self.label_color),
            )
        } else {
            let base = Style::default().bg(self.bg_color);
            (base.fg(self.key_color), base.fg(self.label_color))
        };

        for (i, (key, action)) in controls.iter().take(n_show).enumerate() {
            let j = i * 2;
            Paragraph::new(*key).style(key_style).render(layout[j], buf);
            Paragraph::new(*action)
                .style(label_style)
                .render(layout[j + 1], buf);
        }

        let fill_idx = n_show * 2;
        if let Some((loaded, total)) = self.loaded {
            Paragraph::new(format!("Loaded: {}/{}", loaded, total))
                .style(label_style)
                .right_aligned()
                .render(layout[fill_idx + 1], buf);
        }

        const THROBBER_ASCII: [char; 4] = ['|', '/', '-', '\\'];
        let throbber_idx = fill_idx + if self.loaded.is_some() { 2 } else { 1 };
        let throbber = if self.busy {
            THROBBER_ASCII[self.throbber_frame as usize % 4].to_string()
        } else {
            " ".to_string()
        };
        let throbber_style = if no_bg {
            Style::default().fg(self.throbber_color)
        } else {
            Style::default().bg(self.bg_color).fg(self.throbber_color)
        };
        Paragraph::new(throbber)
            .style(throbber_style)
            .centered()
            .render(layout[throbber_idx], buf);
    }
}
