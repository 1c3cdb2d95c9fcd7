use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::explorer::controller::Notice;
use crate::theme::ThemeColors;

const KEY_HINTS: &[(&str, &str)] = &[
    ("↑↓", "move"),
    ("⏎", "toggle"),
    ("e", "expand all"),
    ("c", "collapse all"),
    ("d", "download"),
    ("r", "refresh"),
    ("q", "quit"),
];

/// Bottom bar: the current notice if any, otherwise device and key hints.
pub struct StatusBarWidget<'a> {
    device: &'a str,
    theme: &'a ThemeColors,
    notice: Option<&'a Notice>,
    loading: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(device: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            device,
            theme,
            notice: None,
            loading: false,
        }
    }

    pub fn notice(mut self, notice: Option<&'a Notice>) -> Self {
        self.notice = notice;
        self
    }

    /// Dim the refresh hint while a load is running.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    fn notice_style(&self, notice: &Notice) -> (Style, &'a str) {
        match notice {
            Notice::Info(_) => (Style::default().fg(self.theme.info_fg), "ℹ "),
            Notice::Success(_) => (Style::default().fg(self.theme.success_fg), "✓ "),
            Notice::Error(_) => (
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
                    .add_modifier(Modifier::BOLD),
                "✗ ",
            ),
        }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        buf.set_style(area, base);

        if let Some(notice) = self.notice {
            let (style, marker) = self.notice_style(notice);
            let text = match notice {
                Notice::Info(msg) | Notice::Success(msg) | Notice::Error(msg) => msg,
            };
            let display: String = format!(" {}{}", marker, text).chars().take(width).collect();
            let padded = format!("{:<width$}", display, width = width);
            let line = Line::from(Span::styled(padded, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let key_style = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(self.theme.dim_fg);
        let disabled = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT);

        let mut hints = Vec::new();
        for (key, label) in KEY_HINTS {
            let refresh_off = self.loading && *key == "r";
            hints.push(Span::raw(" "));
            hints.push(Span::styled(*key, if refresh_off { disabled } else { key_style }));
            hints.push(Span::styled(
                format!(":{}", label),
                if refresh_off { disabled } else { label_style },
            ));
        }
        let hints_len: usize = hints.iter().map(|s| s.width()).sum();

        let budget = width.saturating_sub(hints_len + 1);
        let device: String = if self.device.chars().count() > budget {
            self.device.chars().take(budget).collect()
        } else {
            self.device.to_string()
        };
        let gap = width.saturating_sub(device.chars().count() + 1 + hints_len);

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(device, Style::default().fg(self.theme.info_fg)),
            Span::raw(" ".repeat(gap)),
        ];
        spans.extend(hints);

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
