use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Widget},
};

use crate::api::FsUsage;
use crate::explorer::format::{format_size, UsageSummary};
use crate::explorer::tree::Stats;
use crate::theme::ThemeColors;

/// Filesystem usage gauge plus tree statistics.
pub struct OverviewWidget<'a> {
    usage: Option<&'a FsUsage>,
    stats: &'a Stats,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> OverviewWidget<'a> {
    pub fn new(usage: Option<&'a FsUsage>, stats: &'a Stats, theme: &'a ThemeColors) -> Self {
        Self {
            usage,
            stats,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn pair(&self, label: &'a str, value: String) -> [Span<'a>; 2] {
        [
            Span::styled(label, Style::default().fg(self.theme.dim_fg)),
            Span::styled(
                value,
                Style::default()
                    .fg(self.theme.tree_fg)
                    .add_modifier(Modifier::BOLD),
            ),
        ]
    }

    fn usage_line(&self, summary: Option<&UsageSummary>) -> Line<'a> {
        let Some(summary) = summary else {
            return Line::from(Span::styled(
                "Filesystem usage unavailable",
                Style::default().fg(self.theme.warning_fg),
            ));
        };
        let mut spans = Vec::new();
        spans.extend(self.pair("Total: ", summary.total.clone()));
        spans.push(Span::raw("   "));
        spans.extend(self.pair("Used: ", summary.used.clone()));
        spans.push(Span::raw("   "));
        spans.extend(self.pair("Free: ", summary.free.clone()));
        Line::from(spans)
    }

    fn stats_line(&self) -> Line<'a> {
        let largest = if self.stats.largest_file.name.is_empty() {
            "--".to_string()
        } else {
            format!(
                "{} ({})",
                self.stats.largest_file.name,
                format_size(self.stats.largest_file.size)
            )
        };
        let mut spans = Vec::new();
        spans.extend(self.pair("Files: ", self.stats.files.to_string()));
        spans.push(Span::raw("   "));
        spans.extend(self.pair("Folders: ", self.stats.folders.to_string()));
        spans.push(Span::raw("   "));
        spans.extend(self.pair("Total: ", format_size(self.stats.total_size)));
        spans.push(Span::raw("   "));
        spans.extend(self.pair("Largest: ", largest));
        Line::from(spans)
    }
}

impl<'a> Widget for OverviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.height == 0 {
            return;
        }

        let summary = self.usage.map(UsageSummary::from);
        let [usage_area, gauge_area, stats_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        buf.set_line(
            usage_area.x,
            usage_area.y,
            &self.usage_line(summary.as_ref()),
            usage_area.width,
        );

        if let Some(summary) = &summary {
            Gauge::default()
                .gauge_style(
                    Style::default()
                        .fg(self.theme.gauge_fg)
                        .bg(self.theme.gauge_bg),
                )
                .ratio(summary.ratio)
                .label(format!("{} used", summary.percent))
                .render(gauge_area, buf);
        }

        buf.set_line(
            stats_area.x,
            stats_area.y,
            &self.stats_line(),
            stats_area.width,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::tree::LargestFile;
    use crate::theme::dark_theme;

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn shows_usage_and_stats() {
        let tc = dark_theme();
        let usage = FsUsage {
            fs_total: 2 * 1024 * 1024,
            fs_used: 1024 * 1024,
        };
        let stats = Stats {
            files: 3,
            folders: 2,
            total_size: 2560,
            largest_file: LargestFile {
                name: "index.html".into(),
                size: 2048,
            },
        };
        let area = Rect::new(0, 0, 100, 3);
        let mut buf = Buffer::empty(area);
        OverviewWidget::new(Some(&usage), &stats, &tc).render(area, &mut buf);

        let out = text(&buf);
        assert!(out.contains("Total: 2.00 MB"));
        assert!(out.contains("Used: 1.00 MB"));
        assert!(out.contains("Free: 1.00 MB"));
        assert!(out.contains("50.0% used"));
        assert!(out.contains("Files: 3"));
        assert!(out.contains("Folders: 2"));
        assert!(out.contains("Largest: index.html (2.0 KB)"));
    }

    #[test]
    fn missing_usage_and_empty_stats() {
        let tc = dark_theme();
        let stats = Stats::default();
        let area = Rect::new(0, 0, 100, 3);
        let mut buf = Buffer::empty(area);
        OverviewWidget::new(None, &stats, &tc).render(area, &mut buf);

        let out = text(&buf);
        assert!(out.contains("Filesystem usage unavailable"));
        assert!(out.contains("Largest: --"));
        assert!(out.contains("Total: 0 B"));
    }
}
