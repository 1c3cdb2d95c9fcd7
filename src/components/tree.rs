use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::explorer::controller::View;
use crate::explorer::render::{Arrow, FileIcon, Guide, Icon, Row, EMPTY_MESSAGE};
use crate::explorer::tree::NodeKind;
use crate::theme::ThemeColors;

/// Tree widget that renders the visible rows with box-drawing guides, or a
/// placeholder while loading, on error, or when the device has no files.
pub struct TreeWidget<'a> {
    rows: &'a [&'a Row],
    view: &'a View,
    cursor: usize,
    scroll_offset: usize,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(
        rows: &'a [&'a Row],
        view: &'a View,
        theme: &'a ThemeColors,
        use_icons: bool,
    ) -> Self {
        Self {
            rows,
            view,
            cursor: 0,
            scroll_offset: 0,
            theme,
            use_icons,
            block: None,
        }
    }

    pub fn cursor(mut self, cursor: usize, scroll_offset: usize) -> Self {
        self.cursor = cursor;
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Indentation guides: `│  ` for outer levels, `├─ `/`└─ ` at the parent.
    fn build_prefix(row: &Row) -> String {
        row.guides
            .iter()
            .map(|guide| match guide {
                Guide::Continuation => "│  ",
                Guide::Connector if row.is_last_sibling => "└─ ",
                Guide::Connector => "├─ ",
            })
            .collect()
    }

    fn arrow_glyph(arrow: Arrow) -> &'static str {
        match arrow {
            Arrow::Collapsed => "▶ ",
            Arrow::Expanded => "▼ ",
            Arrow::Disabled | Arrow::Spacer => "  ",
        }
    }

    fn icon_glyph(&self, icon: Icon) -> &'static str {
        if !self.use_icons {
            return match icon {
                Icon::FolderOpen | Icon::FolderClosed => "[D] ",
                Icon::File(_) => "[F] ",
            };
        }
        match icon {
            Icon::FolderOpen => "📂 ",
            Icon::FolderClosed => "📁 ",
            Icon::File(file) => match file {
                FileIcon::Html => "📄 ",
                FileIcon::Css => "🎨 ",
                FileIcon::Script => "📜 ",
                FileIcon::Json => "📋 ",
                FileIcon::Text => "📝 ",
                FileIcon::Log => "📃 ",
                FileIcon::Markdown => "📘 ",
                FileIcon::Xml => "📰 ",
                FileIcon::Config => "⚙️ ",
                FileIcon::Generic => "📄 ",
            },
        }
    }

    fn render_placeholder(&self, message: &str, style: Style, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let line = Line::from(Span::styled(message.to_string(), style)).centered();
        buf.set_line(area.x, area.y + area.height / 2, &line, area.width);
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        match self.view {
            View::Loading => {
                let style = Style::default().fg(self.theme.info_fg);
                self.render_placeholder("Loading file system...", style, inner_area, buf);
                return;
            }
            View::Error(message) => {
                let style = Style::default()
                    .fg(self.theme.error_fg)
                    .add_modifier(Modifier::BOLD);
                self.render_placeholder(&format!("⚠ {}", message), style, inner_area, buf);
                return;
            }
            View::Empty => {
                let style = Style::default().fg(self.theme.dim_fg);
                self.render_placeholder(EMPTY_MESSAGE, style, inner_area, buf);
                return;
            }
            View::Ready => {}
        }

        let visible_height = inner_area.height as usize;
        if self.rows.is_empty() || visible_height == 0 {
            return;
        }

        let visible = self
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (i, (idx, row)) in visible.enumerate() {
            let y = inner_area.y + i as u16;

            let name_style = if row.selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                match row.kind {
                    NodeKind::Folder => Style::default()
                        .fg(self.theme.tree_dir_fg)
                        .add_modifier(Modifier::BOLD),
                    NodeKind::File => Style::default().fg(self.theme.tree_file_fg),
                }
            };
            let name_style = if idx == self.cursor && !row.selected {
                name_style.add_modifier(Modifier::UNDERLINED)
            } else {
                name_style
            };

            let guide_style = Style::default().fg(self.theme.tree_guide_fg);
            let mut spans = vec![
                Span::styled(Self::build_prefix(row), guide_style),
                Span::styled(Self::arrow_glyph(row.arrow), guide_style),
                Span::styled(self.icon_glyph(row.icon), name_style),
                Span::styled(row.name.clone(), name_style),
            ];

            // Right-aligned size and download action.
            let download = if row.downloadable { "  ⬇ d" } else { "" };
            let right_len = row.size_label.chars().count() + download.chars().count() + 1;
            let left_len: usize = spans.iter().map(|span| span.width()).sum();
            let gap = (inner_area.width as usize).saturating_sub(left_len + right_len);
            spans.push(Span::raw(" ".repeat(gap.max(1))));
            spans.push(Span::styled(
                row.size_label.clone(),
                Style::default().fg(self.theme.tree_size_fg),
            ));
            if row.downloadable {
                spans.push(Span::styled(
                    download,
                    Style::default().fg(self.theme.download_fg),
                ));
            }

            let line = Line::from(spans);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
